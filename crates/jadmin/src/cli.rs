use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "jadmin",
    version,
    about = "Manage Jenkins local users and global matrix permissions"
)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'o', value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to colorize output
    #[arg(long, value_enum, global = true, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a TOML config file
    #[arg(long, env = "JADMIN_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Jenkins base URL (overrides config file and JENKINS_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Login user (overrides config file and JENKINS_USERNAME)
    #[arg(long = "username", short = 'u', id = "auth_username", global = true)]
    pub auth_username: Option<String>,

    /// Password or API token of the login user (overrides config file and
    /// JENKINS_PASSWORD)
    #[arg(long = "password", id = "auth_password", global = true)]
    pub auth_password: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Debug, Copy, Default)]
pub enum ColorChoice {
    /// Colorize output if stdout is a terminal
    #[default]
    Auto,
    /// Always colorize output
    Always,
    /// Never colorize output
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Local user database operations
    #[command(visible_alias = "u")]
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Global matrix permission operations
    #[command(visible_alias = "perm", visible_alias = "p")]
    Permissions {
        #[command(subcommand)]
        action: PermissionCommands,
    },
    /// Inspect the effective configuration
    #[command(visible_alias = "cfg")]
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Generate shell completions and write to stdout
    pub fn generate_completions(shell: Shell) {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "jadmin", &mut std::io::stdout());
    }
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Show a local user
    Get {
        /// Jenkins user id
        username: String,
    },
    /// Create a local user (fails if the user already exists)
    #[command(visible_alias = "new")]
    Create {
        /// Jenkins user id
        username: String,
        /// Initial password
        #[arg(long)]
        user_password: String,
        /// Display name
        #[arg(long, default_value = "")]
        fullname: String,
        /// Email address
        #[arg(long, default_value = "")]
        email: String,
        /// Description (defaults to "Managed by Terraform")
        #[arg(long)]
        description: Option<String>,
    },
    /// Change an existing local user's password and details
    Update {
        /// Jenkins user id
        username: String,
        /// New password
        #[arg(long)]
        user_password: String,
        /// Display name
        #[arg(long, default_value = "")]
        fullname: String,
        /// Email address
        #[arg(long, default_value = "")]
        email: String,
        /// Description (defaults to "Managed by Terraform")
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a local user (succeeds if the user does not exist)
    #[command(visible_alias = "rm")]
    Delete {
        /// Jenkins user id
        username: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum PermissionCommands {
    /// Show the permissions granted to a user
    Get {
        /// Jenkins user id
        username: String,
    },
    /// Grant permissions without revoking any (e.g. Overall/Read Job/Build)
    Grant {
        /// Jenkins user id
        username: String,
        /// Permission names in Group/Action form
        #[arg(required = true)]
        permissions: Vec<String>,
    },
    /// Make the user's permissions exactly the given set
    Set {
        /// Jenkins user id
        username: String,
        /// Permission names in Group/Action form; none revokes everything
        permissions: Vec<String>,
    },
    /// Revoke every permission held by a user
    Revoke {
        /// Jenkins user id
        username: String,
    },
    /// List every grantable permission name
    #[command(visible_alias = "ls")]
    List,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration with the password masked
    Show,
    /// Print the config file paths that are searched
    Path,
}
