mod cli;
mod color;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, ConfigCommands, OutputFormat};
use config::Config;
use jenkins_backend::{basic_auth, build_agent, JenkinsClient};
use output::{output_error, output_result};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive
const LOG_ENV: &str = "JADMIN_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse();
    color::init(cli.color);
    init_tracing(cli.verbose);

    let format = cli.format;
    if let Err(e) = run(cli) {
        output_error(&e, format);
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Logs go to stderr so JSON on stdout stays parseable
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("warn,jenkins_backend=debug,jadmin=debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::User { action } => {
            let client = connect(&cli)?;
            commands::user::handle_user(&client, action, cli.format)
        }
        Commands::Permissions { action } => {
            let client = connect(&cli)?;
            commands::permissions::handle_permissions(&client, action, cli.format)
        }
        // Local commands need neither a connection nor valid credentials
        Commands::Config { action } => handle_config(&cli, action),
        Commands::Completions { shell } => {
            Cli::generate_completions(*shell);
            Ok(())
        }
    }
}

/// Load and validate the configuration, then build a client from it
fn connect(cli: &Cli) -> Result<JenkinsClient> {
    let config = load_config(cli)?;
    config.validate()?;
    build_client(&config)
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.clone())?;
    config.merge_with_cli(
        cli.url.clone(),
        cli.auth_username.clone(),
        cli.auth_password.clone(),
    );
    Ok(config)
}

fn build_client(config: &Config) -> Result<JenkinsClient> {
    let url = config
        .url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("Jenkins URL not configured"))?;
    let auth = match (&config.username, &config.password) {
        (Some(username), Some(password)) => Some(basic_auth(username, password)),
        _ => None,
    };

    debug!(url, authenticated = auth.is_some(), timeout_secs = config.timeout_secs, "connecting");
    Ok(JenkinsClient::with_agent(build_agent(config.timeout()), url, auth))
}

fn handle_config(cli: &Cli, action: &ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let config = load_config(cli)?;
            output_result(&config.masked(), cli.format);
            Ok(())
        }
        ConfigCommands::Path => {
            let paths = config::config_paths(cli.config.as_deref());
            match cli.format {
                OutputFormat::Json => {
                    let paths: Vec<String> =
                        paths.iter().map(|p| p.display().to_string()).collect();
                    println!("{}", serde_json::to_string_pretty(&paths)?);
                }
                OutputFormat::Text => {
                    for path in paths {
                        let marker = if path.exists() { " (found)" } else { "" };
                        println!("{}{}", path.display(), marker);
                    }
                }
            }
            Ok(())
        }
    }
}
