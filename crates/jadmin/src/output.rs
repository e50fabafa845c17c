use crate::cli::OutputFormat;
use crate::config::Config;
use colored::Colorize;
use jenkins_core::{AdminError, LocalUser, UserPermissionSet};
use serde::Serialize;

pub fn output_result<T: Serialize + Displayable>(result: &T, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(result) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            println!("{}", result.display());
        }
    }
}

#[derive(Serialize)]
struct JsonSuccess<'a> {
    success: bool,
    message: &'a str,
}

/// Report a completed mutation; text mode writes to stderr like other notices
pub fn output_success(message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let body = JsonSuccess {
                success: true,
                message,
            };
            if let Ok(json) = serde_json::to_string_pretty(&body) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => eprintln!("{}", message),
    }
}

#[derive(Serialize)]
pub struct JsonError {
    pub error: bool,
    pub code: String,
    pub message: String,
}

/// Stable machine-readable code for an error chain
pub fn error_code(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<AdminError>() {
        Some(AdminError::Transport { .. }) | Some(AdminError::Http(_)) => "transport",
        Some(AdminError::Protocol(_)) => "protocol",
        Some(AdminError::Domain(_)) => "jenkins",
        Some(AdminError::AlreadyExists(_)) => "already_exists",
        Some(AdminError::NotFound(_)) => "not_found",
        Some(AdminError::InvalidInput(_)) => "invalid_input",
        Some(AdminError::Template(_)) | Some(AdminError::Io(_)) => "internal",
        None => "error",
    }
}

pub fn output_error(err: &anyhow::Error, format: OutputFormat) {
    let message = match format {
        OutputFormat::Json => {
            let json_err = JsonError {
                error: true,
                code: error_code(err).to_string(),
                message: format!("{:#}", err),
            };
            serde_json::to_string_pretty(&json_err).unwrap_or_else(|_| {
                format!(r#"{{"error": true, "message": "{}"}}"#, err)
            })
        }
        OutputFormat::Text => format!("{}: {:#}", "Error".red().bold(), err),
    };
    eprintln!("{}", message);
}

pub trait Displayable {
    fn display(&self) -> String;
}

fn or_none(value: &str) -> String {
    if value.is_empty() {
        "None".dimmed().to_string()
    } else {
        value.to_string()
    }
}

impl Displayable for LocalUser {
    fn display(&self) -> String {
        if !self.exists() {
            return "User not found".yellow().to_string();
        }

        format!(
            "{}\n  {}: {}\n  {}: {}\n  {}: {}\n  {}: {}",
            self.username.cyan().bold(),
            "Full name".dimmed(),
            or_none(&self.fullname),
            "Email".dimmed(),
            or_none(&self.email),
            "Description".dimmed(),
            or_none(&self.description),
            "Password".dimmed(),
            if self.password_hash.is_empty() {
                "not set".yellow().to_string()
            } else {
                "set".green().to_string()
            }
        )
    }
}

impl Displayable for UserPermissionSet {
    fn display(&self) -> String {
        let mut output = format!(
            "{} ({} permission{})",
            self.username.cyan().bold(),
            self.permissions.len(),
            if self.permissions.len() == 1 { "" } else { "s" }
        );
        for name in &self.permissions {
            output.push_str(&format!("\n  {}", colorize_permission(name)));
        }
        output
    }
}

/// Grantable permission names, as printed by `permissions list`
#[derive(Serialize)]
#[serde(transparent)]
pub struct PermissionNames(pub Vec<String>);

impl Displayable for PermissionNames {
    fn display(&self) -> String {
        self.0
            .iter()
            .map(|name| colorize_permission(name))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn colorize_permission(name: &str) -> String {
    match name.split_once('/') {
        Some((group, action)) if group == "Overall" && action == "Administer" => {
            name.red().bold().to_string()
        }
        Some((group, action)) => format!("{}/{}", group.dimmed(), action.white().bold()),
        None => name.to_string(),
    }
}

impl Displayable for Config {
    fn display(&self) -> String {
        let unset = || "not set".yellow().to_string();
        format!(
            "{}: {}\n{}: {}\n{}: {}\n{}: {}s",
            "URL".dimmed(),
            self.url.clone().unwrap_or_else(unset),
            "Username".dimmed(),
            self.username.clone().unwrap_or_else(unset),
            "Password".dimmed(),
            self.password.clone().unwrap_or_else(unset),
            "Timeout".dimmed(),
            self.timeout_secs
        )
    }
}
