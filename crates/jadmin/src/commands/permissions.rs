use crate::cli::{OutputFormat, PermissionCommands};
use crate::output::{output_result, output_success, PermissionNames};
use anyhow::{Context, Result};
use jenkins_core::JenkinsAdmin;

pub fn handle_permissions(
    client: &dyn JenkinsAdmin,
    action: &PermissionCommands,
    format: OutputFormat,
) -> Result<()> {
    match action {
        PermissionCommands::Get { username } => handle_get(client, username, format),
        PermissionCommands::Grant {
            username,
            permissions,
        } => handle_grant(client, username, permissions, format),
        PermissionCommands::Set {
            username,
            permissions,
        } => handle_set(client, username, permissions, format),
        PermissionCommands::Revoke { username } => handle_revoke(client, username, format),
        PermissionCommands::List => handle_list(client, format),
    }
}

fn handle_get(client: &dyn JenkinsAdmin, username: &str, format: OutputFormat) -> Result<()> {
    let set = client
        .get_user_permissions(username)
        .with_context(|| format!("Failed to get permissions of '{}'", username))?;

    output_result(&set, format);
    Ok(())
}

fn handle_grant(
    client: &dyn JenkinsAdmin,
    username: &str,
    permissions: &[String],
    format: OutputFormat,
) -> Result<()> {
    client
        .create_user_permissions(username, permissions)
        .with_context(|| format!("Failed to grant permissions to '{}'", username))?;

    output_success(&format!("Granted permissions to: {}", username), format);
    Ok(())
}

fn handle_set(
    client: &dyn JenkinsAdmin,
    username: &str,
    permissions: &[String],
    format: OutputFormat,
) -> Result<()> {
    client
        .update_user_permissions(username, permissions)
        .with_context(|| format!("Failed to update permissions of '{}'", username))?;

    output_success(&format!("Updated permissions of: {}", username), format);
    Ok(())
}

fn handle_revoke(client: &dyn JenkinsAdmin, username: &str, format: OutputFormat) -> Result<()> {
    client
        .delete_user_permissions(username)
        .with_context(|| format!("Failed to revoke permissions of '{}'", username))?;

    output_success(&format!("Revoked all permissions of: {}", username), format);
    Ok(())
}

fn handle_list(client: &dyn JenkinsAdmin, format: OutputFormat) -> Result<()> {
    let names = client
        .list_permissions()
        .context("Failed to list permissions")?;

    output_result(&PermissionNames(names), format);
    Ok(())
}
