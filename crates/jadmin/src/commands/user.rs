use crate::cli::{OutputFormat, UserCommands};
use crate::output::{output_result, output_success};
use anyhow::{Context, Result};
use jenkins_core::{AdminError, JenkinsAdmin, NewLocalUser};

pub fn handle_user(
    client: &dyn JenkinsAdmin,
    action: &UserCommands,
    format: OutputFormat,
) -> Result<()> {
    match action {
        UserCommands::Get { username } => handle_get(client, username, format),
        UserCommands::Create {
            username,
            user_password,
            fullname,
            email,
            description,
        } => {
            let user = new_user(username, user_password, fullname, email, description.as_deref());
            handle_create(client, &user, format)
        }
        UserCommands::Update {
            username,
            user_password,
            fullname,
            email,
            description,
        } => {
            let user = new_user(username, user_password, fullname, email, description.as_deref());
            handle_update(client, &user, format)
        }
        UserCommands::Delete { username } => handle_delete(client, username, format),
    }
}

fn new_user(
    username: &str,
    password: &str,
    fullname: &str,
    email: &str,
    description: Option<&str>,
) -> NewLocalUser {
    NewLocalUser {
        username: username.to_string(),
        password: password.to_string(),
        fullname: fullname.to_string(),
        email: email.to_string(),
        description: description.map(str::to_string),
    }
}

fn handle_get(client: &dyn JenkinsAdmin, username: &str, format: OutputFormat) -> Result<()> {
    let user = client
        .get_local_user(username)
        .with_context(|| format!("Failed to get user '{}'", username))?;

    output_result(&user, format);
    Ok(())
}

/// Create refuses to touch an existing account; the realm itself would
/// silently overwrite it.
fn handle_create(client: &dyn JenkinsAdmin, user: &NewLocalUser, format: OutputFormat) -> Result<()> {
    let existing = client
        .get_local_user(&user.username)
        .with_context(|| format!("Failed to check for user '{}'", user.username))?;
    if existing.exists() {
        return Err(AdminError::AlreadyExists(user.username.clone()).into());
    }

    client
        .create_local_user(user)
        .with_context(|| format!("Failed to create user '{}'", user.username))?;

    output_success(&format!("Created user: {}", user.username), format);
    Ok(())
}

/// Writing an account again replaces its password and details
fn handle_update(client: &dyn JenkinsAdmin, user: &NewLocalUser, format: OutputFormat) -> Result<()> {
    let existing = client
        .get_local_user(&user.username)
        .with_context(|| format!("Failed to check for user '{}'", user.username))?;
    if !existing.exists() {
        return Err(AdminError::NotFound(user.username.clone()).into());
    }

    client
        .create_local_user(user)
        .with_context(|| format!("Failed to update user '{}'", user.username))?;

    output_success(&format!("Updated user: {}", user.username), format);
    Ok(())
}

fn handle_delete(client: &dyn JenkinsAdmin, username: &str, format: OutputFormat) -> Result<()> {
    client
        .delete_local_user(username)
        .with_context(|| format!("Failed to delete user '{}'", username))?;

    output_success(&format!("Deleted user: {}", username), format);
    Ok(())
}
