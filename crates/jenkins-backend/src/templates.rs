//! Script templates, one per administrative operation

use jenkins_core::{EXCLUDED_SUFFIXES, INTERNAL_PREFIX, REWRITES};
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use std::fmt;

use crate::groovy;

/// Operations the script console is asked to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    GetLocalUser,
    CreateLocalUser,
    DeleteLocalUser,
    GetUserPermissions,
    CreateUserPermissions,
    UpdateUserPermissions,
    DeleteUserPermissions,
    ListPermissions,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Command::GetLocalUser,
        Command::CreateLocalUser,
        Command::DeleteLocalUser,
        Command::GetUserPermissions,
        Command::CreateUserPermissions,
        Command::UpdateUserPermissions,
        Command::DeleteUserPermissions,
        Command::ListPermissions,
    ];

    pub fn template_name(self) -> &'static str {
        match self {
            Command::GetLocalUser => "get_local_user.groovy",
            Command::CreateLocalUser => "create_local_user.groovy",
            Command::DeleteLocalUser => "delete_local_user.groovy",
            Command::GetUserPermissions => "get_user_permissions.groovy",
            Command::CreateUserPermissions => "create_user_permissions.groovy",
            Command::UpdateUserPermissions => "update_user_permissions.groovy",
            Command::DeleteUserPermissions => "delete_user_permissions.groovy",
            Command::ListPermissions => "list_permissions.groovy",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.template_name().trim_end_matches(".groovy"))
    }
}

/// Parameters for commands addressing a single user
#[derive(Debug, Serialize)]
pub struct UserParams<'a> {
    pub username: &'a str,
}

#[derive(Serialize)]
pub struct NewUserParams<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub fullname: &'a str,
    pub email: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Serialize)]
pub struct PermissionParams<'a> {
    pub username: &'a str,
    pub permissions: &'a [String],
}

#[derive(Debug, Serialize)]
pub struct NoParams {}

/// Operation parameters plus the permission codec tables every script may use
#[derive(Serialize)]
struct ScriptContext<'a, P: Serialize> {
    #[serde(flatten)]
    params: &'a P,
    rewrites: &'static [(&'static str, &'static str)],
    internal_prefix: &'static str,
    excluded_suffixes: &'static [&'static str],
}

/// Renders Groovy scripts from the embedded templates.
///
/// Every `{{ expression }}` is emitted as a Groovy literal by
/// [`groovy::format_literal`], and undefined variables are errors.
pub struct CommandTemplates {
    env: Environment<'static>,
}

impl CommandTemplates {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_loader(embedded_script_loader);
        env.set_formatter(groovy::format_literal);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        Self { env }
    }

    pub fn render<P: Serialize>(
        &self,
        command: Command,
        params: &P,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(command.template_name())?;
        tmpl.render(ScriptContext {
            params,
            rewrites: REWRITES,
            internal_prefix: INTERNAL_PREFIX,
            excluded_suffixes: EXCLUDED_SUFFIXES,
        })
    }
}

impl Default for CommandTemplates {
    fn default() -> Self {
        Self::new()
    }
}

fn embedded_script_loader(name: &str) -> Result<Option<String>, minijinja::Error> {
    let source = match name {
        "get_local_user.groovy" => Some(include_str!("scripts/get_local_user.groovy")),
        "create_local_user.groovy" => Some(include_str!("scripts/create_local_user.groovy")),
        "delete_local_user.groovy" => Some(include_str!("scripts/delete_local_user.groovy")),
        "get_user_permissions.groovy" => {
            Some(include_str!("scripts/get_user_permissions.groovy"))
        }
        "create_user_permissions.groovy" => {
            Some(include_str!("scripts/create_user_permissions.groovy"))
        }
        "update_user_permissions.groovy" => {
            Some(include_str!("scripts/update_user_permissions.groovy"))
        }
        "delete_user_permissions.groovy" => {
            Some(include_str!("scripts/delete_user_permissions.groovy"))
        }
        "list_permissions.groovy" => Some(include_str!("scripts/list_permissions.groovy")),

        // Shared fragments
        "partials/realm_check.groovy" => Some(include_str!("scripts/partials/realm_check.groovy")),
        "partials/matrix_check.groovy" => {
            Some(include_str!("scripts/partials/matrix_check.groovy"))
        }
        "partials/short_name.groovy" => Some(include_str!("scripts/partials/short_name.groovy")),
        "partials/addressable.groovy" => Some(include_str!("scripts/partials/addressable.groovy")),
        "partials/held.groovy" => Some(include_str!("scripts/partials/held.groovy")),

        _ => None,
    };

    Ok(source.map(|s| s.to_string()))
}
