use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{AdminError, Result};

/// Description stored on accounts created without one
pub const DEFAULT_DESCRIPTION: &str = "Managed by Terraform";

/// Local account in the Jenkins private security realm
///
/// A lookup of a user that does not exist yields `LocalUser::default()`,
/// so callers check `username.is_empty()` to tell "not found" apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalUser {
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub description: String,
    /// Computed by the server, never sent by the client
    pub password_hash: String,
}

impl LocalUser {
    pub fn exists(&self) -> bool {
        !self.username.is_empty()
    }
}

/// Parameters for creating a local account
#[derive(Clone, Default)]
pub struct NewLocalUser {
    pub username: String,
    /// Plaintext, write-only
    pub password: String,
    pub fullname: String,
    pub email: String,
    pub description: Option<String>,
}

impl NewLocalUser {
    /// Description to store, falling back to [`DEFAULT_DESCRIPTION`] when unset or empty
    pub fn effective_description(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => DEFAULT_DESCRIPTION,
        }
    }
}

impl fmt::Debug for NewLocalUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewLocalUser")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("fullname", &self.fullname)
            .field("email", &self.email)
            .field("description", &self.description)
            .finish()
    }
}

/// Canonical permission names granted to one user in the global matrix
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPermissionSet {
    pub username: String,
    pub permissions: BTreeSet<String>,
}

impl UserPermissionSet {
    pub fn new<I, S>(username: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            username: username.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.permissions.contains(name)
    }
}

/// Reject usernames that cannot name an account
///
/// Quoting is handled at render time; this only catches values that are
/// never valid Jenkins ids.
pub fn validate_username(username: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(AdminError::InvalidInput("username must not be empty".to_string()));
    }
    if username.chars().any(char::is_control) {
        return Err(AdminError::InvalidInput(format!(
            "username {:?} contains control characters",
            username
        )));
    }
    Ok(())
}
