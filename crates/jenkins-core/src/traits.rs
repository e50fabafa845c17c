use crate::error::Result;
use crate::models::*;

/// Administrative operations on a Jenkins instance's local accounts and
/// global matrix permissions.
///
/// Every call is a single, independent round trip; nothing is cached and no
/// call is retried. Absent users and empty permission sets are returned as
/// default values rather than errors.
pub trait JenkinsAdmin: Send + Sync {
    // ========== Local Users ==========

    /// Look up a local user; returns `LocalUser::default()` when absent
    fn get_local_user(&self, username: &str) -> Result<LocalUser>;

    /// Create a local user in the private security realm
    fn create_local_user(&self, user: &NewLocalUser) -> Result<()>;

    /// Delete a local user. Deleting an absent user succeeds.
    fn delete_local_user(&self, username: &str) -> Result<()>;

    // ========== Global Matrix Permissions ==========

    /// Canonical names currently granted to a user
    fn get_user_permissions(&self, username: &str) -> Result<UserPermissionSet>;

    /// Grant every named permission; nothing is revoked
    fn create_user_permissions(&self, username: &str, permissions: &[String]) -> Result<()>;

    /// Make the user's grants exactly the named set
    fn update_user_permissions(&self, username: &str, permissions: &[String]) -> Result<()>;

    /// Revoke every permission held by the user
    fn delete_user_permissions(&self, username: &str) -> Result<()>;

    /// Canonical names of every grantable permission
    fn list_permissions(&self) -> Result<Vec<String>> {
        Err(crate::error::AdminError::InvalidInput(
            "Permission catalog not supported by this backend".to_string(),
        ))
    }
}
