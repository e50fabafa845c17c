//! Implementation of jenkins-core traits for JenkinsClient

use jenkins_core::{
    AdminError, JenkinsAdmin, LocalUser, NewLocalUser, Result, UserPermissionSet,
};

use crate::client::JenkinsClient;

impl JenkinsAdmin for JenkinsClient {
    fn get_local_user(&self, username: &str) -> Result<LocalUser> {
        self.get_local_user(username)
            .map(Into::into)
            .map_err(AdminError::from)
    }

    fn create_local_user(&self, user: &NewLocalUser) -> Result<()> {
        self.create_local_user(user).map_err(AdminError::from)
    }

    fn delete_local_user(&self, username: &str) -> Result<()> {
        self.delete_local_user(username).map_err(AdminError::from)
    }

    fn get_user_permissions(&self, username: &str) -> Result<UserPermissionSet> {
        self.get_user_permissions(username)
            .map(Into::into)
            .map_err(AdminError::from)
    }

    fn create_user_permissions(&self, username: &str, permissions: &[String]) -> Result<()> {
        self.create_user_permissions(username, permissions)
            .map(|_| ())
            .map_err(AdminError::from)
    }

    fn update_user_permissions(&self, username: &str, permissions: &[String]) -> Result<()> {
        self.update_user_permissions(username, permissions)
            .map(|_| ())
            .map_err(AdminError::from)
    }

    fn delete_user_permissions(&self, username: &str) -> Result<()> {
        self.delete_user_permissions(username)
            .map(|_| ())
            .map_err(AdminError::from)
    }

    fn list_permissions(&self) -> Result<Vec<String>> {
        self.list_permissions().map_err(AdminError::from)
    }
}
