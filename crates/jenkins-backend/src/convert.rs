//! Conversions from envelope payloads to jenkins-core types

use jenkins_core::{LocalUser, UserPermissionSet};

use crate::envelope::{LocalUserData, PermissionsData};

impl From<LocalUserData> for LocalUser {
    fn from(data: LocalUserData) -> Self {
        LocalUser {
            username: data.username,
            fullname: data.fullname,
            email: data.email,
            description: data.description,
            password_hash: data.password_hash,
        }
    }
}

impl From<PermissionsData> for UserPermissionSet {
    fn from(data: PermissionsData) -> Self {
        UserPermissionSet::new(data.username, data.permissions)
    }
}
