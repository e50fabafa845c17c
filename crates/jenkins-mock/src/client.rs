//! Mock Jenkins implementing the JenkinsAdmin trait

use jenkins_core::{
    build_addressable_table, granted_names, plan_grant, plan_reconcile, plan_revoke_all,
    validate_username, AddressableTable, AdminError, GrantPlan, GrantTable, JenkinsAdmin,
    LocalUser, NewLocalUser, PermissionDescriptor, Result, UserPermissionSet,
};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use crate::catalog::default_catalog;

/// Message reported when the security realm is not the private user database
pub const REALM_ERROR: &str = "Jenkins is not using local user database";

/// Message reported when authorization is not the global matrix
pub const MATRIX_ERROR: &str = "Jenkins is not using global matrix authorization";

const HASH_PREFIX: &str = "#jbcrypt:";

/// Opaque stored form of a password, never the password itself
pub fn hash_password(username: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update([0u8]);
    hasher.update(password.as_bytes());
    format!("{}{}", HASH_PREFIX, hex::encode(hasher.finalize()))
}

/// A single recorded trait call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallLogEntry {
    /// Trait method name
    pub method: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Error text if the call failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug)]
struct MockState {
    users: BTreeMap<String, LocalUser>,
    grants: GrantTable,
    local_realm: bool,
    matrix_authorization: bool,
    calls: Vec<CallLogEntry>,
}

/// In-memory Jenkins with a private realm and a global matrix
pub struct MockJenkins {
    catalog: Vec<PermissionDescriptor>,
    addressable: AddressableTable,
    state: Mutex<MockState>,
}

impl MockJenkins {
    /// Jenkins with the default catalog and an `admin` account holding
    /// Overall/Administer
    pub fn new() -> Self {
        let mock = Self::with_catalog(default_catalog());
        {
            let mut state = mock.lock();
            state.users.insert(
                "admin".to_string(),
                LocalUser {
                    username: "admin".to_string(),
                    fullname: "Administrator".to_string(),
                    email: String::new(),
                    description: String::new(),
                    password_hash: hash_password("admin", "admin"),
                },
            );
            state
                .grants
                .entry("hudson.model.Hudson.Administer".to_string())
                .or_default()
                .insert("admin".to_string());
        }
        mock
    }

    /// Empty Jenkins with the given permission catalog
    pub fn with_catalog(catalog: Vec<PermissionDescriptor>) -> Self {
        let addressable = build_addressable_table(&catalog);
        Self {
            catalog,
            addressable,
            state: Mutex::new(MockState {
                users: BTreeMap::new(),
                grants: GrantTable::new(),
                local_realm: true,
                matrix_authorization: true,
                calls: Vec::new(),
            }),
        }
    }

    /// Switch the security realm between the private database and something else
    pub fn set_local_realm(&self, enabled: bool) {
        self.lock().local_realm = enabled;
    }

    /// Switch the authorization strategy between the global matrix and something else
    pub fn set_matrix_authorization(&self, enabled: bool) {
        self.lock().matrix_authorization = enabled;
    }

    /// Grant a raw permission id, bypassing the addressable filter
    pub fn grant_raw(&self, permission_id: &str, username: &str) {
        self.lock()
            .grants
            .entry(permission_id.to_string())
            .or_default()
            .insert(username.to_string());
    }

    /// Snapshot of the global matrix
    pub fn grants(&self) -> GrantTable {
        self.lock().grants.clone()
    }

    pub fn catalog(&self) -> &[PermissionDescriptor] {
        &self.catalog
    }

    pub fn calls(&self) -> Vec<CallLogEntry> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `op` against the state and record the call
    fn call<T>(
        &self,
        method: &str,
        username: Option<&str>,
        op: impl FnOnce(&mut MockState) -> Result<T>,
    ) -> Result<T> {
        let mut state = self.lock();
        let result = op(&mut *state);

        debug!(method, ok = result.is_ok(), "mock call");
        state.calls.push(CallLogEntry {
            method: method.to_string(),
            username: username.map(str::to_string),
            error: result.as_ref().err().map(|e| e.to_string()),
        });

        result
    }

    fn apply_plan(state: &mut MockState, username: &str, plan: &GrantPlan) {
        if !plan.unknown.is_empty() {
            warn!(%username, unknown = ?plan.unknown, "ignored permission names with no grantable permission");
        }
        debug!(
            %username,
            granted = ?plan.added_names(),
            revoked = ?plan.removed_names(),
            "applied grant plan"
        );
        plan.apply(&mut state.grants, username);
    }
}

impl Default for MockJenkins {
    fn default() -> Self {
        Self::new()
    }
}

fn require_realm(state: &MockState) -> Result<()> {
    if state.local_realm {
        Ok(())
    } else {
        Err(AdminError::Domain(REALM_ERROR.to_string()))
    }
}

fn require_matrix(state: &MockState) -> Result<()> {
    if state.matrix_authorization {
        Ok(())
    } else {
        Err(AdminError::Domain(MATRIX_ERROR.to_string()))
    }
}

impl JenkinsAdmin for MockJenkins {
    fn get_local_user(&self, username: &str) -> Result<LocalUser> {
        self.call("get_local_user", Some(username), |state| {
            require_realm(state)?;
            Ok(state.users.get(username).cloned().unwrap_or_default())
        })
    }

    fn create_local_user(&self, user: &NewLocalUser) -> Result<()> {
        self.call("create_local_user", Some(user.username.as_str()), |state| {
            validate_username(&user.username)?;
            require_realm(state)?;

            // The realm overwrites an existing account's details
            state.users.insert(
                user.username.clone(),
                LocalUser {
                    username: user.username.clone(),
                    fullname: user.fullname.clone(),
                    email: user.email.clone(),
                    description: user.effective_description().to_string(),
                    password_hash: hash_password(&user.username, &user.password),
                },
            );
            Ok(())
        })
    }

    fn delete_local_user(&self, username: &str) -> Result<()> {
        self.call("delete_local_user", Some(username), |state| {
            validate_username(username)?;
            require_realm(state)?;
            state.users.remove(username);
            Ok(())
        })
    }

    fn get_user_permissions(&self, username: &str) -> Result<UserPermissionSet> {
        self.call("get_user_permissions", Some(username), |state| {
            require_matrix(state)?;
            Ok(UserPermissionSet {
                username: username.to_string(),
                permissions: granted_names(&state.grants, username),
            })
        })
    }

    fn create_user_permissions(&self, username: &str, permissions: &[String]) -> Result<()> {
        self.call("create_user_permissions", Some(username), |state| {
            validate_username(username)?;
            require_matrix(state)?;
            let plan = plan_grant(&state.grants, &self.addressable, username, permissions);
            Self::apply_plan(state, username, &plan);
            Ok(())
        })
    }

    fn update_user_permissions(&self, username: &str, permissions: &[String]) -> Result<()> {
        self.call("update_user_permissions", Some(username), |state| {
            validate_username(username)?;
            require_matrix(state)?;
            let plan = plan_reconcile(&state.grants, &self.addressable, username, permissions);
            Self::apply_plan(state, username, &plan);
            Ok(())
        })
    }

    fn delete_user_permissions(&self, username: &str) -> Result<()> {
        self.call("delete_user_permissions", Some(username), |state| {
            validate_username(username)?;
            require_matrix(state)?;
            let plan = plan_revoke_all(&state.grants, username);
            Self::apply_plan(state, username, &plan);
            Ok(())
        })
    }

    fn list_permissions(&self) -> Result<Vec<String>> {
        self.call("list_permissions", None, |_| {
            Ok(self.addressable.keys().cloned().collect())
        })
    }
}
