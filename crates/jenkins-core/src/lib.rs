pub mod error;
pub mod models;
pub mod permission;
pub mod reconcile;
pub mod traits;

pub use error::{AdminError, Result};
pub use models::*;
pub use permission::{
    build_addressable_table, canonicalize, encode, is_addressable, AddressableTable,
    PermissionDescriptor, EXCLUDED_SUFFIXES, INTERNAL_PREFIX, REWRITES,
};
pub use reconcile::{
    granted_names, plan_grant, plan_reconcile, plan_revoke_all, GrantPlan, GrantTable,
};
pub use traits::JenkinsAdmin;
