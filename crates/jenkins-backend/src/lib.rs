pub mod client;
mod convert;
pub mod envelope;
pub mod error;
pub mod groovy;
pub mod templates;
mod trait_impl;


pub use client::{basic_auth, build_agent, Crumb, JenkinsClient};
pub use envelope::{LocalUserData, PermissionCatalog, PermissionChanges, PermissionsData};
pub use error::{JenkinsError, Result};
pub use templates::{Command, CommandTemplates};

// Re-export jenkins-core types for convenience
pub use jenkins_core::{AdminError, JenkinsAdmin};
