//! In-memory Jenkins model for jadmin testing
//!
//! [`MockJenkins`] implements the `JenkinsAdmin` trait against a private
//! user realm, a permission catalog, and a global matrix held in memory. It
//! uses the same permission codec and grant planner the script console
//! backend mirrors, so scenario tests exercise real reconciliation without a
//! Jenkins instance.
//!
//! ```
//! use jenkins_core::JenkinsAdmin;
//! use jenkins_mock::MockJenkins;
//!
//! let jenkins = MockJenkins::new();
//! jenkins
//!     .create_user_permissions("bob", &["Overall/Read".to_string()])
//!     .unwrap();
//! assert!(jenkins.get_user_permissions("bob").unwrap().contains("Overall/Read"));
//! ```

mod catalog;
mod client;

pub use catalog::default_catalog;
pub use client::{hash_password, CallLogEntry, MockJenkins, MATRIX_ERROR, REALM_ERROR};
