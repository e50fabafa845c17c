//! Mapping between Jenkins permission ids and canonical short names
//!
//! Jenkins identifies a permission by a dotted id such as
//! `hudson.model.Item.Build`. Externally we address it by its last two
//! segments with a few group names rewritten, e.g. `Job/Build`.
//!
//! The constants here are also rendered into the Groovy scripts, so the
//! server-side resolution and this module always agree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Substring rewrites applied, in order, after joining the last two segments
pub const REWRITES: &[(&str, &str)] = &[
    ("Hudson", "Overall"),
    ("Computer", "Agent"),
    ("Item", "Job"),
    ("CredentialsProvider", "Credentials"),
    ("LockableResourcesManager", "LockableResources"),
];

/// Ids starting with this prefix are Jenkins-internal pseudo permissions
pub const INTERNAL_PREFIX: &str = "hudson.security.Permission";

/// Permissions that can never be granted through the matrix interface
pub const EXCLUDED_SUFFIXES: &[&str] = &["RunScripts", "UploadPlugins", "ConfigureUpdateCenter"];

/// A permission as the server knows it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDescriptor {
    pub id: String,
    pub enabled: bool,
}

impl PermissionDescriptor {
    pub fn new(id: impl Into<String>, enabled: bool) -> Self {
        Self {
            id: id.into(),
            enabled,
        }
    }

    pub fn canonical_name(&self) -> String {
        encode(&self.id)
    }
}

/// Canonical name -> grantable permission
pub type AddressableTable = BTreeMap<String, PermissionDescriptor>;

/// Apply the rewrite table to an already joined `Group/Action` name.
///
/// Each rewrite runs once, in table order. A replacement can form a new
/// match, so applying this twice may rewrite further; stock Jenkins ids do
/// not trigger that.
pub fn canonicalize(name: &str) -> String {
    REWRITES
        .iter()
        .fold(name.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Canonical short name for a dotted permission id
pub fn encode(internal_id: &str) -> String {
    let segments: Vec<&str> = internal_id.split('.').filter(|s| !s.is_empty()).collect();
    let tail = &segments[segments.len().saturating_sub(2)..];
    canonicalize(&tail.join("/"))
}

/// Whether a permission belongs to the addressable universe
pub fn is_addressable(permission: &PermissionDescriptor) -> bool {
    permission.enabled
        && !permission.id.starts_with(INTERNAL_PREFIX)
        && !EXCLUDED_SUFFIXES
            .iter()
            .any(|suffix| permission.id.ends_with(suffix))
}

/// Index every addressable permission by its canonical name.
///
/// When two ids share a canonical name the later one wins, which is what the
/// server-side lookup does as well.
pub fn build_addressable_table<'a, I>(all: I) -> AddressableTable
where
    I: IntoIterator<Item = &'a PermissionDescriptor>,
{
    all.into_iter()
        .filter(|p| is_addressable(p))
        .map(|p| (encode(&p.id), p.clone()))
        .collect()
}
