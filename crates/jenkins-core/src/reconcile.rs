//! Grant reconciliation as a pure two-list diff
//!
//! The functions here take a snapshot of the global matrix (permission id
//! mapped to its grantees) and a desired set of canonical names, and return
//! the permissions to add and remove for one user. The Groovy scripts compute
//! the same two lists server-side, then apply them in a single execution.

use std::collections::{BTreeMap, BTreeSet};

use crate::permission::{encode, AddressableTable};

/// Internal permission id -> usernames holding it
pub type GrantTable = BTreeMap<String, BTreeSet<String>>;

/// Changes needed to move one user's grants to a desired state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantPlan {
    /// Internal ids to grant
    pub to_add: Vec<String>,
    /// Internal ids to revoke
    pub to_remove: Vec<String>,
    /// Desired names that resolve to no addressable permission
    pub unknown: Vec<String>,
}

impl GrantPlan {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Apply additions first, then removals
    pub fn apply(&self, table: &mut GrantTable, username: &str) {
        for id in &self.to_add {
            table
                .entry(id.clone())
                .or_default()
                .insert(username.to_string());
        }
        for id in &self.to_remove {
            if let Some(grantees) = table.get_mut(id) {
                grantees.remove(username);
            }
        }
    }

    /// Canonical names of the additions
    pub fn added_names(&self) -> Vec<String> {
        self.to_add.iter().map(|id| encode(id)).collect()
    }

    /// Canonical names of the removals
    pub fn removed_names(&self) -> Vec<String> {
        self.to_remove.iter().map(|id| encode(id)).collect()
    }
}

fn held_by<'a>(table: &'a GrantTable, username: &'a str) -> impl Iterator<Item = &'a String> {
    table
        .iter()
        .filter(move |(_, grantees)| grantees.contains(username))
        .map(|(id, _)| id)
}

/// Canonical names currently granted to `username`
pub fn granted_names(table: &GrantTable, username: &str) -> BTreeSet<String> {
    held_by(table, username).map(|id| encode(id)).collect()
}

/// Additions for every resolvable desired name not yet held. Never removes.
pub fn plan_grant(
    table: &GrantTable,
    addressable: &AddressableTable,
    username: &str,
    desired: &[String],
) -> GrantPlan {
    let held: BTreeSet<&String> = held_by(table, username).collect();
    let mut plan = GrantPlan::default();

    for name in desired {
        match addressable.get(name) {
            Some(permission) => {
                if !held.contains(&permission.id) && !plan.to_add.contains(&permission.id) {
                    plan.to_add.push(permission.id.clone());
                }
            }
            None => {
                if !plan.unknown.contains(name) {
                    plan.unknown.push(name.clone());
                }
            }
        }
    }

    plan
}

/// Grant everything desired and revoke every held permission whose canonical
/// name is not desired. A permission both held and desired is left alone.
pub fn plan_reconcile(
    table: &GrantTable,
    addressable: &AddressableTable,
    username: &str,
    desired: &[String],
) -> GrantPlan {
    let mut plan = plan_grant(table, addressable, username, desired);
    let wanted: BTreeSet<&str> = desired.iter().map(String::as_str).collect();

    plan.to_remove = held_by(table, username)
        .filter(|id| !wanted.contains(encode(id).as_str()))
        .cloned()
        .collect();

    plan
}

/// Revoke every permission held by `username`
pub fn plan_revoke_all(table: &GrantTable, username: &str) -> GrantPlan {
    GrantPlan {
        to_remove: held_by(table, username).cloned().collect(),
        ..Default::default()
    }
}
