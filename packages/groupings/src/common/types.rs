// Common types used across multiple domains and layers
//
// These types are shared between the kernel and domain layers to avoid
// circular dependencies while maintaining type safety.

use serde::{Deserialize, Serialize};

use super::PersonId;

/// Result code prefix for every successful outcome.
pub const SUCCESS: &str = "SUCCESS";

/// Result code prefix for every failed outcome.
pub const FAILURE: &str = "FAILURE";

/// Directory result code for an add that found the member already present.
pub const SUCCESS_ALREADY_EXISTED: &str = "SUCCESS_ALREADY_EXISTED";

/// Directory result code for a removal that found nothing to remove.
pub const SUCCESS_WASNT_IMMEDIATE: &str = "SUCCESS_WASNT_IMMEDIATE";

/// A person as resolved by the identity system
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: PersonId,
    /// Login name (uid), human readable but not guaranteed stable
    pub username: String,
    /// Display name
    pub name: String,
}

impl Person {
    pub fn new(username: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: PersonId::new(),
            username: username.into(),
            name: name.into(),
        }
    }
}

/// Members of one underlying or derived group
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub path: String,
    pub members: Vec<Person>,
}

impl Group {
    pub fn new(path: impl Into<String>, members: Vec<Person>) -> Self {
        Self {
            path: path.into(),
            members,
        }
    }

    pub fn usernames(&self) -> Vec<String> {
        self.members.iter().map(|p| p.username.clone()).collect()
    }

    pub fn contains(&self, id: &PersonId) -> bool {
        self.members.iter().any(|p| &p.id == id)
    }
}

/// Outcome of one store mutation that did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// The group changed
    Changed,
    /// The group already was in the requested state
    Unchanged,
}

impl StoreOutcome {
    pub fn is_changed(self) -> bool {
        matches!(self, StoreOutcome::Changed)
    }
}
