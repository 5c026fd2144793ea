// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Composite resolution and authorization are domain functions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseAttributeStore)

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::{Person, PersonId, StoreOutcome};

// =============================================================================
// Group Membership Store Trait (Infrastructure - directory web service)
// =============================================================================

#[async_trait]
pub trait BaseGroupMembershipStore: Send + Sync {
    /// Add a person to a single named group
    async fn add_member(&self, group: &str, person: &Person) -> Result<StoreOutcome>;

    /// Remove a person from a single named group
    async fn remove_member(&self, group: &str, person: &Person) -> Result<StoreOutcome>;

    /// Current members of a single named group (empty if the group has none)
    async fn get_members(&self, group: &str) -> Result<Vec<Person>>;

    /// Check direct membership of a person in a single named group
    async fn is_member(&self, group: &str, person: &PersonId) -> Result<bool>;

    /// Paths of every group the person is a direct member of
    async fn get_groups(&self, person: &PersonId) -> Result<Vec<String>>;
}

// =============================================================================
// Attribute Store Trait (Infrastructure - attribute assignments)
// =============================================================================

/// Attribute names assigned to groups and memberships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeKey {
    OptIn,
    OptOut,
    Listserv,
    SelfOpted,
    LastModified,
}

impl AttributeKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKey::OptIn => "uh-settings:attributes:for-groups:uh-grouping:anyone-can:opt-in",
            AttributeKey::OptOut => "uh-settings:attributes:for-groups:uh-grouping:anyone-can:opt-out",
            AttributeKey::Listserv => {
                "uh-settings:attributes:for-groups:uh-grouping:destinations:listserv"
            }
            AttributeKey::SelfOpted => {
                "uh-settings:attributes:for-memberships:uh-grouping:self-opted"
            }
            AttributeKey::LastModified => {
                "uh-settings:attributes:for-groups:last-modified:yyyymmddThhmm"
            }
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an attribute is assigned to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttributeSubject {
    /// A group, by path
    Group(String),
    /// One person's membership in one group
    Membership { group: String, person: PersonId },
}

impl AttributeSubject {
    pub fn group(path: impl Into<String>) -> Self {
        AttributeSubject::Group(path.into())
    }

    pub fn membership(group: impl Into<String>, person: PersonId) -> Self {
        AttributeSubject::Membership {
            group: group.into(),
            person,
        }
    }

    pub fn assign_type(&self) -> AssignType {
        match self {
            AttributeSubject::Group(_) => AssignType::Group,
            AttributeSubject::Membership { .. } => AssignType::ImmediateMembership,
        }
    }
}

/// Assignment type used when querying assignments back from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignType {
    Group,
    ImmediateMembership,
}

/// One stored (subject, key, value) triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeAssignment {
    pub subject: AttributeSubject,
    pub key: AttributeKey,
    pub value: String,
}

#[async_trait]
pub trait BaseAttributeStore: Send + Sync {
    /// Read the single outstanding value for (subject, key)
    async fn get_attribute(
        &self,
        subject: &AttributeSubject,
        key: AttributeKey,
    ) -> Result<Option<String>>;

    /// Write a value for (subject, key), replacing any previous value
    async fn set_attribute(
        &self,
        subject: &AttributeSubject,
        key: AttributeKey,
        value: &str,
    ) -> Result<()>;

    /// Drop the assignment for (subject, key); absent assignments are not an error
    async fn remove_attribute(&self, subject: &AttributeSubject, key: AttributeKey) -> Result<()>;

    /// Assignments of the given type for (subject, key), as the store reports them
    async fn query_assignments(
        &self,
        assign_type: AssignType,
        subject: &AttributeSubject,
        key: AttributeKey,
    ) -> Result<Vec<AttributeAssignment>>;
}

// =============================================================================
// Identity Resolver Trait (Infrastructure - person directory)
// =============================================================================

#[async_trait]
pub trait BaseIdentityResolver: Send + Sync {
    /// Resolve a username or stable id string. `None` means the person is unknown.
    async fn lookup(&self, identifier: &str) -> Result<Option<Person>>;
}
