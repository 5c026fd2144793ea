// TestDependencies - in-memory implementations for testing
//
// Provides an in-memory directory that implements every kernel trait, so the
// whole membership service can run without the directory web service.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use super::{
    AssignType, AttributeAssignment, AttributeKey, AttributeSubject, BaseAttributeStore,
    BaseGroupMembershipStore, BaseIdentityResolver, GroupingsDeps,
};
use crate::common::{Person, PersonId, StoreOutcome};
use crate::config::GroupingsConfig;
use crate::domains::membership::MembershipService;

// =============================================================================
// Recorded mutations
// =============================================================================

/// A mutation the directory received, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    AddMember { group: String, username: String },
    RemoveMember { group: String, username: String },
    SetAttribute { subject: AttributeSubject, key: AttributeKey, value: String },
    RemoveAttribute { subject: AttributeSubject, key: AttributeKey },
}

// =============================================================================
// In-memory directory
// =============================================================================

#[derive(Default)]
pub struct InMemoryDirectory {
    people: RwLock<Vec<Person>>,
    /// Group path -> member ids in insertion order
    groups: RwLock<HashMap<String, Vec<PersonId>>>,
    attributes: RwLock<HashMap<(AttributeSubject, AttributeKey), String>>,
    calls: RwLock<Vec<StoreCall>>,
    failing_groups: RwLock<HashSet<String>>,
    failing_writes: RwLock<HashSet<String>>,
    failing_attribute_writes: RwLock<HashSet<AttributeKey>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a person with the identity system
    pub fn with_person(self, username: &str, name: &str) -> Self {
        self.add_person(username, name);
        self
    }

    /// Seed a group's members, registering unknown usernames on the way
    pub fn with_members(self, group: impl Into<String>, usernames: &[&str]) -> Self {
        let group = group.into();
        for username in usernames {
            let person = self.ensure_person(username);
            let mut groups = self.groups.write().unwrap_or_else(|e| e.into_inner());
            let members = groups.entry(group.clone()).or_default();
            if !members.contains(&person.id) {
                members.push(person.id);
            }
        }
        self
    }

    /// Seed an attribute assignment
    pub fn with_attribute(self, subject: AttributeSubject, key: AttributeKey, value: &str) -> Self {
        self.attributes
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert((subject, key), value.to_string());
        self
    }

    /// Make every call touching `group` fail as if the directory were down
    pub fn failing_group(self, group: impl Into<String>) -> Self {
        self.failing_groups
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(group.into());
        self
    }

    /// Make adds and removes on `group` fail while reads still succeed
    pub fn failing_writes_to(self, group: impl Into<String>) -> Self {
        self.failing_writes
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(group.into());
        self
    }

    /// Make every set or remove of `key` fail
    pub fn failing_attribute_writes(self, key: AttributeKey) -> Self {
        self.failing_attribute_writes
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key);
        self
    }

    /// Register a person and return it
    pub fn add_person(&self, username: &str, name: &str) -> Person {
        let person = Person::new(username, name);
        self.people
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(person.clone());
        person
    }

    fn ensure_person(&self, username: &str) -> Person {
        match self.person(username) {
            Some(person) => person,
            None => self.add_person(username, &format!("{} Test", username)),
        }
    }

    /// Look up a registered person by username
    pub fn person(&self, username: &str) -> Option<Person> {
        self.people
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|p| p.username == username)
            .cloned()
    }

    fn person_by_id(&self, id: &PersonId) -> Option<Person> {
        self.people
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|p| &p.id == id)
            .cloned()
    }

    /// Usernames currently in a group, in insertion order
    pub fn usernames_in(&self, group: &str) -> Vec<String> {
        let ids = self
            .groups
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(group)
            .cloned()
            .unwrap_or_default();
        ids.iter()
            .filter_map(|id| self.person_by_id(id))
            .map(|p| p.username)
            .collect()
    }

    /// Check if a username is directly in a group
    pub fn contains(&self, group: &str, username: &str) -> bool {
        self.usernames_in(group).iter().any(|u| u == username)
    }

    /// Current value of an attribute assignment
    pub fn attribute(&self, subject: &AttributeSubject, key: AttributeKey) -> Option<String> {
        self.attributes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(subject.clone(), key))
            .cloned()
    }

    /// Get all mutations received so far
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Forget recorded mutations (e.g. after seeding through the service)
    pub fn clear_calls(&self) {
        self.calls.write().unwrap_or_else(|e| e.into_inner()).clear();
    }

    fn record(&self, call: StoreCall) {
        self.calls
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    fn ensure_reachable(&self, group: &str) -> Result<()> {
        if self
            .failing_groups
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(group)
        {
            return Err(anyhow!("directory unavailable for group {}", group));
        }
        Ok(())
    }

    fn ensure_writable(&self, group: &str) -> Result<()> {
        self.ensure_reachable(group)?;
        if self
            .failing_writes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(group)
        {
            return Err(anyhow!("directory rejected write to group {}", group));
        }
        Ok(())
    }

    fn ensure_attribute_writable(
        &self,
        subject: &AttributeSubject,
        key: AttributeKey,
    ) -> Result<()> {
        self.ensure_subject_reachable(subject)?;
        if self
            .failing_attribute_writes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&key)
        {
            return Err(anyhow!("directory rejected write of attribute {:?}", key));
        }
        Ok(())
    }

    fn ensure_subject_reachable(&self, subject: &AttributeSubject) -> Result<()> {
        match subject {
            AttributeSubject::Group(group) => self.ensure_reachable(group),
            AttributeSubject::Membership { group, .. } => self.ensure_reachable(group),
        }
    }
}

#[async_trait]
impl BaseGroupMembershipStore for InMemoryDirectory {
    async fn add_member(&self, group: &str, person: &Person) -> Result<StoreOutcome> {
        self.ensure_writable(group)?;
        self.record(StoreCall::AddMember {
            group: group.to_string(),
            username: person.username.clone(),
        });

        let mut groups = self.groups.write().unwrap_or_else(|e| e.into_inner());
        let members = groups.entry(group.to_string()).or_default();
        if members.contains(&person.id) {
            return Ok(StoreOutcome::Unchanged);
        }
        members.push(person.id);
        Ok(StoreOutcome::Changed)
    }

    async fn remove_member(&self, group: &str, person: &Person) -> Result<StoreOutcome> {
        self.ensure_writable(group)?;
        self.record(StoreCall::RemoveMember {
            group: group.to_string(),
            username: person.username.clone(),
        });

        let mut groups = self.groups.write().unwrap_or_else(|e| e.into_inner());
        let Some(members) = groups.get_mut(group) else {
            return Ok(StoreOutcome::Unchanged);
        };
        let before = members.len();
        members.retain(|id| id != &person.id);
        if members.len() == before {
            Ok(StoreOutcome::Unchanged)
        } else {
            Ok(StoreOutcome::Changed)
        }
    }

    async fn get_members(&self, group: &str) -> Result<Vec<Person>> {
        self.ensure_reachable(group)?;
        let ids = self
            .groups
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(group)
            .cloned()
            .unwrap_or_default();
        Ok(ids.iter().filter_map(|id| self.person_by_id(id)).collect())
    }

    async fn is_member(&self, group: &str, person: &PersonId) -> Result<bool> {
        self.ensure_reachable(group)?;
        Ok(self
            .groups
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(group)
            .is_some_and(|members| members.contains(person)))
    }

    async fn get_groups(&self, person: &PersonId) -> Result<Vec<String>> {
        let mut paths: Vec<String> = self
            .groups
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|(_, members)| members.contains(person))
            .map(|(path, _)| path.clone())
            .collect();
        paths.sort();
        Ok(paths)
    }
}

#[async_trait]
impl BaseAttributeStore for InMemoryDirectory {
    async fn get_attribute(
        &self,
        subject: &AttributeSubject,
        key: AttributeKey,
    ) -> Result<Option<String>> {
        self.ensure_subject_reachable(subject)?;
        Ok(self.attribute(subject, key))
    }

    async fn set_attribute(
        &self,
        subject: &AttributeSubject,
        key: AttributeKey,
        value: &str,
    ) -> Result<()> {
        self.ensure_attribute_writable(subject, key)?;
        self.record(StoreCall::SetAttribute {
            subject: subject.clone(),
            key,
            value: value.to_string(),
        });
        self.attributes
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert((subject.clone(), key), value.to_string());
        Ok(())
    }

    async fn remove_attribute(&self, subject: &AttributeSubject, key: AttributeKey) -> Result<()> {
        self.ensure_attribute_writable(subject, key)?;
        self.record(StoreCall::RemoveAttribute {
            subject: subject.clone(),
            key,
        });
        self.attributes
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&(subject.clone(), key));
        Ok(())
    }

    async fn query_assignments(
        &self,
        assign_type: AssignType,
        subject: &AttributeSubject,
        key: AttributeKey,
    ) -> Result<Vec<AttributeAssignment>> {
        self.ensure_subject_reachable(subject)?;
        if subject.assign_type() != assign_type {
            return Ok(vec![]);
        }
        Ok(self
            .attribute(subject, key)
            .map(|value| AttributeAssignment {
                subject: subject.clone(),
                key,
                value,
            })
            .into_iter()
            .collect())
    }
}

#[async_trait]
impl BaseIdentityResolver for InMemoryDirectory {
    async fn lookup(&self, identifier: &str) -> Result<Option<Person>> {
        Ok(self
            .people
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|p| p.username == identifier || p.id.to_string() == identifier)
            .cloned())
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub directory: Arc<InMemoryDirectory>,
    pub config: GroupingsConfig,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            directory: Arc::new(InMemoryDirectory::new()),
            config: GroupingsConfig::default(),
        }
    }

    /// Set the in-memory directory
    pub fn directory(mut self, directory: InMemoryDirectory) -> Self {
        self.directory = Arc::new(directory);
        self
    }

    /// Set the configuration
    pub fn config(mut self, config: GroupingsConfig) -> Self {
        self.config = config;
        self
    }

    /// Convert into GroupingsDeps backed by the shared directory
    pub fn into_deps(self) -> Arc<GroupingsDeps> {
        Arc::new(GroupingsDeps::new(
            self.directory.clone(),
            self.directory.clone(),
            self.directory,
            self.config,
        ))
    }

    /// Convert into a ready-to-use MembershipService
    pub fn into_service(self) -> MembershipService {
        MembershipService::with_deps(self.into_deps())
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
