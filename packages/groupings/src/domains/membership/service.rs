use std::sync::Arc;

use super::activities;
use super::models::{
    AddMemberResult, GroupingView, GroupingsServiceResult, Membership, RemoveMemberResult,
};
use crate::common::GroupingsError;
use crate::domains::grouping::{GroupPath, GroupingPath, GroupingSettings};
use crate::kernel::GroupingsDeps;

/// Public entry point for every grouping operation.
///
/// Cheap to clone; share it across tasks behind the inner `Arc`.
#[derive(Clone)]
pub struct MembershipService {
    deps: Arc<GroupingsDeps>,
}

impl MembershipService {
    pub fn with_deps(deps: Arc<GroupingsDeps>) -> Self {
        Self { deps }
    }

    pub fn deps(&self) -> &GroupingsDeps {
        &self.deps
    }

    // =========================================================================
    // Members
    // =========================================================================

    pub async fn add_grouping_members<I, S>(
        &self,
        actor: &str,
        group: &GroupPath,
        people: I,
    ) -> Result<Vec<AddMemberResult>, GroupingsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let people = collect(people);
        activities::add_grouping_members(actor, group, &people, &self.deps).await
    }

    pub async fn remove_grouping_members<I, S>(
        &self,
        actor: &str,
        group: &GroupPath,
        people: I,
    ) -> Result<Vec<RemoveMemberResult>, GroupingsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let people = collect(people);
        activities::remove_grouping_members(actor, group, &people, &self.deps).await
    }

    pub async fn is_member(&self, group: &GroupPath, person: &str) -> Result<bool, GroupingsError> {
        activities::is_member(group, person, &self.deps).await
    }

    // =========================================================================
    // Self-opt
    // =========================================================================

    pub async fn is_group_can_opt_in(
        &self,
        person: &str,
        grouping: impl AsRef<GroupingPath>,
    ) -> Result<bool, GroupingsError> {
        activities::is_group_can_opt_in(person, grouping, &self.deps).await
    }

    pub async fn is_group_can_opt_out(
        &self,
        person: &str,
        grouping: impl AsRef<GroupingPath>,
    ) -> Result<bool, GroupingsError> {
        activities::is_group_can_opt_out(person, grouping, &self.deps).await
    }

    pub async fn opt_in(
        &self,
        actor: &str,
        grouping: &GroupingPath,
        person: &str,
    ) -> Result<Vec<GroupingsServiceResult>, GroupingsError> {
        activities::opt_in(actor, grouping, person, &self.deps).await
    }

    pub async fn opt_out(
        &self,
        actor: &str,
        grouping: &GroupingPath,
        person: &str,
    ) -> Result<Vec<GroupingsServiceResult>, GroupingsError> {
        activities::opt_out(actor, grouping, person, &self.deps).await
    }

    pub async fn add_self_opted(
        &self,
        actor: &str,
        group: &GroupPath,
        person: &str,
    ) -> Result<GroupingsServiceResult, GroupingsError> {
        activities::add_self_opted(actor, group, person, &self.deps).await
    }

    pub async fn remove_self_opted(
        &self,
        actor: &str,
        group: &GroupPath,
        person: &str,
    ) -> Result<GroupingsServiceResult, GroupingsError> {
        activities::remove_self_opted(actor, group, person, &self.deps).await
    }

    pub async fn is_self_opted(
        &self,
        group: &GroupPath,
        person: &str,
    ) -> Result<bool, GroupingsError> {
        activities::is_self_opted(group, person, &self.deps).await
    }

    // =========================================================================
    // Admins and owners
    // =========================================================================

    pub async fn add_admin(
        &self,
        actor: &str,
        target: &str,
    ) -> Result<GroupingsServiceResult, GroupingsError> {
        activities::add_admin(actor, target, &self.deps).await
    }

    pub async fn delete_admin(
        &self,
        actor: &str,
        target: &str,
    ) -> Result<GroupingsServiceResult, GroupingsError> {
        activities::delete_admin(actor, target, &self.deps).await
    }

    pub async fn assign_ownership(
        &self,
        actor: &str,
        grouping: &GroupingPath,
        target: &str,
    ) -> Result<GroupingsServiceResult, GroupingsError> {
        activities::assign_ownership(actor, grouping, target, &self.deps).await
    }

    pub async fn remove_ownership(
        &self,
        actor: &str,
        grouping: &GroupingPath,
        target: &str,
    ) -> Result<GroupingsServiceResult, GroupingsError> {
        activities::remove_ownership(actor, grouping, target, &self.deps).await
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    pub async fn grouping_settings(
        &self,
        grouping: &GroupingPath,
    ) -> Result<GroupingSettings, GroupingsError> {
        activities::grouping_settings(grouping, &self.deps).await
    }

    pub async fn change_opt_in_status(
        &self,
        actor: &str,
        grouping: &GroupingPath,
        enabled: bool,
    ) -> Result<GroupingsServiceResult, GroupingsError> {
        activities::change_opt_in_status(actor, grouping, enabled, &self.deps).await
    }

    pub async fn change_opt_out_status(
        &self,
        actor: &str,
        grouping: &GroupingPath,
        enabled: bool,
    ) -> Result<GroupingsServiceResult, GroupingsError> {
        activities::change_opt_out_status(actor, grouping, enabled, &self.deps).await
    }

    pub async fn change_listserv_status(
        &self,
        actor: &str,
        grouping: &GroupingPath,
        enabled: bool,
    ) -> Result<GroupingsServiceResult, GroupingsError> {
        activities::change_listserv_status(actor, grouping, enabled, &self.deps).await
    }

    pub async fn update_last_modified(
        &self,
        group: &GroupPath,
    ) -> Result<GroupingsServiceResult, GroupingsError> {
        activities::update_last_modified(group, &self.deps).await
    }

    // =========================================================================
    // Views
    // =========================================================================

    pub async fn get_membership_results(
        &self,
        actor: &str,
        person: &str,
    ) -> Result<Vec<Membership>, GroupingsError> {
        activities::get_membership_results(actor, person, &self.deps).await
    }

    pub async fn get_grouping(
        &self,
        actor: &str,
        grouping: &GroupingPath,
    ) -> Result<GroupingView, GroupingsError> {
        activities::get_grouping(actor, grouping, &self.deps).await
    }
}

fn collect<I, S>(people: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    people.into_iter().map(Into::into).collect()
}
