//! Admin and owner management
//!
//! Both relations are plain group memberships (the configured admins group and
//! a grouping's owners group), so they share one idempotent add/remove path.

use tracing::{info, warn};

use crate::common::auth::{check_is_admin, check_is_owner_or_admin};
use crate::common::{GroupingsError, StoreOutcome, SUCCESS_ALREADY_EXISTED, SUCCESS_WASNT_IMMEDIATE};
use crate::domains::grouping::GroupingPath;
use crate::domains::membership::models::GroupingsServiceResult;
use crate::kernel::GroupingsDeps;

#[derive(Debug, Clone, Copy)]
enum Change {
    Grant,
    Revoke,
}

pub async fn add_admin(
    actor: &str,
    target: &str,
    deps: &GroupingsDeps,
) -> Result<GroupingsServiceResult, GroupingsError> {
    check_is_admin(actor, deps).await?;
    change_relation(&deps.config.admins_group, target, Change::Grant, deps).await
}

pub async fn delete_admin(
    actor: &str,
    target: &str,
    deps: &GroupingsDeps,
) -> Result<GroupingsServiceResult, GroupingsError> {
    check_is_admin(actor, deps).await?;
    change_relation(&deps.config.admins_group, target, Change::Revoke, deps).await
}

pub async fn assign_ownership(
    actor: &str,
    grouping: &GroupingPath,
    target: &str,
    deps: &GroupingsDeps,
) -> Result<GroupingsServiceResult, GroupingsError> {
    check_is_owner_or_admin(actor, grouping, deps).await?;
    change_relation(&grouping.owners().to_string(), target, Change::Grant, deps).await
}

pub async fn remove_ownership(
    actor: &str,
    grouping: &GroupingPath,
    target: &str,
    deps: &GroupingsDeps,
) -> Result<GroupingsServiceResult, GroupingsError> {
    check_is_owner_or_admin(actor, grouping, deps).await?;
    change_relation(&grouping.owners().to_string(), target, Change::Revoke, deps).await
}

async fn change_relation(
    group: &str,
    target: &str,
    change: Change,
    deps: &GroupingsDeps,
) -> Result<GroupingsServiceResult, GroupingsError> {
    let Some(person) = deps.identity.lookup(target).await? else {
        warn!(identifier = target, group, "Unknown person");
        return Ok(GroupingsServiceResult::failure(format!(
            "{} is not a known person",
            target
        )));
    };

    let store = &deps.membership_store;
    let result = match change {
        Change::Grant => match store.add_member(group, &person).await? {
            StoreOutcome::Changed => {
                GroupingsServiceResult::success(format!("added {} to {}", person.username, group))
            }
            StoreOutcome::Unchanged => GroupingsServiceResult::with_code(
                SUCCESS_ALREADY_EXISTED,
                format!("{} was already in {}", person.username, group),
            ),
        },
        Change::Revoke => match store.remove_member(group, &person).await? {
            StoreOutcome::Changed => GroupingsServiceResult::success(format!(
                "deleted {} from {}",
                person.username, group
            )),
            StoreOutcome::Unchanged => GroupingsServiceResult::with_code(
                SUCCESS_WASNT_IMMEDIATE,
                format!("{} was not in {}", person.username, group),
            ),
        },
    };

    info!(person = %person.username, group, ?change, code = %result.result_code, "Changed relation");
    Ok(result)
}
