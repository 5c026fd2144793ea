//! Remove people from a grouping's include or exclude group

use futures::stream::{self, StreamExt};
use tracing::{error, info, warn};

use super::attributes::stamp_changed;
use super::legs::run_step;
use crate::common::auth::check_is_owner_or_admin;
use crate::common::{GroupingsError, StoreOutcome};
use crate::domains::grouping::{plan_remove, GroupPath, MembershipPlan};
use crate::domains::membership::models::RemoveMemberResult;
use crate::kernel::GroupingsDeps;

/// Remove each identified person from `group`. The opposite path is never touched.
pub async fn remove_grouping_members(
    actor: &str,
    group: &GroupPath,
    identifiers: &[String],
    deps: &GroupingsDeps,
) -> Result<Vec<RemoveMemberResult>, GroupingsError> {
    check_is_owner_or_admin(actor, &group.grouping, deps).await?;
    let plan = plan_remove(&group.grouping, group.kind)?;

    info!(
        actor,
        group = %group,
        count = identifiers.len(),
        "Removing grouping members"
    );

    let results: Vec<RemoveMemberResult> = stream::iter(identifiers)
        .map(|identifier| remove_person(identifier, &plan, deps))
        .buffered(deps.config.batch_concurrency.max(1))
        .collect()
        .await;

    if results.iter().any(|r| r.user_was_removed) {
        stamp_changed(std::slice::from_ref(group), deps).await;
    }

    Ok(results)
}

async fn remove_person(
    identifier: &str,
    plan: &MembershipPlan,
    deps: &GroupingsDeps,
) -> RemoveMemberResult {
    let person = match deps.identity.lookup(identifier).await {
        Ok(Some(person)) => person,
        Ok(None) => {
            warn!(identifier, "Unknown person, skipping removal");
            return RemoveMemberResult::not_found(identifier);
        }
        Err(e) => {
            error!(identifier, error = %e, "Identity lookup failed");
            let mut result = RemoveMemberResult::not_found(identifier);
            result.reason = Some(e.to_string());
            return result;
        }
    };

    let Some(step) = plan.steps.first() else {
        return RemoveMemberResult::not_found(identifier);
    };
    let leg = run_step(step, &person, deps).await;
    let path = leg.path.to_string();

    if let Some(reason) = leg.failure() {
        error!(person = %person.username, group = %path, %reason, "Removal failed");
        let mut result = RemoveMemberResult::failed(identifier, path, reason);
        result.user_was_removed = leg.changed();
        return result;
    }

    match leg.outcome {
        Ok(StoreOutcome::Changed) => RemoveMemberResult::removed(identifier, path, &person),
        _ => {
            let reason = format!("{} is not a member of {}", person.username, path);
            RemoveMemberResult::failed(identifier, path, reason)
        }
    }
}
