//! Add people to a grouping's include or exclude group

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use super::attributes::stamp_changed;
use super::legs::{run_step, Leg};
use crate::common::auth::check_is_owner_or_admin;
use crate::common::GroupingsError;
use crate::domains::grouping::{plan_add, GroupPath, MembershipPlan};
use crate::domains::membership::models::{AddMemberResult, ResultCode};
use crate::kernel::GroupingsDeps;

/// Add each identified person to `group` (include or exclude).
///
/// Every person is first taken out of the opposite path. People are handled
/// independently and concurrently; results come back in input order. Unknown
/// people and store failures become FAILURE records, never errors.
pub async fn add_grouping_members(
    actor: &str,
    group: &GroupPath,
    identifiers: &[String],
    deps: &GroupingsDeps,
) -> Result<Vec<AddMemberResult>, GroupingsError> {
    check_is_owner_or_admin(actor, &group.grouping, deps).await?;
    let plan = plan_add(&group.grouping, group.kind)?;

    info!(
        actor,
        group = %group,
        count = identifiers.len(),
        "Adding grouping members"
    );

    let outcomes: Vec<(AddMemberResult, Vec<GroupPath>)> = stream::iter(identifiers)
        .map(|identifier| add_person(identifier, &plan, deps))
        .buffered(deps.config.batch_concurrency.max(1))
        .collect()
        .await;

    let mut changed: Vec<GroupPath> = Vec::new();
    let mut results = Vec::with_capacity(outcomes.len());
    for (result, touched) in outcomes {
        for path in touched {
            if !changed.contains(&path) {
                changed.push(path);
            }
        }
        results.push(result);
    }

    stamp_changed(&changed, deps).await;
    Ok(results)
}

async fn add_person(
    identifier: &str,
    plan: &MembershipPlan,
    deps: &GroupingsDeps,
) -> (AddMemberResult, Vec<GroupPath>) {
    let person = match deps.identity.lookup(identifier).await {
        Ok(Some(person)) => person,
        Ok(None) => {
            warn!(identifier, "Unknown person, skipping add");
            return (AddMemberResult::not_found(identifier), Vec::new());
        }
        Err(e) => {
            error!(identifier, error = %e, "Identity lookup failed");
            let mut result = AddMemberResult::not_found(identifier);
            result.reason = Some(e.to_string());
            return (result, Vec::new());
        }
    };

    let mut legs: Vec<Leg> = Vec::with_capacity(plan.steps.len());
    for step in &plan.steps {
        legs.push(run_step(step, &person, deps).await);
    }

    let touched = legs
        .iter()
        .filter(|leg| leg.changed())
        .map(|leg| leg.path.clone())
        .collect();

    let failure = legs.iter().find_map(Leg::failure);
    let removed = legs
        .iter()
        .find(|leg| Some(&leg.path) == plan.removed_from())
        .is_some_and(Leg::changed);

    let mut result = AddMemberResult {
        user_identifier: identifier.to_string(),
        result: ResultCode::Success,
        reason: None,
        path_of_add: plan.added_to().map(ToString::to_string),
        path_of_removed: plan.removed_from().map(ToString::to_string),
        was_removed_from_opposite: removed,
        uid: None,
        uh_uuid: None,
        name: None,
    };

    match failure {
        Some(reason) => {
            error!(person = %person.username, %reason, "Add failed");
            result.result = ResultCode::Failure;
            result.reason = Some(reason);
        }
        None => {
            debug!(person = %person.username, removed, "Added member");
            result.uid = Some(person.username.clone());
            result.uh_uuid = Some(person.id.to_string());
            result.name = Some(person.name.clone());
        }
    }

    (result, touched)
}
