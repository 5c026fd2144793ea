//! Self-service opt-in/opt-out and the self-opted marker

use futures::try_join;
use tracing::{error, info};

use super::attributes::stamp_changed;
use super::legs::{load_classification, run_step, Leg};
use crate::common::auth::check_is_self;
use crate::common::{
    GroupingsError, Person, SUCCESS, SUCCESS_ALREADY_EXISTED, SUCCESS_WASNT_IMMEDIATE,
};
use crate::domains::grouping::{
    check_self_opt, plan_add, GroupKind, GroupPath, GroupingPath, GroupingSettings, PlanStep,
    SelfOptRejection,
};
use crate::domains::membership::models::GroupingsServiceResult;
use crate::kernel::{AttributeKey, AttributeSubject, GroupingsDeps};

const MARKER: &str = "true";

/// Person opts themselves into the grouping (joins include).
pub async fn opt_in(
    actor: &str,
    grouping: &GroupingPath,
    username: &str,
    deps: &GroupingsDeps,
) -> Result<Vec<GroupingsServiceResult>, GroupingsError> {
    self_opt(actor, grouping, username, GroupKind::Include, deps).await
}

/// Person opts themselves out of the grouping (joins exclude).
pub async fn opt_out(
    actor: &str,
    grouping: &GroupingPath,
    username: &str,
    deps: &GroupingsDeps,
) -> Result<Vec<GroupingsServiceResult>, GroupingsError> {
    self_opt(actor, grouping, username, GroupKind::Exclude, deps).await
}

async fn self_opt(
    actor: &str,
    grouping: &GroupingPath,
    username: &str,
    target: GroupKind,
    deps: &GroupingsDeps,
) -> Result<Vec<GroupingsServiceResult>, GroupingsError> {
    let person = act_as(actor, username, deps).await?;

    let (settings, classification) = try_join!(
        GroupingSettings::load(grouping, deps.attribute_store.as_ref()),
        load_classification(grouping, &person.id, deps),
    )?;

    if let Err(rejection) = check_self_opt(&settings, &classification, target) {
        info!(person = %person.username, grouping = %grouping, %rejection, "Self-opt rejected");
        return Ok(vec![rejected(&person, &grouping.group(target), rejection)]);
    }

    let plan = plan_add(grouping, target)?;
    let mut legs: Vec<Leg> = Vec::with_capacity(plan.steps.len());
    for step in &plan.steps {
        legs.push(run_step(step, &person, deps).await);
    }

    let changed: Vec<GroupPath> = legs
        .iter()
        .filter(|leg| leg.changed())
        .map(|leg| leg.path.clone())
        .collect();
    stamp_changed(&changed, deps).await;

    let mut results = Vec::with_capacity(legs.len() + 1);
    let mut all_legs_ok = true;
    for (step, leg) in plan.steps.iter().zip(&legs) {
        if let Some(reason) = leg.failure() {
            error!(person = %person.username, %reason, "Self-opt leg failed");
            all_legs_ok = false;
            results.push(GroupingsServiceResult::failure(reason));
            continue;
        }
        results.push(leg_result(step, leg, &person));
    }

    let target_path = grouping.group(target);
    if !all_legs_ok {
        return Ok(results);
    }

    match write_marker(&person, &target_path, deps).await {
        Ok(result) => results.push(result),
        Err(e) => {
            error!(person = %person.username, group = %target_path, error = %e, "Failed to write self-opted marker");
            results.push(GroupingsServiceResult::failure(format!(
                "{}: self-opted marker was not written: {}",
                target_path, e
            )));
            return Ok(results);
        }
    }

    info!(person = %person.username, group = %target_path, "Self-opted");
    Ok(results)
}

fn leg_result(step: &PlanStep, leg: &Leg, person: &Person) -> GroupingsServiceResult {
    let path = &leg.path;
    match (step, leg.changed()) {
        (PlanStep::Remove(_), true) => {
            GroupingsServiceResult::success(format!("deleted {} from {}", person.username, path))
        }
        (PlanStep::Remove(_), false) => GroupingsServiceResult::with_code(
            SUCCESS_WASNT_IMMEDIATE,
            format!("{} was not in {}", person.username, path),
        ),
        (PlanStep::Add(_), true) => {
            GroupingsServiceResult::success(format!("added {} to {}", person.username, path))
        }
        (PlanStep::Add(_), false) => GroupingsServiceResult::with_code(
            SUCCESS_ALREADY_EXISTED,
            format!("{} was already in {}", person.username, path),
        ),
    }
}

/// Mark an existing include/exclude membership as self-opted.
pub async fn add_self_opted(
    actor: &str,
    group: &GroupPath,
    username: &str,
    deps: &GroupingsDeps,
) -> Result<GroupingsServiceResult, GroupingsError> {
    let person = act_as(actor, username, deps).await?;
    if let Some(failure) = check_marker_target(&person, group, deps).await? {
        return Ok(failure);
    }
    write_marker(&person, group, deps).await
}

/// Drop the self-opted marker from an include/exclude membership.
pub async fn remove_self_opted(
    actor: &str,
    group: &GroupPath,
    username: &str,
    deps: &GroupingsDeps,
) -> Result<GroupingsServiceResult, GroupingsError> {
    let person = act_as(actor, username, deps).await?;
    if let Some(failure) = check_marker_target(&person, group, deps).await? {
        return Ok(failure);
    }

    let subject = AttributeSubject::membership(group.to_string(), person.id);
    deps.attribute_store
        .remove_attribute(&subject, AttributeKey::SelfOpted)
        .await?;

    info!(person = %person.username, group = %group, "Removed self-opted marker");
    Ok(GroupingsServiceResult::success(format!(
        "removed self-opted attribute from membership of {} in {}",
        person.username, group
    )))
}

/// Whether the person's membership in `group` carries the self-opted marker.
pub async fn is_self_opted(
    group: &GroupPath,
    username: &str,
    deps: &GroupingsDeps,
) -> Result<bool, GroupingsError> {
    let Some(person) = deps.identity.lookup(username).await? else {
        return Ok(false);
    };
    let subject = AttributeSubject::membership(group.to_string(), person.id);
    let value = deps
        .attribute_store
        .get_attribute(&subject, AttributeKey::SelfOpted)
        .await?;
    Ok(value.is_some_and(|v| v.eq_ignore_ascii_case(MARKER)))
}

async fn act_as(
    actor: &str,
    username: &str,
    deps: &GroupingsDeps,
) -> Result<Person, GroupingsError> {
    Ok(check_is_self(actor, username, deps).await?)
}

/// `None` when the marker may be changed, otherwise the failure to report.
async fn check_marker_target(
    person: &Person,
    group: &GroupPath,
    deps: &GroupingsDeps,
) -> Result<Option<GroupingsServiceResult>, GroupingsError> {
    if !group.kind.is_manual() {
        return Ok(Some(rejected(person, group, SelfOptRejection::NotManualPath)));
    }

    let settings = GroupingSettings::load(&group.grouping, deps.attribute_store.as_ref()).await?;
    if !settings.allows_self_opt(group.kind) {
        let rejection = match group.kind {
            GroupKind::Include => SelfOptRejection::OptInDisabled,
            _ => SelfOptRejection::OptOutDisabled,
        };
        return Ok(Some(rejected(person, group, rejection)));
    }

    let is_member = deps
        .membership_store
        .is_member(&group.to_string(), &person.id)
        .await?;
    if !is_member {
        return Ok(Some(GroupingsServiceResult::failure(format!(
            "{} is not a member of {}",
            person.username, group
        ))));
    }

    Ok(None)
}

async fn write_marker(
    person: &Person,
    group: &GroupPath,
    deps: &GroupingsDeps,
) -> Result<GroupingsServiceResult, GroupingsError> {
    let subject = AttributeSubject::membership(group.to_string(), person.id);
    deps.attribute_store
        .set_attribute(&subject, AttributeKey::SelfOpted, MARKER)
        .await?;

    Ok(GroupingsServiceResult::with_code(
        SUCCESS,
        format!(
            "added self-opted attribute to membership of {} in {}",
            person.username, group
        ),
    ))
}

fn rejected(
    person: &Person,
    group: &GroupPath,
    rejection: SelfOptRejection,
) -> GroupingsServiceResult {
    GroupingsServiceResult::failure(format!(
        "{} cannot self-opt into {}: {}",
        person.username, group, rejection
    ))
}
