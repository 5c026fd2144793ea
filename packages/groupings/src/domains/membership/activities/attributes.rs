//! Grouping switches and the last-modified stamp

use chrono::Utc;
use tracing::{error, info};

use crate::common::auth::check_is_owner_or_admin;
use crate::common::GroupingsError;
use crate::domains::grouping::{switch_value, GroupPath, GroupingPath, GroupingSettings};
use crate::domains::membership::models::GroupingsServiceResult;
use crate::kernel::{AttributeKey, AttributeSubject, GroupingsDeps};

/// Minute-resolution timestamp format of the last-modified attribute
pub const LAST_MODIFIED_FORMAT: &str = "%Y%m%dT%H%M";

/// Marker between the group and the timestamp in the stamp's action text
pub const TIME_MARKER: &str = " to time ";

/// Write the current time to the last-modified attribute of `group`.
pub async fn update_last_modified(
    group: &GroupPath,
    deps: &GroupingsDeps,
) -> Result<GroupingsServiceResult, GroupingsError> {
    let time = Utc::now().format(LAST_MODIFIED_FORMAT).to_string();
    let path = group.to_string();

    deps.attribute_store
        .set_attribute(&AttributeSubject::group(&path), AttributeKey::LastModified, &time)
        .await?;

    info!(group = %path, %time, "Updated last-modified");
    Ok(GroupingsServiceResult::success(format!(
        "updated last-modified attribute of {}{}{}",
        path, TIME_MARKER, time
    )))
}

/// Stamp every changed group after a batch. Failures are logged, not returned,
/// since the membership changes themselves already happened.
pub(crate) async fn stamp_changed(groups: &[GroupPath], deps: &GroupingsDeps) {
    for group in groups {
        if let Err(e) = update_last_modified(group, deps).await {
            error!(group = %group, error = %e, "Failed to stamp last-modified");
        }
    }
}

pub async fn grouping_settings(
    grouping: &GroupingPath,
    deps: &GroupingsDeps,
) -> Result<GroupingSettings, GroupingsError> {
    Ok(GroupingSettings::load(grouping, deps.attribute_store.as_ref()).await?)
}

pub async fn change_opt_in_status(
    actor: &str,
    grouping: &GroupingPath,
    enabled: bool,
    deps: &GroupingsDeps,
) -> Result<GroupingsServiceResult, GroupingsError> {
    change_switch(actor, grouping, AttributeKey::OptIn, enabled, deps).await
}

pub async fn change_opt_out_status(
    actor: &str,
    grouping: &GroupingPath,
    enabled: bool,
    deps: &GroupingsDeps,
) -> Result<GroupingsServiceResult, GroupingsError> {
    change_switch(actor, grouping, AttributeKey::OptOut, enabled, deps).await
}

pub async fn change_listserv_status(
    actor: &str,
    grouping: &GroupingPath,
    enabled: bool,
    deps: &GroupingsDeps,
) -> Result<GroupingsServiceResult, GroupingsError> {
    change_switch(actor, grouping, AttributeKey::Listserv, enabled, deps).await
}

async fn change_switch(
    actor: &str,
    grouping: &GroupingPath,
    key: AttributeKey,
    enabled: bool,
    deps: &GroupingsDeps,
) -> Result<GroupingsServiceResult, GroupingsError> {
    check_is_owner_or_admin(actor, grouping, deps).await?;

    let subject = AttributeSubject::group(grouping.as_str());
    let value = switch_value(enabled);
    let current = deps.attribute_store.get_attribute(&subject, key).await?;

    if current.as_deref() == Some(value) {
        return Ok(GroupingsServiceResult::success(format!(
            "{} of {} was already {}",
            key, grouping, value
        )));
    }

    deps.attribute_store.set_attribute(&subject, key, value).await?;
    info!(actor, grouping = %grouping, %key, value, "Changed grouping switch");

    Ok(GroupingsServiceResult::success(format!(
        "set {} of {} to {}",
        key, grouping, value
    )))
}
