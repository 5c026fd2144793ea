//! Read-only views over groupings and memberships

use std::collections::BTreeSet;

use futures::stream::{self, StreamExt, TryStreamExt};
use futures::try_join;
use tracing::{debug, info};

use super::legs::load_classification;
use super::self_opt::is_self_opted;
use crate::common::auth::{check_is_owner_or_admin, check_is_self_or_admin};
use crate::common::{Group, GroupingsError, Person};
use crate::domains::grouping::{
    composite_group, Classification, GroupKind, GroupPath, GroupingPath, GroupingSettings,
};
use crate::domains::membership::models::{GroupingView, Membership};
use crate::kernel::GroupingsDeps;

/// Accepts a grouping or any of its groups; the switch lives on the grouping.
pub async fn is_group_can_opt_in(
    username: &str,
    grouping: impl AsRef<GroupingPath>,
    deps: &GroupingsDeps,
) -> Result<bool, GroupingsError> {
    let grouping = grouping.as_ref();
    let settings = GroupingSettings::load(grouping, deps.attribute_store.as_ref()).await?;
    debug!(person = username, grouping = %grouping, opt_in = settings.opt_in, "Checked opt-in");
    Ok(settings.opt_in)
}

/// Accepts a grouping or any of its groups; the switch lives on the grouping.
pub async fn is_group_can_opt_out(
    username: &str,
    grouping: impl AsRef<GroupingPath>,
    deps: &GroupingsDeps,
) -> Result<bool, GroupingsError> {
    let grouping = grouping.as_ref();
    let settings = GroupingSettings::load(grouping, deps.attribute_store.as_ref()).await?;
    debug!(person = username, grouping = %grouping, opt_out = settings.opt_out, "Checked opt-out");
    Ok(settings.opt_out)
}

/// Membership of a person in one group. Composite paths are resolved, never read.
pub async fn is_member(
    group: &GroupPath,
    username: &str,
    deps: &GroupingsDeps,
) -> Result<bool, GroupingsError> {
    let Some(person) = deps.identity.lookup(username).await? else {
        return Ok(false);
    };

    match group.kind {
        GroupKind::Composite => {
            let classification = load_classification(&group.grouping, &person.id, deps).await?;
            Ok(classification.in_composite)
        }
        _ => Ok(deps
            .membership_store
            .is_member(&group.to_string(), &person.id)
            .await?),
    }
}

/// Every grouping the person has any relation to, sorted by grouping path.
///
/// Groups outside the grouping layout (such as the admins group) are skipped.
pub async fn get_membership_results(
    actor: &str,
    username: &str,
    deps: &GroupingsDeps,
) -> Result<Vec<Membership>, GroupingsError> {
    check_is_self_or_admin(actor, username, deps).await?;

    let Some(person) = deps.identity.lookup(username).await? else {
        return Ok(Vec::new());
    };

    let groups = deps.membership_store.get_groups(&person.id).await?;
    let groupings: BTreeSet<GroupingPath> = groups
        .iter()
        .filter_map(|path| GroupPath::parse(path).ok())
        .filter(|path| path.kind != GroupKind::Composite)
        .map(|path| path.grouping)
        .collect();

    info!(person = %person.username, count = groupings.len(), "Listing memberships");

    stream::iter(groupings)
        .map(|grouping| membership_of(grouping, &person, &groups, deps))
        .buffered(deps.config.batch_concurrency.max(1))
        .try_collect()
        .await
}

async fn membership_of(
    grouping: GroupingPath,
    person: &Person,
    groups: &[String],
    deps: &GroupingsDeps,
) -> Result<Membership, GroupingsError> {
    let owners = grouping.owners().to_string();
    let in_owner = groups.iter().any(|g| *g == owners);
    let Classification {
        in_basis,
        in_include,
        in_exclude,
        in_composite,
    } = load_classification(&grouping, &person.id, deps).await?;

    let settings = GroupingSettings::load(&grouping, deps.attribute_store.as_ref()).await?;
    let is_self_opted = match (in_include, in_exclude) {
        (true, _) => is_self_opted(&grouping.include(), &person.username, deps).await?,
        (_, true) => is_self_opted(&grouping.exclude(), &person.username, deps).await?,
        _ => false,
    };

    Ok(Membership {
        path: grouping.to_string(),
        name: grouping.name().to_string(),
        in_basis,
        in_include,
        in_exclude,
        in_composite,
        in_owner,
        is_self_opted,
        is_opt_out_possible: settings.opt_out && in_composite,
    })
}

/// All groups of a grouping with the composite resolved from the other three.
pub async fn get_grouping(
    actor: &str,
    grouping: &GroupingPath,
    deps: &GroupingsDeps,
) -> Result<GroupingView, GroupingsError> {
    check_is_owner_or_admin(actor, grouping, deps).await?;

    let store = &deps.membership_store;
    let paths = [
        grouping.basis().to_string(),
        grouping.include().to_string(),
        grouping.exclude().to_string(),
        grouping.owners().to_string(),
    ];

    let (basis, include, exclude, owners, settings) = try_join!(
        store.get_members(&paths[0]),
        store.get_members(&paths[1]),
        store.get_members(&paths[2]),
        store.get_members(&paths[3]),
        GroupingSettings::load(grouping, deps.attribute_store.as_ref()),
    )?;

    let [basis_path, include_path, exclude_path, owners_path] = paths;
    let basis = Group::new(basis_path, basis);
    let include = Group::new(include_path, include);
    let exclude = Group::new(exclude_path, exclude);
    let composite = composite_group(grouping, &basis, &include, &exclude);

    Ok(GroupingView {
        path: grouping.to_string(),
        basis,
        include,
        exclude,
        owners: Group::new(owners_path, owners),
        composite,
        settings,
    })
}
