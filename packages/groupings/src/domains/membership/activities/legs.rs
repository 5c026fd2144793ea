//! Store calls shared by the membership-changing activities

use anyhow::{anyhow, Result};
use futures::try_join;
use tracing::{debug, error};

use crate::common::{Group, Person, PersonId, StoreOutcome};
use crate::domains::grouping::{
    classify, Classification, GroupContents, GroupPath, GroupingPath, PlanStep,
};
use crate::kernel::{AttributeKey, AttributeSubject, GroupingsDeps};

/// Outcome of one executed plan step
pub(crate) struct Leg {
    pub path: GroupPath,
    /// Err when the membership call failed, or when it succeeded but its
    /// follow-up attribute write did not
    pub outcome: Result<StoreOutcome>,
    /// Whether the membership itself changed at the store
    pub mutated: bool,
}

impl Leg {
    pub fn changed(&self) -> bool {
        self.mutated
    }

    pub fn failure(&self) -> Option<String> {
        self.outcome
            .as_ref()
            .err()
            .map(|e| format!("{}: {:#}", self.path, e))
    }
}

/// Execute one plan step for one person.
///
/// Leaving a group also drops the self-opted marker of that membership. If
/// that drop fails the leg fails too, even though the membership changed.
pub(crate) async fn run_step(step: &PlanStep, person: &Person, deps: &GroupingsDeps) -> Leg {
    let store = &deps.membership_store;
    let (path, outcome) = match step {
        PlanStep::Add(path) => (path, store.add_member(&path.to_string(), person).await),
        PlanStep::Remove(path) => (path, store.remove_member(&path.to_string(), person).await),
    };

    let mutated = matches!(outcome, Ok(StoreOutcome::Changed));
    let mut leg = Leg {
        path: path.clone(),
        outcome,
        mutated,
    };

    if matches!(step, PlanStep::Remove(_)) && mutated {
        let subject = AttributeSubject::membership(leg.path.to_string(), person.id);
        if let Err(e) = deps
            .attribute_store
            .remove_attribute(&subject, AttributeKey::SelfOpted)
            .await
        {
            error!(group = %leg.path, person = %person.username, error = %e, "Failed to clear self-opted marker");
            leg.outcome = Err(anyhow!("removed, but self-opted marker was not cleared: {}", e));
        }
    }

    debug!(group = %leg.path, person = %person.username, changed = leg.changed(), "Ran plan step");
    leg
}

/// Where one person stands against a grouping, from its current contents.
pub(crate) async fn load_classification(
    grouping: &GroupingPath,
    person: &PersonId,
    deps: &GroupingsDeps,
) -> Result<Classification> {
    let store = &deps.membership_store;
    let (basis_path, include_path, exclude_path) = (
        grouping.basis().to_string(),
        grouping.include().to_string(),
        grouping.exclude().to_string(),
    );

    let (basis, include, exclude) = try_join!(
        store.get_members(&basis_path),
        store.get_members(&include_path),
        store.get_members(&exclude_path),
    )?;

    let contents = GroupContents::from_groups(
        &Group::new(basis_path, basis),
        &Group::new(include_path, include),
        &Group::new(exclude_path, exclude),
    );
    Ok(classify(&contents, person))
}
