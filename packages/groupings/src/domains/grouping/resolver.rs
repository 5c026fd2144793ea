//! Composite resolution
//!
//! Pure functions over group contents. Nothing here touches a store, so the
//! composite invariant can be checked without any directory service.

use std::collections::HashSet;
use std::fmt;

use super::models::{GroupKind, GroupPath, GroupingPath, GroupingSettings};
use crate::common::{Group, GroupingsError, Person, PersonId};

/// Snapshot of the three groups that make up a composite
#[derive(Debug, Clone, Default)]
pub struct GroupContents {
    pub basis: HashSet<PersonId>,
    pub include: HashSet<PersonId>,
    pub exclude: HashSet<PersonId>,
}

impl GroupContents {
    pub fn from_groups(basis: &Group, include: &Group, exclude: &Group) -> Self {
        let ids = |g: &Group| g.members.iter().map(|p| p.id).collect();
        Self {
            basis: ids(basis),
            include: ids(include),
            exclude: ids(exclude),
        }
    }
}

/// Where a person stands against one grouping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub in_basis: bool,
    pub in_include: bool,
    pub in_exclude: bool,
    pub in_composite: bool,
}

impl Classification {
    pub fn from_flags(in_basis: bool, in_include: bool, in_exclude: bool) -> Self {
        Self {
            in_basis,
            in_include,
            in_exclude,
            in_composite: (in_basis || in_include) && !in_exclude,
        }
    }
}

pub fn classify(contents: &GroupContents, person: &PersonId) -> Classification {
    Classification::from_flags(
        contents.basis.contains(person),
        contents.include.contains(person),
        contents.exclude.contains(person),
    )
}

/// (basis ∪ include) − exclude
pub fn composite(contents: &GroupContents) -> HashSet<PersonId> {
    contents
        .basis
        .union(&contents.include)
        .filter(|id| !contents.exclude.contains(id))
        .copied()
        .collect()
}

/// Composite membership as a group, basis members first, each person once.
pub fn composite_group(
    grouping: &GroupingPath,
    basis: &Group,
    include: &Group,
    exclude: &Group,
) -> Group {
    let composite_ids = composite(&GroupContents::from_groups(basis, include, exclude));
    let mut seen = HashSet::new();
    let members: Vec<Person> = basis
        .members
        .iter()
        .chain(include.members.iter())
        .filter(|p| composite_ids.contains(&p.id) && seen.insert(p.id))
        .cloned()
        .collect();

    Group::new(grouping.as_str(), members)
}

/// One store call in a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanStep {
    Remove(GroupPath),
    Add(GroupPath),
}

/// Ordered store calls that honor a requested membership change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipPlan {
    pub steps: Vec<PlanStep>,
}

impl MembershipPlan {
    pub fn added_to(&self) -> Option<&GroupPath> {
        self.steps.iter().find_map(|s| match s {
            PlanStep::Add(path) => Some(path),
            PlanStep::Remove(_) => None,
        })
    }

    pub fn removed_from(&self) -> Option<&GroupPath> {
        self.steps.iter().find_map(|s| match s {
            PlanStep::Remove(path) => Some(path),
            PlanStep::Add(_) => None,
        })
    }
}

/// Plan for putting a person into Include or Exclude.
///
/// The opposite path is always left first, whether or not the person is in it,
/// so a person is never force-included and force-excluded at once.
pub fn plan_add(
    grouping: &GroupingPath,
    target: GroupKind,
) -> Result<MembershipPlan, GroupingsError> {
    let opposite = target
        .opposite()
        .ok_or_else(|| GroupingsError::InvalidPath(grouping.group(target).to_string()))?;

    Ok(MembershipPlan {
        steps: vec![
            PlanStep::Remove(grouping.group(opposite)),
            PlanStep::Add(grouping.group(target)),
        ],
    })
}

/// Plan for taking a person out of Include or Exclude. Never touches the opposite path.
pub fn plan_remove(
    grouping: &GroupingPath,
    source: GroupKind,
) -> Result<MembershipPlan, GroupingsError> {
    if !source.is_manual() {
        return Err(GroupingsError::InvalidPath(grouping.group(source).to_string()));
    }

    Ok(MembershipPlan {
        steps: vec![PlanStep::Remove(grouping.group(source))],
    })
}

/// Why a self-service opt request cannot go ahead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfOptRejection {
    OptInDisabled,
    OptOutDisabled,
    AlreadyMember,
    NotMember,
    NotManualPath,
}

impl fmt::Display for SelfOptRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SelfOptRejection::OptInDisabled => "opt-in is not enabled for this grouping",
            SelfOptRejection::OptOutDisabled => "opt-out is not enabled for this grouping",
            SelfOptRejection::AlreadyMember => "person is already a member of the grouping",
            SelfOptRejection::NotMember => "person is not a member of the grouping",
            SelfOptRejection::NotManualPath => "self-opting is only possible into include or exclude",
        };
        f.write_str(reason)
    }
}

/// Check whether a person may opt themselves into `target`.
///
/// Opting in needs the opt-in switch and a person outside the composite;
/// opting out needs the opt-out switch and a person inside it.
pub fn check_self_opt(
    settings: &GroupingSettings,
    classification: &Classification,
    target: GroupKind,
) -> Result<(), SelfOptRejection> {
    match target {
        GroupKind::Include => {
            if !settings.allows_self_opt(target) {
                return Err(SelfOptRejection::OptInDisabled);
            }
            if classification.in_composite {
                return Err(SelfOptRejection::AlreadyMember);
            }
        }
        GroupKind::Exclude => {
            if !settings.allows_self_opt(target) {
                return Err(SelfOptRejection::OptOutDisabled);
            }
            if !classification.in_composite {
                return Err(SelfOptRejection::NotMember);
            }
        }
        _ => return Err(SelfOptRejection::NotManualPath),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grouping() -> GroupingPath {
        GroupingPath::new("tmp:grouping-many").unwrap()
    }

    fn person(username: &str) -> Person {
        Person::new(username, username.to_uppercase())
    }

    #[test]
    fn test_classify_all_flag_combinations() {
        for bits in 0u8..8 {
            let (b, i, e) = (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
            let id = PersonId::new();
            let mut contents = GroupContents::default();
            if b {
                contents.basis.insert(id);
            }
            if i {
                contents.include.insert(id);
            }
            if e {
                contents.exclude.insert(id);
            }

            let c = classify(&contents, &id);
            assert_eq!((c.in_basis, c.in_include, c.in_exclude), (b, i, e));
            assert_eq!(c.in_composite, (b || i) && !e);
            assert_eq!(c.in_composite, composite(&contents).contains(&id));
        }
    }

    #[test]
    fn test_composite_is_union_minus_exclude() {
        let (a, b, c, d) = (PersonId::new(), PersonId::new(), PersonId::new(), PersonId::new());
        let contents = GroupContents {
            basis: [a, b].into_iter().collect(),
            include: [c, d].into_iter().collect(),
            exclude: [b, d].into_iter().collect(),
        };

        let result = composite(&contents);
        assert_eq!(result, [a, c].into_iter().collect());
    }

    #[test]
    fn test_composite_group_keeps_order_and_dedups() {
        let (a, b, c) = (person("a"), person("b"), person("c"));
        let basis = Group::new("g:basis", vec![a.clone(), b.clone()]);
        let include = Group::new("g:include", vec![b.clone(), c.clone()]);
        let exclude = Group::new("g:exclude", vec![a.clone()]);

        let group = composite_group(&grouping(), &basis, &include, &exclude);
        assert_eq!(group.usernames(), vec!["b", "c"]);
        assert_eq!(group.path, "tmp:grouping-many");
    }

    #[test]
    fn test_plan_add_include_leaves_exclude_first() {
        let plan = plan_add(&grouping(), GroupKind::Include).unwrap();
        assert_eq!(
            plan.steps,
            vec![
                PlanStep::Remove(grouping().exclude()),
                PlanStep::Add(grouping().include()),
            ]
        );
        assert_eq!(plan.added_to(), Some(&grouping().include()));
        assert_eq!(plan.removed_from(), Some(&grouping().exclude()));
    }

    #[test]
    fn test_plan_add_exclude_leaves_include_first() {
        let plan = plan_add(&grouping(), GroupKind::Exclude).unwrap();
        assert_eq!(plan.removed_from(), Some(&grouping().include()));
        assert_eq!(plan.added_to(), Some(&grouping().exclude()));
    }

    #[test]
    fn test_plan_add_rejects_basis() {
        assert!(plan_add(&grouping(), GroupKind::Basis).is_err());
        assert!(plan_add(&grouping(), GroupKind::Composite).is_err());
    }

    #[test]
    fn test_plan_remove_is_single_step() {
        let plan = plan_remove(&grouping(), GroupKind::Include).unwrap();
        assert_eq!(plan.steps, vec![PlanStep::Remove(grouping().include())]);
        assert_eq!(plan.added_to(), None);
        assert!(plan_remove(&grouping(), GroupKind::Owners).is_err());
    }

    #[test]
    fn test_check_self_opt() {
        let enabled = GroupingSettings {
            opt_in: true,
            opt_out: true,
            listserv: false,
        };
        let outside = Classification::from_flags(false, false, false);
        let inside = Classification::from_flags(true, false, false);

        assert_eq!(check_self_opt(&enabled, &outside, GroupKind::Include), Ok(()));
        assert_eq!(check_self_opt(&enabled, &inside, GroupKind::Exclude), Ok(()));
        assert_eq!(
            check_self_opt(&enabled, &inside, GroupKind::Include),
            Err(SelfOptRejection::AlreadyMember)
        );
        assert_eq!(
            check_self_opt(&enabled, &outside, GroupKind::Exclude),
            Err(SelfOptRejection::NotMember)
        );

        let disabled = GroupingSettings::default();
        assert_eq!(
            check_self_opt(&disabled, &outside, GroupKind::Include),
            Err(SelfOptRejection::OptInDisabled)
        );
        assert_eq!(
            check_self_opt(&disabled, &inside, GroupKind::Exclude),
            Err(SelfOptRejection::OptOutDisabled)
        );
    }
}
