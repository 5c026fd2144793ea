//! Grouping domain - paths, per-grouping settings and composite resolution
//!
//! A grouping is backed by Basis, Include, Exclude and Owners groups; its
//! Composite membership is always derived, never stored.

pub mod models;
pub mod resolver;

pub use models::{switch_value, GroupKind, GroupPath, GroupingPath, GroupingSettings};
pub use resolver::{
    check_self_opt, classify, composite, composite_group, plan_add, plan_remove, Classification,
    GroupContents, MembershipPlan, PlanStep, SelfOptRejection,
};
