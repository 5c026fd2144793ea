/// Authorization module for groupings
///
/// Provides a fluent API for authorization checks in activity code:
///
/// ```rust,ignore
/// use crate::common::auth::{Actor, GroupingCapability};
///
/// Actor::new(actor_username)
///     .can(GroupingCapability::ManageGrouping(grouping.clone()))
///     .check(deps)
///     .await?;
/// ```
///
/// Checks always go to the membership store; nothing is cached between calls.

mod builder;
mod capability;
mod errors;

pub use builder::{
    check_is_admin, check_is_owner_or_admin, check_is_self, check_is_self_or_admin, Actor,
    CapabilityBuilder, HasAuthContext,
};
pub use capability::GroupingCapability;
pub use errors::{AuthError, INSUFFICIENT_PRIVILEGES};
