//! Membership activities - business logic functions
//!
//! Each activity runs its authorization check first, then talks to the stores
//! through `GroupingsDeps`. `MembershipService` is a thin facade over these.

mod add_members;
mod admins;
mod attributes;
mod legs;
mod queries;
mod remove_members;
mod self_opt;

pub use add_members::add_grouping_members;
pub use admins::{add_admin, assign_ownership, delete_admin, remove_ownership};
pub use attributes::{
    change_listserv_status, change_opt_in_status, change_opt_out_status, grouping_settings,
    update_last_modified, LAST_MODIFIED_FORMAT, TIME_MARKER,
};
pub use queries::{
    get_grouping, get_membership_results, is_group_can_opt_in, is_group_can_opt_out, is_member,
};
pub use remove_members::remove_grouping_members;
pub use self_opt::{add_self_opted, is_self_opted, opt_in, opt_out, remove_self_opted};
