// Groupings Membership Core
//
// Resolves Basis/Include/Exclude groups into one Composite membership and
// mutates them on behalf of owners, admins and self-opting members.
// External directory services are reached only through the kernel traits.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
pub use domains::membership::MembershipService;
