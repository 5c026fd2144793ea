// Common types shared across the kernel and domain layers

pub mod auth;
pub mod entity_ids;
pub mod errors;
pub mod id;
pub mod types;

pub use auth::{Actor, AuthError, GroupingCapability, HasAuthContext, INSUFFICIENT_PRIVILEGES};
pub use entity_ids::*;
pub use errors::GroupingsError;
pub use id::Id;
pub use types::*;
