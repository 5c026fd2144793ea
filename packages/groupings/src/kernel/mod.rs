//! Kernel module - infrastructure traits and dependencies.

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::GroupingsDeps;
pub use test_dependencies::{InMemoryDirectory, StoreCall, TestDependencies};
pub use traits::*;
