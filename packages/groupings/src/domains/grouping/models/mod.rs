pub mod grouping;
pub mod settings;

pub use grouping::{GroupKind, GroupPath, GroupingPath};
pub use settings::{switch_value, GroupingSettings};
