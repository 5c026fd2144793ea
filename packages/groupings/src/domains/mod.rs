pub mod grouping;
pub mod membership;
