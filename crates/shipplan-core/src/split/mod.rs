pub mod fraction;
pub mod splitter;

pub use fraction::Fraction;
pub use splitter::{split_balanced, Allocation, SplitOutcome, SplitReport};
