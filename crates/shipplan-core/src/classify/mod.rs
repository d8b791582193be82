pub mod engine;
pub mod outcome;

pub use engine::{classify, TripClassifier};
pub use outcome::{Classification, LineDecision, MatchReason, TripBucket, TripMatch};
