use crate::model::OrderLine;
use serde::{Deserialize, Serialize};

/// The criterion that made a predicate match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MatchReason {
    /// Container name contains this marker.
    ContainerMarker(String),
    /// Normalized model name is in the allow-list.
    Model(String),
    /// Normalized group code is in the allow-list.
    Group(String),
}

impl std::fmt::Display for MatchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchReason::ContainerMarker(m) => write!(f, "container contains '{m}'"),
            MatchReason::Model(m) => write!(f, "model {m}"),
            MatchReason::Group(g) => write!(f, "group {g}"),
        }
    }
}

/// Lines assigned to one trip, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripBucket {
    pub trip: String,
    pub lines: Vec<OrderLine>,
}

/// A trip a line was placed in, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripMatch {
    pub trip: String,
    pub reason: MatchReason,
}

/// Classification outcome for a single line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDecision {
    pub order_id: String,
    /// First eligibility criterion the line satisfied; `None` if excluded.
    pub eligible_by: Option<MatchReason>,
    pub trips: Vec<TripMatch>,
}

/// Buckets for every configured trip (in configuration order), plus the
/// lines that failed the eligibility filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub buckets: Vec<TripBucket>,
    /// Order ids rejected by the eligibility filter, in input order.
    pub excluded: Vec<String>,
    pub decisions: Vec<LineDecision>,
}

impl Classification {
    pub fn bucket(&self, trip: &str) -> Option<&TripBucket> {
        self.buckets.iter().find(|b| b.trip == trip)
    }

    pub fn bucket_mut(&mut self, trip: &str) -> Option<&mut TripBucket> {
        self.buckets.iter_mut().find(|b| b.trip == trip)
    }
}
