use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A trip configuration: which lines are eligible, how they are bucketed
/// into trips, which trip pair is container-balanced, and which summaries
/// are derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Customer this configuration was written for (informational).
    #[serde(default)]
    pub customer: Option<String>,
    /// Lines matching none of these criteria never reach any trip.
    pub eligibility: MatchRule,
    /// Trips in departure order. Output follows this order.
    pub trips: Vec<TripDef>,
    #[serde(default)]
    pub split: Option<SplitDef>,
    #[serde(default)]
    pub annotations: Vec<AnnotationDef>,
    #[serde(default)]
    pub sub_variants: Option<SubVariantDef>,
}

/// Attribute criteria. A line matches when ANY present criterion matches.
///
/// Each list is optional, but a list that is present must not be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchRule {
    /// Case-insensitive substrings of the container name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_markers: Option<Vec<String>>,
    /// Model names, compared after trim + uppercase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<String>>,
    /// Product-group codes, compared after trim + uppercase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
}

impl MatchRule {
    pub fn is_empty(&self) -> bool {
        self.container_markers.is_none() && self.models.is_none() && self.groups.is_none()
    }
}

/// One scheduled loading run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripDef {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    /// Departure time as "HH:MM".
    #[serde(default)]
    pub departure: Option<String>,
    /// Membership predicate. Absent only for the overflow trip of a split.
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub rule: Option<MatchRule>,
}

/// The trip pair whose container counts are balanced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitDef {
    /// Trip whose bucket is split; keeps the larger-or-equal share.
    pub source: String,
    /// Trip that receives the remainder.
    pub overflow: String,
}

/// Per-group container totals requested for one trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationDef {
    pub trip: String,
    /// Groups of interest.
    pub groups: Vec<String>,
    /// Output ranking. Groups not listed sort last, in declared order.
    #[serde(default)]
    pub priority: Vec<String>,
    #[serde(default)]
    pub display_names: BTreeMap<String, String>,
}

/// Where sub-variant (`-L`/`-R`) lines are paired with their main model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubVariantDef {
    /// Group code that marks a line as a sub-variant.
    pub group: String,
    /// Trips to compute placements for.
    pub trips: Vec<String>,
}
