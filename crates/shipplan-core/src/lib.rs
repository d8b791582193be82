pub mod annotate;
pub mod classify;
pub mod error;
pub mod model;
pub mod normalize;
pub mod rules;
pub mod sanitize;
pub mod split;
pub mod trace;

use annotate::{GroupAnnotation, SubVariantPlacement, TripSummary};
use chrono::NaiveDate;
use classify::TripClassifier;
use error::ShipplanError;
use model::{OrderLine, ShipmentDay};
use rules::schema::TripConfig;
use sanitize::DataAnomaly;
use serde::Serialize;
use split::{SplitOutcome, SplitReport};
use std::path::Path;
use trace::{PlanTrace, SplitTrace};
use tracing::{debug, instrument};

#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Attach a per-line decision trace to the plan.
    pub include_trace: bool,
}

/// One trip of the finished plan.
#[derive(Debug, Clone, Serialize)]
pub struct TripPlan {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure: Option<String>,
    /// Lines in input order. After a split, zero quantities are kept.
    pub lines: Vec<OrderLine>,
    pub summary: TripSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<GroupAnnotation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_variants: Vec<SubVariantPlacement>,
}

/// Loading plan for one customer on one day.
#[derive(Debug, Clone, Serialize)]
pub struct ShippingPlan {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    pub config_name: String,
    pub trips: Vec<TripPlan>,
    pub excluded_order_ids: Vec<String>,
    pub anomalies: Vec<DataAnomaly>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<PlanTrace>,
}

impl ShippingPlan {
    pub fn trip(&self, name: &str) -> Option<&TripPlan> {
        self.trips.iter().find(|t| t.name == name)
    }
}

/// Main API entry point: plan one day's order lines against a trip
/// configuration.
///
/// Lines are sanitized, classified into trips, the configured trip pair is
/// container-balanced, and per-trip summaries are derived. Only an invalid
/// configuration is an error; bad line data is corrected and reported in
/// `anomalies`.
#[instrument(skip_all, fields(date = %day.date, config = %config.name, lines = day.lines.len()))]
pub fn plan_day(
    day: &ShipmentDay,
    config: &TripConfig,
    options: &PlanOptions,
) -> Result<ShippingPlan, ShipplanError> {
    let classifier = TripClassifier::new(config)?;
    let (lines, anomalies) = sanitize::sanitize_lines(&day.lines);
    let mut classification = classifier.classify(&lines);

    let split_outcome: Option<SplitOutcome> = match &config.split {
        Some(def) => {
            let source_lines = classification
                .bucket(&def.source)
                .map(|b| b.lines.as_slice())
                .unwrap_or_default();
            let outcome = split::split_balanced(source_lines);
            debug!(
                source = %def.source,
                overflow = %def.overflow,
                primary = outcome.report.primary_containers,
                overflow_containers = outcome.report.overflow_containers,
                "split applied"
            );
            if let Some(bucket) = classification.bucket_mut(&def.source) {
                bucket.lines = outcome.primary.clone();
            }
            if let Some(bucket) = classification.bucket_mut(&def.overflow) {
                bucket.lines = outcome.overflow.clone();
            }
            Some(outcome)
        }
        None => None,
    };

    let trace = if options.include_trace {
        let split = match (&config.split, &split_outcome) {
            (Some(def), Some(outcome)) => Some(SplitTrace {
                source: &def.source,
                overflow: &def.overflow,
                outcome,
            }),
            _ => None,
        };
        Some(trace::build_plan_trace(&classification, &anomalies, split))
    } else {
        None
    };

    let trips = config
        .trips
        .iter()
        .map(|def| {
            let lines = classification
                .bucket(&def.name)
                .map(|b| b.lines.clone())
                .unwrap_or_default();
            let annotations = config
                .annotations
                .iter()
                .filter(|a| a.trip == def.name)
                .flat_map(|a| annotate::build_group_annotations(&lines, a))
                .collect();
            let sub_variants = match &config.sub_variants {
                Some(sv) if sv.trips.contains(&def.name) => {
                    annotate::place_sub_variants(&lines, &sv.group)
                }
                _ => Vec::new(),
            };
            TripPlan {
                name: def.name.clone(),
                label: def.label.clone(),
                departure: def.departure.clone(),
                summary: annotate::summarize(&lines),
                lines,
                annotations,
                sub_variants,
            }
        })
        .collect();

    Ok(ShippingPlan {
        date: day.date,
        customer: day.customer.clone().or_else(|| config.customer.clone()),
        config_name: config.name.clone(),
        trips,
        excluded_order_ids: classification.excluded,
        anomalies,
        split: split_outcome.map(|o| o.report),
        trace,
    })
}

/// Read a [`ShipmentDay`] JSON document from disk.
pub fn load_day(path: &Path) -> Result<ShipmentDay, ShipplanError> {
    let content = std::fs::read_to_string(path).map_err(|e| ShipplanError::InputLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| ShipplanError::InputLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
