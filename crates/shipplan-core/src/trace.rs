use crate::classify::outcome::{Classification, LineDecision};
use crate::sanitize::{AnomalySeverity, DataAnomaly};
use crate::split::SplitOutcome;
use serde::{Deserialize, Serialize};

pub const TRACE_SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceSeverity {
    Important,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceStepType {
    Sanitize,
    Eligibility,
    TripMatch,
    Split,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceStep {
    pub step_type: TraceStepType,
    pub message: String,
}

/// Everything that happened to one order line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    pub entry_id: String,
    pub order_id: String,
    pub steps: Vec<TraceStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceWarning {
    pub order_id: String,
    pub message: String,
    pub severity: TraceSeverity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTrace {
    pub trace_schema_version: String,
    pub entries: Vec<TraceEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<TraceWarning>,
}

impl Default for PlanTrace {
    fn default() -> Self {
        Self {
            trace_schema_version: TRACE_SCHEMA_VERSION.to_string(),
            entries: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Name of the trip pair a split moved quantities between.
pub struct SplitTrace<'a> {
    pub source: &'a str,
    pub overflow: &'a str,
    pub outcome: &'a SplitOutcome,
}

pub fn build_plan_trace(
    classification: &Classification,
    anomalies: &[DataAnomaly],
    split: Option<SplitTrace<'_>>,
) -> PlanTrace {
    let entries = classification
        .decisions
        .iter()
        .enumerate()
        .map(|(idx, decision)| build_entry(idx, decision, anomalies, split.as_ref()))
        .collect();

    let warnings = anomalies
        .iter()
        .map(|a| TraceWarning {
            order_id: a.order_id.clone(),
            message: anomaly_message(a),
            severity: match a.severity {
                AnomalySeverity::Warning => TraceSeverity::Important,
                AnomalySeverity::Info => TraceSeverity::Info,
            },
        })
        .collect();

    PlanTrace {
        entries,
        warnings,
        ..PlanTrace::default()
    }
}

fn build_entry(
    idx: usize,
    decision: &LineDecision,
    anomalies: &[DataAnomaly],
    split: Option<&SplitTrace<'_>>,
) -> TraceEntry {
    let mut steps: Vec<TraceStep> = anomalies
        .iter()
        .filter(|a| a.order_id == decision.order_id)
        .map(|a| TraceStep {
            step_type: TraceStepType::Sanitize,
            message: anomaly_message(a),
        })
        .collect();

    steps.push(TraceStep {
        step_type: TraceStepType::Eligibility,
        message: match &decision.eligible_by {
            Some(reason) => format!("Eligible: {reason}"),
            None => "Excluded: no container marker, model or group matched".to_string(),
        },
    });

    for m in &decision.trips {
        steps.push(TraceStep {
            step_type: TraceStepType::TripMatch,
            message: format!("Assigned to {} ({})", m.trip, m.reason),
        });
    }

    if let Some(split) = split {
        let in_source = decision.trips.iter().any(|m| m.trip == split.source);
        let pair = split
            .outcome
            .primary
            .iter()
            .zip(&split.outcome.overflow)
            .find(|(p, _)| p.order_id == decision.order_id);
        if let (true, Some((p, o))) = (in_source, pair) {
            steps.push(TraceStep {
                step_type: TraceStepType::Split,
                message: format!(
                    "Split {} -> {}: {} / {}",
                    split.source, split.overflow, p.order_quantity, o.order_quantity
                ),
            });
        }
    }

    TraceEntry {
        entry_id: format!("line_{}_{}", idx, decision.order_id),
        order_id: decision.order_id.clone(),
        steps,
    }
}

fn anomaly_message(a: &DataAnomaly) -> String {
    let original = a
        .original
        .map(|v| v.to_string())
        .unwrap_or_else(|| "missing".to_string());
    format!("{:?}: {} -> {}", a.kind, original, a.corrected)
}
