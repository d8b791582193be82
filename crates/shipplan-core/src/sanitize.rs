use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::model::OrderLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    NegativeQuantity,
    NonPositiveCapacity,
    MissingCapacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalySeverity {
    Warning,
    Info,
}

/// A data-quality problem that was corrected in place. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataAnomaly {
    pub order_id: String,
    pub kind: AnomalyKind,
    pub severity: AnomalySeverity,
    /// Value as supplied upstream (`None` when the field was missing).
    pub original: Option<i64>,
    /// Value used from here on.
    pub corrected: i64,
}

/// Clamp negative quantities to 0 and missing or non-positive capacities
/// to 1, returning owned copies of the lines and one anomaly per
/// correction. Input order is preserved.
pub fn sanitize_lines(lines: &[OrderLine]) -> (Vec<OrderLine>, Vec<DataAnomaly>) {
    let mut anomalies = Vec::new();
    let cleaned = lines
        .iter()
        .map(|line| {
            let mut line = line.clone();

            if line.order_quantity < 0 {
                warn!(
                    order_id = %line.order_id,
                    quantity = line.order_quantity,
                    "negative order quantity clamped to 0"
                );
                anomalies.push(DataAnomaly {
                    order_id: line.order_id.clone(),
                    kind: AnomalyKind::NegativeQuantity,
                    severity: AnomalySeverity::Warning,
                    original: Some(line.order_quantity),
                    corrected: 0,
                });
                line.order_quantity = 0;
            }

            match line.capacity {
                Some(c) if c > 0 => {}
                Some(c) => {
                    warn!(
                        order_id = %line.order_id,
                        capacity = c,
                        "non-positive capacity clamped to 1"
                    );
                    anomalies.push(DataAnomaly {
                        order_id: line.order_id.clone(),
                        kind: AnomalyKind::NonPositiveCapacity,
                        severity: AnomalySeverity::Warning,
                        original: Some(c),
                        corrected: 1,
                    });
                    line.capacity = Some(1);
                }
                None => {
                    info!(order_id = %line.order_id, "missing capacity, using 1");
                    anomalies.push(DataAnomaly {
                        order_id: line.order_id.clone(),
                        kind: AnomalyKind::MissingCapacity,
                        severity: AnomalySeverity::Info,
                        original: None,
                        corrected: 1,
                    });
                    line.capacity = Some(1);
                }
            }

            line
        })
        .collect();

    (cleaned, anomalies)
}
