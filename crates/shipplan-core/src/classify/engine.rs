use crate::classify::outcome::{Classification, LineDecision, MatchReason, TripBucket, TripMatch};
use crate::error::ShipplanError;
use crate::model::OrderLine;
use crate::normalize::{contains_marker, normalize_code};
use crate::rules::schema::{MatchRule, TripConfig};
use crate::rules::validate_config;
use std::collections::HashSet;
use tracing::debug;

/// Classify a day's lines against a trip configuration.
pub fn classify(lines: &[OrderLine], config: &TripConfig) -> Result<Classification, ShipplanError> {
    Ok(TripClassifier::new(config)?.classify(lines))
}

/// Compiled form of a [`TripConfig`]'s eligibility filter and trip
/// predicates. Holds no state between calls.
#[derive(Debug, Clone)]
pub struct TripClassifier {
    eligibility: Predicate,
    trips: Vec<(String, Option<Predicate>)>,
}

impl TripClassifier {
    /// Validate the configuration and compile its predicates.
    pub fn new(config: &TripConfig) -> Result<Self, ShipplanError> {
        validate_config(config)?;
        Ok(Self {
            eligibility: Predicate::from_rule(&config.eligibility),
            trips: config
                .trips
                .iter()
                .map(|t| (t.name.clone(), t.rule.as_ref().map(Predicate::from_rule)))
                .collect(),
        })
    }

    /// Partition `lines` into trip buckets.
    ///
    /// Buckets are not mutually exclusive: a line lands in every trip whose
    /// predicate it satisfies. Trips without a predicate get an empty bucket.
    pub fn classify(&self, lines: &[OrderLine]) -> Classification {
        let mut buckets: Vec<TripBucket> = self
            .trips
            .iter()
            .map(|(name, _)| TripBucket {
                trip: name.clone(),
                lines: Vec::new(),
            })
            .collect();
        let mut excluded = Vec::new();
        let mut decisions = Vec::with_capacity(lines.len());

        for line in lines {
            let Some(eligible_by) = self.eligibility.evaluate(line) else {
                excluded.push(line.order_id.clone());
                decisions.push(LineDecision {
                    order_id: line.order_id.clone(),
                    eligible_by: None,
                    trips: Vec::new(),
                });
                continue;
            };

            let mut trips = Vec::new();
            for ((name, predicate), bucket) in self.trips.iter().zip(buckets.iter_mut()) {
                let Some(reason) = predicate.as_ref().and_then(|p| p.evaluate(line)) else {
                    continue;
                };
                bucket.lines.push(line.clone());
                trips.push(TripMatch {
                    trip: name.clone(),
                    reason,
                });
            }

            decisions.push(LineDecision {
                order_id: line.order_id.clone(),
                eligible_by: Some(eligible_by),
                trips,
            });
        }

        debug!(
            lines = lines.len(),
            excluded = excluded.len(),
            "classified order lines into {} trips",
            buckets.len()
        );

        Classification {
            buckets,
            excluded,
            decisions,
        }
    }
}

/// A match rule with its allow-lists normalized once.
#[derive(Debug, Clone, Default)]
struct Predicate {
    markers: Vec<String>,
    models: HashSet<String>,
    groups: HashSet<String>,
}

impl Predicate {
    fn from_rule(rule: &MatchRule) -> Self {
        let normalized = |list: &Option<Vec<String>>| -> HashSet<String> {
            list.iter()
                .flatten()
                .filter_map(|v| normalize_code(v))
                .collect()
        };
        Self {
            markers: rule
                .container_markers
                .iter()
                .flatten()
                .map(|m| m.trim().to_uppercase())
                .filter(|m| !m.is_empty())
                .collect(),
            models: normalized(&rule.models),
            groups: normalized(&rule.groups),
        }
    }

    /// First criterion the line satisfies: container marker, then model,
    /// then group.
    fn evaluate(&self, line: &OrderLine) -> Option<MatchReason> {
        if let Some(container) = line.container_name.as_deref() {
            if let Some(marker) = self.markers.iter().find(|m| contains_marker(container, m)) {
                return Some(MatchReason::ContainerMarker(marker.clone()));
            }
        }
        if let Some(model) = line.normalized_model() {
            if self.models.contains(&model) {
                return Some(MatchReason::Model(model));
            }
        }
        if let Some(group) = line.normalized_group() {
            if self.groups.contains(&group) {
                return Some(MatchReason::Group(group));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::*;
    use crate::rules::parse_config_str;

    fn config() -> TripConfig {
        parse_config_str(
            r#"{
                "name": "Test", "version": "1.0",
                "eligibility": {
                    "container_markers": ["4-5T"],
                    "models": ["391", "17U"],
                    "groups": ["SEATBASE", "TANK"]
                },
                "trips": [
                    { "name": "trip1", "match": { "container_markers": ["4-5T"] } },
                    { "name": "trip2", "match": { "models": ["391", "17U"] } },
                    { "name": "trip3", "match": { "groups": ["SEATBASE", "TANK"] } },
                    { "name": "trip4" }
                ],
                "split": { "source": "trip1", "overflow": "trip4" }
            }"#,
        )
        .unwrap()
    }

    fn ids(bucket: &TripBucket) -> Vec<&str> {
        bucket.lines.iter().map(|l| l.order_id.as_str()).collect()
    }

    #[test]
    fn test_lines_bucketed_by_attribute() {
        let lines = vec![
            with_container(line("a", 5, Some(2)), "Rack 4-5T"),
            with_model(line("b", 3, None), " 17u "),
            with_group(line("c", 1, None), "tank"),
        ];
        let result = classify(&lines, &config()).unwrap();
        assert_eq!(ids(result.bucket("trip1").unwrap()), vec!["a"]);
        assert_eq!(ids(result.bucket("trip2").unwrap()), vec!["b"]);
        assert_eq!(ids(result.bucket("trip3").unwrap()), vec!["c"]);
        assert!(result.bucket("trip4").unwrap().lines.is_empty());
        assert!(result.excluded.is_empty());
    }

    #[test]
    fn test_membership_not_exclusive() {
        let l = with_group(with_container(line("a", 5, Some(2)), "4-5T"), "TANK");
        let result = classify(&[l], &config()).unwrap();
        assert_eq!(ids(result.bucket("trip1").unwrap()), vec!["a"]);
        assert_eq!(ids(result.bucket("trip3").unwrap()), vec!["a"]);
        assert_eq!(result.decisions[0].trips.len(), 2);
    }

    #[test]
    fn test_ineligible_line_excluded_everywhere() {
        let l = with_model(with_container(line("x", 9, Some(3)), "XYZ"), "UNKNOWN");
        let result = classify(&[l], &config()).unwrap();
        assert_eq!(result.excluded, vec!["x"]);
        assert!(result.buckets.iter().all(|b| b.lines.is_empty()));
        assert_eq!(result.decisions[0].eligible_by, None);
    }

    #[test]
    fn test_line_without_attributes_dropped() {
        let result = classify(&[line("bare", 4, None)], &config()).unwrap();
        assert_eq!(result.excluded, vec!["bare"]);
    }

    #[test]
    fn test_relative_order_preserved() {
        let lines = vec![
            with_container(line("c", 1, None), "4-5T"),
            with_container(line("a", 1, None), "4-5T"),
            with_model(line("m", 1, None), "391"),
            with_container(line("b", 1, None), "4-5t"),
        ];
        let result = classify(&lines, &config()).unwrap();
        assert_eq!(ids(result.bucket("trip1").unwrap()), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_classification_is_repeatable() {
        let lines = vec![
            with_container(line("a", 5, Some(2)), "4-5T"),
            with_model(line("b", 3, None), "391"),
            with_model(line("c", 3, None), "999"),
        ];
        let classifier = TripClassifier::new(&config()).unwrap();
        let first = classifier.classify(&lines);
        let second = classifier.classify(&lines);
        assert_eq!(first, second);
    }

    #[test]
    fn test_eligible_but_no_trip() {
        // Eligible through a group that no trip predicate mentions.
        let mut cfg = config();
        cfg.eligibility.groups = Some(vec!["SEATBASE".into(), "TANK".into(), "OTHER".into()]);
        let result = classify(&[with_group(line("o", 1, None), "other")], &cfg).unwrap();
        assert!(result.excluded.is_empty());
        assert!(result.buckets.iter().all(|b| b.lines.is_empty()));
        assert_eq!(
            result.decisions[0].eligible_by,
            Some(MatchReason::Group("OTHER".into()))
        );
    }

    #[test]
    fn test_invalid_config_rejected_at_setup() {
        let mut cfg = config();
        cfg.eligibility.models = Some(vec![]);
        assert!(TripClassifier::new(&cfg).is_err());
    }
}
