pub mod builtin;
pub mod schema;

use crate::error::ShipplanError;
use chrono::NaiveTime;
use schema::{MatchRule, TripConfig};
use std::collections::HashSet;
use std::path::Path;

/// Load a trip configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<TripConfig, ShipplanError> {
    let content = std::fs::read_to_string(path).map_err(|e| ShipplanError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_config(&content, path)
}

/// Parse a trip configuration from a JSON string.
pub fn parse_config(json: &str, source: &Path) -> Result<TripConfig, ShipplanError> {
    let config: TripConfig = serde_json::from_str(json).map_err(|e| ShipplanError::ConfigLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a trip configuration from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<TripConfig, ShipplanError> {
    let config: TripConfig = serde_json::from_str(json).map_err(ShipplanError::Json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate that a trip configuration is well-formed.
pub fn validate_config(config: &TripConfig) -> Result<(), ShipplanError> {
    validate_match_rule("eligibility", &config.eligibility)?;

    if config.trips.is_empty() {
        return Err(ShipplanError::ConfigInvalid("trips must not be empty".into()));
    }

    let mut names = HashSet::new();
    for trip in &config.trips {
        if trip.name.trim().is_empty() {
            return Err(ShipplanError::ConfigInvalid(
                "trip name must not be empty".into(),
            ));
        }
        if !names.insert(trip.name.as_str()) {
            return Err(ShipplanError::ConfigInvalid(format!(
                "duplicate trip name '{}'",
                trip.name
            )));
        }
        if let Some(ref departure) = trip.departure {
            if NaiveTime::parse_from_str(departure, "%H:%M").is_err() {
                return Err(ShipplanError::ConfigInvalid(format!(
                    "trip '{}' has invalid departure '{}' (expected HH:MM)",
                    trip.name, departure
                )));
            }
        }

        let is_overflow = config
            .split
            .as_ref()
            .is_some_and(|s| s.overflow == trip.name);
        match (&trip.rule, is_overflow) {
            (Some(rule), false) => validate_match_rule(&format!("trip '{}'", trip.name), rule)?,
            (None, true) => {}
            (Some(_), true) => {
                return Err(ShipplanError::ConfigInvalid(format!(
                    "trip '{}' is a split overflow and must not have its own match rule",
                    trip.name
                )));
            }
            (None, false) => {
                return Err(ShipplanError::ConfigInvalid(format!(
                    "trip '{}' has no match rule",
                    trip.name
                )));
            }
        }
    }

    if let Some(ref split) = config.split {
        if split.source == split.overflow {
            return Err(ShipplanError::ConfigInvalid(format!(
                "split source and overflow are the same trip '{}'",
                split.source
            )));
        }
        for (role, name) in [("source", &split.source), ("overflow", &split.overflow)] {
            if !names.contains(name.as_str()) {
                return Err(ShipplanError::ConfigInvalid(format!(
                    "split {} references unknown trip '{}'",
                    role, name
                )));
            }
        }
    }

    for ann in &config.annotations {
        if !names.contains(ann.trip.as_str()) {
            return Err(ShipplanError::ConfigInvalid(format!(
                "annotation references unknown trip '{}'",
                ann.trip
            )));
        }
        if ann.groups.is_empty() {
            return Err(ShipplanError::ConfigInvalid(format!(
                "annotation for trip '{}' has no groups",
                ann.trip
            )));
        }
        if ann
            .groups
            .iter()
            .chain(ann.priority.iter())
            .any(|g| g.trim().is_empty())
        {
            return Err(ShipplanError::ConfigInvalid(format!(
                "annotation for trip '{}' contains a blank group code",
                ann.trip
            )));
        }
    }

    if let Some(ref sub) = config.sub_variants {
        if sub.group.trim().is_empty() {
            return Err(ShipplanError::ConfigInvalid(
                "sub_variants group must not be empty".into(),
            ));
        }
        if sub.trips.is_empty() {
            return Err(ShipplanError::ConfigInvalid(
                "sub_variants trips must not be empty".into(),
            ));
        }
        if let Some(unknown) = sub.trips.iter().find(|t| !names.contains(t.as_str())) {
            return Err(ShipplanError::ConfigInvalid(format!(
                "sub_variants references unknown trip '{}'",
                unknown
            )));
        }
    }

    Ok(())
}

fn validate_match_rule(owner: &str, rule: &MatchRule) -> Result<(), ShipplanError> {
    if rule.is_empty() {
        return Err(ShipplanError::ConfigInvalid(format!(
            "{} has no criteria (need container_markers, models or groups)",
            owner
        )));
    }

    let lists = [
        ("container_markers", &rule.container_markers),
        ("models", &rule.models),
        ("groups", &rule.groups),
    ];
    for (field, list) in lists {
        let Some(values) = list else { continue };
        if values.is_empty() {
            return Err(ShipplanError::ConfigInvalid(format!(
                "{} has an empty {} list",
                owner, field
            )));
        }
        if values.iter().any(|v| v.trim().is_empty()) {
            return Err(ShipplanError::ConfigInvalid(format!(
                "{} has a blank entry in {}",
                owner, field
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VALID: &str = r#"{
        "name": "Test",
        "version": "1.0",
        "eligibility": { "container_markers": ["4-5T"], "groups": ["TANK"] },
        "trips": [
            { "name": "early", "departure": "06:00", "match": { "container_markers": ["4-5T"] } },
            { "name": "tank", "match": { "groups": ["TANK"] } },
            { "name": "late", "departure": "13:00" }
        ],
        "split": { "source": "early", "overflow": "late" }
    }"#;

    #[test]
    fn test_parse_valid_config() {
        let config = parse_config_str(VALID).unwrap();
        assert_eq!(config.name, "Test");
        assert_eq!(config.trips.len(), 3);
        assert!(config.trips[2].rule.is_none());
        assert_eq!(config.split.unwrap().overflow, "late");
    }

    #[test]
    fn test_empty_allow_list_rejected() {
        let json = r#"{
            "name": "Bad", "version": "1.0",
            "eligibility": { "models": [] },
            "trips": [ { "name": "t", "match": { "groups": ["TANK"] } } ]
        }"#;
        let err = parse_config_str(json).unwrap_err();
        assert!(matches!(err, ShipplanError::ConfigInvalid(_)));
        assert!(err.to_string().contains("empty models list"));
    }

    #[test]
    fn test_eligibility_without_criteria_rejected() {
        let json = r#"{
            "name": "Bad", "version": "1.0",
            "eligibility": {},
            "trips": [ { "name": "t", "match": { "groups": ["TANK"] } } ]
        }"#;
        assert!(parse_config_str(json).is_err());
    }

    #[test]
    fn test_blank_marker_rejected() {
        let json = r#"{
            "name": "Bad", "version": "1.0",
            "eligibility": { "groups": ["TANK"] },
            "trips": [ { "name": "t", "match": { "container_markers": ["  "] } } ]
        }"#;
        assert!(parse_config_str(json).is_err());
    }

    #[test]
    fn test_trip_without_rule_must_be_overflow() {
        let json = r#"{
            "name": "Bad", "version": "1.0",
            "eligibility": { "groups": ["TANK"] },
            "trips": [ { "name": "t" } ]
        }"#;
        let err = parse_config_str(json).unwrap_err();
        assert!(err.to_string().contains("no match rule"));
    }

    #[test]
    fn test_overflow_with_rule_rejected() {
        let json = r#"{
            "name": "Bad", "version": "1.0",
            "eligibility": { "groups": ["TANK"] },
            "trips": [
                { "name": "a", "match": { "groups": ["TANK"] } },
                { "name": "b", "match": { "groups": ["TANK"] } }
            ],
            "split": { "source": "a", "overflow": "b" }
        }"#;
        assert!(parse_config_str(json).is_err());
    }

    #[test]
    fn test_unknown_split_source_rejected() {
        let json = r#"{
            "name": "Bad", "version": "1.0",
            "eligibility": { "groups": ["TANK"] },
            "trips": [ { "name": "b" } ],
            "split": { "source": "missing", "overflow": "b" }
        }"#;
        let err = parse_config_str(json).unwrap_err();
        assert!(err.to_string().contains("unknown trip 'missing'"));
    }

    #[test]
    fn test_duplicate_trip_rejected() {
        let json = r#"{
            "name": "Bad", "version": "1.0",
            "eligibility": { "groups": ["TANK"] },
            "trips": [
                { "name": "a", "match": { "groups": ["TANK"] } },
                { "name": "a", "match": { "groups": ["TANK"] } }
            ]
        }"#;
        assert!(parse_config_str(json).is_err());
    }

    #[test]
    fn test_invalid_departure_rejected() {
        let json = r#"{
            "name": "Bad", "version": "1.0",
            "eligibility": { "groups": ["TANK"] },
            "trips": [ { "name": "a", "departure": "6 o'clock", "match": { "groups": ["TANK"] } } ]
        }"#;
        assert!(parse_config_str(json).is_err());
    }

    #[test]
    fn test_annotation_unknown_trip_rejected() {
        let json = r#"{
            "name": "Bad", "version": "1.0",
            "eligibility": { "groups": ["TANK"] },
            "trips": [ { "name": "a", "match": { "groups": ["TANK"] } } ],
            "annotations": [ { "trip": "z", "groups": ["TANK"] } ]
        }"#;
        assert!(parse_config_str(json).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(VALID.as_bytes()).unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.version, "1.0");
    }

    #[test]
    fn test_load_config_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ShipplanError::ConfigLoad { .. }));
    }
}
