use crate::error::ShipplanError;
use crate::rules::schema::TripConfig;
use crate::rules::validate_config;

const TIERA_JSON: &str = include_str!("../../../../rules/tiera.json");
const TIERA_BASIC_JSON: &str = include_str!("../../../../rules/tiera-basic.json");

/// Available predefined trip configurations.
pub const PRESETS: &[&str] = &["tiera", "tiera-basic"];

/// Load a predefined trip configuration by name.
pub fn load_preset(name: &str) -> Result<TripConfig, ShipplanError> {
    let json = match name {
        "tiera" => TIERA_JSON,
        "tiera-basic" => TIERA_BASIC_JSON,
        _ => {
            return Err(ShipplanError::ConfigInvalid(format!(
                "unknown preset '{}'. Available: {}",
                name,
                PRESETS.join(", ")
            )))
        }
    };
    let config: TripConfig = serde_json::from_str(json)?;
    validate_config(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_tiera_preset() {
        let config = load_preset("tiera").unwrap();
        let names: Vec<&str> = config.trips.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["trip1", "trip2", "trip3", "trip4"]);
        let split = config.split.unwrap();
        assert_eq!(split.source, "trip1");
        assert_eq!(split.overflow, "trip4");
        assert_eq!(config.annotations.len(), 1);
    }

    #[test]
    fn test_all_presets_load() {
        for name in PRESETS {
            assert!(load_preset(name).is_ok(), "preset {name} failed to load");
        }
    }

    #[test]
    fn test_basic_preset_has_no_annotations() {
        let config = load_preset("tiera-basic").unwrap();
        assert!(config.annotations.is_empty());
        assert!(config.sub_variants.is_none());
    }

    #[test]
    fn test_unknown_preset() {
        assert!(load_preset("kubota").is_err());
    }
}
