use serde::{Deserialize, Serialize};

/// Normalize a model name or group code for set membership: trim and
/// uppercase. Blank input yields `None`.
pub fn normalize_code(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// Case-insensitive substring test used for container capacity markers
/// such as "4-5T".
pub fn contains_marker(haystack: &str, marker: &str) -> bool {
    if marker.is_empty() {
        return false;
    }
    haystack.to_uppercase().contains(&marker.to_uppercase())
}

/// Which side of a main model a sub-variant belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// Key used to pair models: all whitespace (including the ideographic
/// space) removed, uppercased.
pub fn model_key(raw: &str) -> Option<String> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    if compact.is_empty() {
        None
    } else {
        Some(compact)
    }
}

/// Detect the `-L` / `-R` sub-variant suffix.
pub fn sub_variant_side(raw: &str) -> Option<Side> {
    let key = model_key(raw)?;
    if key.ends_with("-L") {
        Some(Side::Left)
    } else if key.ends_with("-R") {
        Some(Side::Right)
    } else {
        None
    }
}

/// Resolve the main model a sub-variant belongs to.
///
/// `"17U-L"` and `"17U - R"` both resolve to `"17U"`. A name without the
/// suffix is its own main model.
pub fn main_model_key(raw: &str) -> Option<String> {
    let key = model_key(raw)?;
    let main = match sub_variant_side(&key) {
        Some(_) => key[..key.len() - 2].to_string(),
        None => key,
    };
    if main.is_empty() {
        None
    } else {
        Some(main)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(" seatbase ").as_deref(), Some("SEATBASE"));
        assert_eq!(normalize_code("19-6").as_deref(), Some("19-6"));
        assert_eq!(normalize_code("   "), None);
        assert_eq!(normalize_code(""), None);
    }

    #[test]
    fn test_contains_marker_case_insensitive() {
        assert!(contains_marker("Pallet 4-5T steel", "4-5T"));
        assert!(contains_marker("pallet 4-5t", "4-5T"));
        assert!(!contains_marker("XYZ", "4-5T"));
        assert!(!contains_marker("anything", ""));
    }

    #[test]
    fn test_sub_variant_side() {
        assert_eq!(sub_variant_side("17U-L"), Some(Side::Left));
        assert_eq!(sub_variant_side("17u-r"), Some(Side::Right));
        assert_eq!(sub_variant_side("17U - R"), Some(Side::Right));
        assert_eq!(sub_variant_side("17U"), None);
        assert_eq!(sub_variant_side("BL"), None);
    }

    #[test]
    fn test_main_model_key() {
        assert_eq!(main_model_key("17U-L").as_deref(), Some("17U"));
        assert_eq!(main_model_key(" 26 U-R").as_deref(), Some("26U"));
        assert_eq!(main_model_key("391").as_deref(), Some("391"));
        assert_eq!(main_model_key("-L"), None);
        assert_eq!(main_model_key("\u{3000}"), None);
    }
}
