use shipplan_core::error::ShipplanError;
use shipplan_core::rules::builtin;
use shipplan_core::rules::schema::MatchRule;
use std::path::Path;

pub fn list() -> Result<(), ShipplanError> {
    println!("Available predefined trip configurations:\n");
    for name in builtin::PRESETS {
        let config = builtin::load_preset(name)?;
        println!("  {:<12} {} (v{})", name, config.name, config.version);
        if let Some(ref desc) = config.description {
            println!("               {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn explain(preset: &str) -> Result<(), ShipplanError> {
    let config = builtin::load_preset(preset)?;

    println!("{} (version {})\n", config.name, config.version);

    if let Some(ref desc) = config.description {
        println!("{}\n", desc);
    }

    println!("A line is considered at all when {}.\n", describe(&config.eligibility));

    println!("Trips ({}):\n", config.trips.len());
    for trip in &config.trips {
        println!(
            "  {:<8} {:<6} {}",
            trip.name,
            trip.departure.as_deref().unwrap_or("--:--"),
            trip.label.as_deref().unwrap_or("")
        );
        match trip.rule {
            Some(ref rule) => println!("           takes lines where {}", describe(rule)),
            None => println!("           receives the overflow of a split"),
        }
        println!();
    }

    if let Some(ref split) = config.split {
        println!(
            "The lines of {} are split between {} and {} so that {} carries",
            split.source, split.source, split.overflow, split.source
        );
        println!("ceil(total / 2) containers and never fewer than {}.\n", split.overflow);
    }

    for ann in &config.annotations {
        let names: Vec<String> = ann
            .groups
            .iter()
            .map(|g| match ann.display_names.get(g) {
                Some(d) => format!("{} ({})", g, d),
                None => g.clone(),
            })
            .collect();
        println!(
            "{} reports container totals for: {}",
            ann.trip,
            names.join(", ")
        );
    }

    if let Some(ref sv) = config.sub_variants {
        println!(
            "Sub-variants in group {} are paired with their main model on: {}",
            sv.group,
            sv.trips.join(", ")
        );
    }
    println!();

    Ok(())
}

fn describe(rule: &MatchRule) -> String {
    let mut parts = Vec::new();
    if let Some(ref markers) = rule.container_markers {
        parts.push(format!("the container name contains {}", markers.join(" or ")));
    }
    if let Some(ref models) = rule.models {
        parts.push(format!("the model is one of {}", models.join(", ")));
    }
    if let Some(ref groups) = rule.groups {
        parts.push(format!("the group is one of {}", groups.join(", ")));
    }
    parts.join("; or ")
}

pub fn schema() -> Result<(), ShipplanError> {
    print!(
        r#"JSON Trip Configuration Schema
==============================

A configuration file decides which order lines are shipped, which trip
each line rides on, and which pair of trips is container-balanced. When
you run `shipplan plan`, every line of the day is checked against it.

Top-level fields:
  name          (string, required)  Human-readable name
  description   (string, optional)  What this configuration is for
  version       (string, required)  Version identifier (e.g., "2025.11")
  customer      (string, optional)  Customer the layout belongs to
  eligibility   (object, required)  Match rule (see below). Lines matching
                                    none of its criteria are excluded.
  trips         (array, required)   Trips in departure order (see below)
  split         (object, optional)  {{ "source": trip, "overflow": trip }}
                                    The source trip's lines are divided so
                                    the source carries ceil(total / 2)
                                    containers and the overflow the rest.
  annotations   (array, optional)   Per-group container totals (see below)
  sub_variants  (object, optional)  {{ "group": code, "trips": [trip, ...] }}
                                    Lines of this group whose model ends in
                                    -L/-R are paired with their main model.

Match rule (any present criterion matching is enough):
  container_markers (array, optional)  Case-insensitive substrings of the
                                       container name (e.g., "4-5T")
  models            (array, optional)  Model names (trimmed, uppercased)
  groups            (array, optional)  Product-group codes (trimmed,
                                       uppercased)
  A list that is present must not be empty.

Each trip:
  name          (string, required)  Unique trip name
  label         (string, optional)  Display label
  departure     (string, optional)  "HH:MM"
  match         (object, optional)  Match rule. Required for every trip
                                    except the split overflow, which must
                                    not have one.

Each annotation:
  trip          (string, required)  Trip to annotate
  groups        (array, required)   Group codes to total
  priority      (array, optional)   Output order; others follow
  display_names (object, optional)  Map of group code to display name

Example:
{{
  "name": "Two-run layout",
  "version": "1.0",
  "eligibility": {{ "container_markers": ["4-5T"], "groups": ["TANK"] }},
  "trips": [
    {{ "name": "am", "departure": "06:00",
       "match": {{ "container_markers": ["4-5T"] }} }},
    {{ "name": "mid", "departure": "10:00",
       "match": {{ "groups": ["TANK"] }} }},
    {{ "name": "pm", "departure": "13:00" }}
  ],
  "split": {{ "source": "am", "overflow": "pm" }}
}}
"#
    );
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), ShipplanError> {
    let config = shipplan_core::rules::load_config(file)?;

    println!("Configuration '{}' (v{}) is valid.", config.name, config.version);
    let names: Vec<&str> = config.trips.iter().map(|t| t.name.as_str()).collect();
    println!("  Trips: {}", names.join(", "));
    if let Some(ref split) = config.split {
        println!("  Split: {} -> {}", split.source, split.overflow);
    }

    // Potential issues (warnings, not errors)
    let mut warnings = Vec::new();
    for trip in &config.trips {
        let Some(ref rule) = trip.rule else { continue };
        for (kind, listed, allowed) in [
            ("model", &rule.models, &config.eligibility.models),
            ("group", &rule.groups, &config.eligibility.groups),
        ] {
            for code in listed.iter().flatten() {
                let eligible = allowed
                    .iter()
                    .flatten()
                    .any(|c| c.trim().eq_ignore_ascii_case(code.trim()));
                if !eligible {
                    warnings.push(format!(
                        "trip '{}' matches {} '{}' which is not in the eligibility {}s",
                        trip.name, kind, code, kind
                    ));
                }
            }
        }
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}
