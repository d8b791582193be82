use shipplan_core::error::ShipplanError;
use shipplan_core::rules::builtin;
use shipplan_core::rules::schema::TripConfig;
use shipplan_core::PlanOptions;
use std::path::PathBuf;

use crate::output;

pub fn run(
    input_file: PathBuf,
    rule_files: Vec<PathBuf>,
    presets: Vec<String>,
    output_format: &str,
    trace: bool,
    show_zero: bool,
) -> Result<(), ShipplanError> {
    let mut configs: Vec<TripConfig> = Vec::new();

    // Default to the first preset if nothing was specified.
    let effective_presets = if presets.is_empty() && rule_files.is_empty() {
        builtin::PRESETS.iter().take(1).map(|s| s.to_string()).collect()
    } else {
        presets
    };

    for preset in &effective_presets {
        configs.push(builtin::load_preset(preset)?);
    }
    for path in &rule_files {
        configs.push(shipplan_core::rules::load_config(path)?);
    }

    let day = shipplan_core::load_day(&input_file)?;
    let options = PlanOptions {
        include_trace: trace,
    };

    let plans = configs
        .iter()
        .map(|config| shipplan_core::plan_day(&day, config, &options))
        .collect::<Result<Vec<_>, _>>()?;

    match output_format {
        "json" => output::json::print(&plans)?,
        _ => output::table::print(&plans, show_zero, trace),
    }

    Ok(())
}
