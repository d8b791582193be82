mod commands;
mod logging;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "shipplan",
    version,
    about = "Trip allocation and container-balanced splitting of shipment orders"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan one day's order lines into trips
    Plan {
        /// Path to a shipment day JSON file
        input_file: PathBuf,

        /// Custom JSON trip configuration file(s)
        #[arg(short, long = "rules", value_name = "FILE")]
        rules: Vec<PathBuf>,

        /// Predefined trip configuration(s): tiera, tiera-basic (default: tiera)
        #[arg(short, long = "preset", value_name = "NAME")]
        preset: Vec<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Show per-line decision trace
        #[arg(long)]
        trace: bool,

        /// Show lines whose quantity is zero after splitting
        #[arg(long)]
        show_zero: bool,
    },
    /// Manage and inspect trip configurations
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// List predefined trip configurations
    List,
    /// Explain a trip configuration in plain language
    Explain {
        /// Preset name (e.g., "tiera")
        preset: String,
    },
    /// Print the JSON schema with field descriptions and example
    Schema,
    /// Validate a custom trip configuration file
    Validate {
        /// Path to JSON configuration file
        file: PathBuf,
    },
}

fn main() {
    logging::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Plan {
            input_file,
            rules,
            preset,
            output,
            trace,
            show_zero,
        } => commands::plan::run(input_file, rules, preset, &output, trace, show_zero),
        Commands::Rules { action } => match action {
            RulesAction::List => commands::rules::list(),
            RulesAction::Explain { preset } => commands::rules::explain(&preset),
            RulesAction::Schema => commands::rules::schema(),
            RulesAction::Validate { file } => commands::rules::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
