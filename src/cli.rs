//! Command-line interface for Overclock
//!
//! Runs a scripted scenario headless, or the built-in demo when no scenario
//! file is given.

use clap::Parser;
use std::path::PathBuf;

/// Heat, shield and health combat core simulator
#[derive(Parser, Debug)]
#[command(name = "overclock")]
#[command(about = "Heat, shield and health combat core simulator")]
#[command(version)]
pub struct Args {
    /// Run the scenario in the specified JSON file (built-in demo otherwise)
    #[arg(long, value_name = "SCENARIO_FILE")]
    pub headless: Option<PathBuf>,

    /// Output path for the run report
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Maximum run duration in seconds (overrides the scenario)
    #[arg(long)]
    pub max_duration: Option<f32>,

    /// RON combatant tuning file (overrides the scenario's combatant)
    #[arg(long, value_name = "RON_FILE")]
    pub config: Option<PathBuf>,

    /// Random seed for incoming fire (overrides the scenario)
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_run_demo() {
        let args = Args::try_parse_from(["overclock"]).unwrap();
        assert!(args.headless.is_none());
        assert!(args.max_duration.is_none());
    }

    #[test]
    fn test_headless_overrides() {
        let args = Args::try_parse_from([
            "overclock",
            "--headless",
            "demos/overheat.json",
            "--max-duration",
            "12.5",
            "--seed",
            "9",
        ])
        .unwrap();
        assert_eq!(args.headless, Some(PathBuf::from("demos/overheat.json")));
        assert_eq!(args.max_duration, Some(12.5));
        assert_eq!(args.seed, Some(9));
    }
}
