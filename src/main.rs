//! Overclock - combat resource core
//!
//! Runs a combatant through a scripted scenario and prints how it fared.

use std::process::ExitCode;

use overclock::cli::{parse_args, Args};
use overclock::config::load_combatant_config;
use overclock::headless::{run_headless_scenario, RunResult, ScenarioConfig};

/// Scenario used when no `--headless` file is given
const DEMO_SCENARIO: &str = include_str!("../demos/overheat.json");

fn main() -> ExitCode {
    let args = parse_args();

    match run(args) {
        Ok(result) => {
            print_summary(&result);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Headless run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<RunResult, String> {
    let mut scenario = match &args.headless {
        Some(path) => ScenarioConfig::load_from_file(path)?,
        None => ScenarioConfig::from_json(DEMO_SCENARIO)?,
    };

    if let Some(path) = &args.config {
        scenario.combatant = Some(load_combatant_config(path).map_err(|e| e.to_string())?);
    }
    if let Some(output) = &args.output {
        scenario.output_path = Some(output.to_string_lossy().to_string());
    }
    if let Some(max_duration) = args.max_duration {
        scenario.max_duration_secs = max_duration;
    }
    if args.seed.is_some() {
        scenario.random_seed = args.seed;
    }

    run_headless_scenario(scenario, true)
}

fn print_summary(result: &RunResult) {
    println!("Scenario: {} ({})", result.scenario, result.combatant);
    println!(
        "  {} after {:.1}s",
        if result.survived { "Survived" } else { "Destroyed" },
        result.elapsed
    );
    println!(
        "  Health {:.0}/{:.0}  Shield {:.0}  Heat {:.0}{}",
        result.final_health,
        result.max_health,
        result.final_shield,
        result.final_heat,
        if result.overloaded_at_end { " (overloaded)" } else { "" }
    );
    println!(
        "  Shots {} ({} projectiles)  Overloads {}",
        result.shots_fired, result.projectiles_fired, result.overloads
    );
    println!(
        "  Damage taken {:.0}  absorbed {:.0}",
        result.damage_taken, result.damage_absorbed
    );
    if let Some(seed) = result.random_seed {
        println!("  Seed {}", seed);
    }
}
