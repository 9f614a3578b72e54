//! Integration tests for headless scenario execution
//!
//! These tests verify that:
//! - Scripted scenarios run to completion at a fixed time step
//! - Run results are accessible programmatically
//! - Seeded incoming fire produces deterministic results

use overclock::headless::{
    run_headless_scenario, IncomingFire, ScenarioAction, ScenarioConfig, TimelineEntry,
};
use overclock::DamageCategory;

/// Helper to create a short scenario
fn create_scenario(max_duration_secs: f32, timeline: Vec<(f32, ScenarioAction)>) -> ScenarioConfig {
    ScenarioConfig {
        name: "Test".to_string(),
        max_duration_secs,
        timeline: timeline
            .into_iter()
            .map(|(at, action)| TimelineEntry { at, action })
            .collect(),
        ..ScenarioConfig::default()
    }
}

#[test]
fn test_shield_soaks_single_hit() {
    let scenario = create_scenario(
        2.0,
        vec![(
            0.5,
            ScenarioAction::Damage {
                amount: 30.0,
                category: DamageCategory::Physical,
            },
        )],
    );

    let result = run_headless_scenario(scenario, false).unwrap();

    assert!(result.survived);
    assert!(result.elapsed >= 2.0 && result.elapsed < 2.1, "elapsed {}", result.elapsed);
    // Recharge delay has not run out by the end
    assert_eq!(result.final_shield, 20.0);
    assert_eq!(result.final_health, 100.0);
    assert_eq!(result.damage_absorbed, 30.0);
    assert_eq!(result.damage_taken, 0.0);
    // 7.5 heat from the hit has long dissipated
    assert_eq!(result.final_heat, 0.0);
}

#[test]
fn test_death_ends_run_early() {
    let scenario = create_scenario(
        10.0,
        vec![(
            0.1,
            ScenarioAction::Damage {
                amount: 500.0,
                category: DamageCategory::BruteForce,
            },
        )],
    );

    let result = run_headless_scenario(scenario, false).unwrap();

    assert!(!result.survived);
    assert_eq!(result.final_health, 0.0);
    assert!(result.elapsed < 0.5, "run should stop at death, got {}", result.elapsed);
}

#[test]
fn test_run_continues_past_death_when_asked() {
    let mut scenario = create_scenario(
        1.0,
        vec![(
            0.1,
            ScenarioAction::Damage {
                amount: 500.0,
                category: DamageCategory::Physical,
            },
        )],
    );
    scenario.stop_on_death = false;

    let result = run_headless_scenario(scenario, false).unwrap();

    assert!(!result.survived);
    assert!(result.elapsed >= 1.0);
}

#[test]
fn test_held_trigger_fires_at_weapon_rate() {
    let scenario = create_scenario(2.0, vec![(0.0, ScenarioAction::HoldTrigger { duration: 1.0 })]);

    let result = run_headless_scenario(scenario, false).unwrap();

    // 8 shots per second while held
    assert!(
        (7..=9).contains(&result.shots_fired),
        "expected about 8 shots, got {}",
        result.shots_fired
    );
    assert!(result.projectiles_fired >= result.shots_fired);
    assert_eq!(result.overloads, 0);
}

#[test]
fn test_hot_weapon_overloads() {
    let scenario = ScenarioConfig::from_json(
        r#"{
            "name": "Hothead",
            "max_duration_secs": 2.0,
            "combatant": {
                "name": "Hothead",
                "weapon": { "name": "Furnace", "heat_per_shot": 30.0, "fire_rate": 8.0 }
            },
            "timeline": [ { "at": 0.0, "action": { "type": "HoldTrigger", "duration": 1.0 } } ]
        }"#,
    )
    .unwrap();

    let result = run_headless_scenario(scenario, false).unwrap();

    assert_eq!(result.combatant, "Hothead");
    assert_eq!(result.overloads, 1);
    assert_eq!(result.shots_fired, 4);
    // Three-second lockout outlasts the run
    assert!(result.overloaded_at_end);
    assert_eq!(result.final_heat, 100.0);
}

#[test]
fn test_heal_and_shield_actions_apply() {
    let scenario = create_scenario(
        1.0,
        vec![
            (
                0.1,
                ScenarioAction::Damage {
                    amount: 90.0,
                    category: DamageCategory::Physical,
                },
            ),
            (0.2, ScenarioAction::Heal { amount: 25.0 }),
            (
                0.3,
                ScenarioAction::ActivateShield {
                    shield_type: overclock::combat::shield::ShieldType::Quantum,
                    strength: 120.0,
                },
            ),
        ],
    );

    let result = run_headless_scenario(scenario, false).unwrap();

    // 50 absorbed, 40 taken, 25 restored
    assert_eq!(result.damage_taken, 40.0);
    assert_eq!(result.final_health, 85.0);
    assert_eq!(result.final_shield, 120.0);
}

#[test]
fn test_seeded_runs_are_deterministic() {
    let make = || {
        let mut scenario = create_scenario(3.0, vec![]);
        scenario.random_seed = Some(42);
        scenario.incoming_fire = Some(IncomingFire {
            interval: 0.25,
            min_damage: 1.0,
            max_damage: 10.0,
            categories: vec![],
        });
        scenario
    };

    let first = run_headless_scenario(make(), false).unwrap();
    let second = run_headless_scenario(make(), false).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.random_seed, Some(42));
    assert!(first.damage_absorbed > 0.0);
}

#[test]
fn test_report_written_to_output_path() {
    let path = std::env::temp_dir().join(format!("overclock_report_{}.json", std::process::id()));
    let mut scenario = create_scenario(
        0.5,
        vec![(
            0.1,
            ScenarioAction::Damage {
                amount: 10.0,
                category: DamageCategory::Malware,
            },
        )],
    );
    scenario.output_path = Some(path.to_string_lossy().to_string());

    run_headless_scenario(scenario, false).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let report: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(report["result"]["scenario"], "Test");
    assert!(report["log"]["entries"].as_array().is_some_and(|e| !e.is_empty()));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_invalid_scenario_is_rejected() {
    let mut scenario = create_scenario(1.0, vec![]);
    scenario.tick_rate = 0.0;
    assert!(run_headless_scenario(scenario, false).is_err());
}

#[test]
fn test_extreme_tick_rate_is_an_error() {
    let mut scenario = create_scenario(1.0, vec![]);
    scenario.tick_rate = 1e-30;
    let err = run_headless_scenario(scenario, false).unwrap_err();
    assert!(err.contains("tick_rate"), "unexpected error: {}", err);
}

#[test]
fn test_incoming_fire_faster_than_a_tick_is_rejected() {
    let mut scenario = create_scenario(1.0, vec![]);
    scenario.incoming_fire = Some(IncomingFire {
        interval: 1e-9,
        min_damage: 1.0,
        max_damage: 2.0,
        categories: vec![],
    });
    let err = run_headless_scenario(scenario, false).unwrap_err();
    assert!(err.contains("incoming_fire.interval"), "unexpected error: {}", err);
}

#[test]
fn test_incoming_fire_every_tick_keeps_pace() {
    let mut scenario = create_scenario(1.0, vec![]);
    scenario.random_seed = Some(3);
    scenario.incoming_fire = Some(IncomingFire {
        interval: 1.0 / 60.0,
        min_damage: 0.5,
        max_damage: 0.5,
        categories: vec![DamageCategory::Physical],
    });

    let result = run_headless_scenario(scenario, false).unwrap();

    // About one hit per tick, all soaked by the 50-point shield
    let hits = result.damage_absorbed / 0.5;
    assert!((55.0..=62.0).contains(&hits), "got {} hits", hits);
    assert_eq!(result.damage_taken, 0.0);
}
