//! Tests for combat log recording and queries
//!
//! These tests verify that the CombatLog correctly:
//! - Records shield absorbs, damage, overloads and deaths from a running app
//! - Aggregates amounts and counts per combatant
//! - Saves itself as JSON

use bevy::prelude::*;
use regex::Regex;

use overclock::combat::combatant::CombatIntent;
use overclock::combat::events::{CombatIntentEvent, DamageEvent};
use overclock::headless::{build_headless_app, HeadlessRunState, ScenarioConfig};
use overclock::{CombatLog, CombatLogEventType, CombatantConfig, DamageCategory};

fn create_test_log() -> CombatLog {
    CombatLog::default()
}

/// A headless app with nothing scripted, plus its combatant entity
fn create_app(config: CombatantConfig) -> (App, Entity) {
    let scenario = ScenarioConfig {
        max_duration_secs: 60.0,
        ..ScenarioConfig::default()
    };
    let mut app = build_headless_app(&scenario, config, false).unwrap();
    // Prime the clock
    app.update();
    let entity = app.world().resource::<HeadlessRunState>().combatant;
    (app, entity)
}

fn send_damage(app: &mut App, target: Entity, amount: f32, category: DamageCategory) {
    app.world_mut().send_event(DamageEvent {
        target,
        source: None,
        amount,
        category,
    });
    app.update();
}

fn messages(log: &CombatLog, event_type: CombatLogEventType) -> Vec<String> {
    log.filter_by_type(event_type)
        .iter()
        .map(|e| e.message.clone())
        .collect()
}

// =============================================================================
// Recorded Messages
// =============================================================================

#[test]
fn test_absorb_and_damage_messages() {
    let (mut app, player) = create_app(CombatantConfig::default());

    send_damage(&mut app, player, 70.0, DamageCategory::SQLInjection);

    let log = app.world().resource::<CombatLog>();
    let absorbed = messages(log, CombatLogEventType::Absorbed);
    let damage = messages(log, CombatLogEventType::Damage);

    let absorb_re = Regex::new(r"^Player's Basic Shield absorbs (\d+) SQL Injection damage$").unwrap();
    let damage_re = Regex::new(r"^Player takes (\d+) SQL Injection damage$").unwrap();

    assert_eq!(absorbed.len(), 1);
    assert_eq!(&absorb_re.captures(&absorbed[0]).unwrap()[1], "50");
    assert_eq!(damage.len(), 1);
    assert_eq!(&damage_re.captures(&damage[0]).unwrap()[1], "20");

    assert_eq!(log.total_for("Player", CombatLogEventType::Absorbed), 50.0);
    assert_eq!(log.total_for("Player", CombatLogEventType::Damage), 20.0);
}

#[test]
fn test_depletion_and_death_logged_once() {
    let (mut app, player) = create_app(CombatantConfig::default());

    send_damage(&mut app, player, 200.0, DamageCategory::Physical);
    send_damage(&mut app, player, 200.0, DamageCategory::Physical);

    let log = app.world().resource::<CombatLog>();
    let shield = messages(log, CombatLogEventType::Shield);
    let deaths = messages(log, CombatLogEventType::Death);

    assert!(shield.iter().any(|m| m == "Player's shield is depleted"));
    assert_eq!(deaths, vec!["Player has been destroyed".to_string()]);
    // Dead combatants take no further damage entries
    assert_eq!(log.count_for("Player", CombatLogEventType::Damage), 1);
}

#[test]
fn test_overload_and_recovery_logged() {
    let config = CombatantConfig {
        name: "Hothead".to_string(),
        heat_per_damage: 1.0,
        ..CombatantConfig::default()
    };
    let (mut app, player) = create_app(config);

    // 50 absorbed, 50 taken, 100 heat
    send_damage(&mut app, player, 100.0, DamageCategory::DDoS);

    // Three seconds of lockout at 60 Hz
    for _ in 0..200 {
        app.update();
    }

    let log = app.world().resource::<CombatLog>();
    let overload_re = Regex::new(r"^Hothead (overloads|recovers from overload)$").unwrap();
    let overloads = messages(log, CombatLogEventType::Overload);

    assert_eq!(overloads.len(), 2, "got {:?}", overloads);
    assert!(overloads.iter().all(|m| overload_re.is_match(m)));
    assert!(overloads[0].ends_with("overloads"));
}

#[test]
fn test_shots_fired_message_names_mode() {
    let (mut app, player) = create_app(CombatantConfig::default());

    app.world_mut().send_event(CombatIntentEvent {
        entity: player,
        intent: CombatIntent::FireRequested,
    });
    app.update();

    let log = app.world().resource::<CombatLog>();
    let shots = messages(log, CombatLogEventType::ShotsFired);
    assert_eq!(shots, vec!["Player fires Precision (1 shot)".to_string()]);
    assert_eq!(log.total_for("Player", CombatLogEventType::ShotsFired), 1.0);
}

#[test]
fn test_run_start_is_logged() {
    let (app, _) = create_app(CombatantConfig::default());
    let log = app.world().resource::<CombatLog>();
    let start = log.filter_by_type(CombatLogEventType::MatchEvent);
    assert_eq!(start.len(), 1);
    assert_eq!(start[0].message, "Player enters (headless mode)");
}

// =============================================================================
// Queries
// =============================================================================

#[test]
fn test_queries_on_empty_log() {
    let log = create_test_log();
    assert_eq!(log.total_for("Player", CombatLogEventType::Damage), 0.0);
    assert_eq!(log.count_for("Player", CombatLogEventType::Death), 0);
    assert!(log.recent(5).is_empty());
}

#[test]
fn test_totals_are_per_combatant() {
    let mut log = create_test_log();
    log.log_amount(CombatLogEventType::Damage, "Player", "a".to_string(), Some(10.0));
    log.log_amount(CombatLogEventType::Damage, "Drone", "b".to_string(), Some(99.0));
    log.log_amount(CombatLogEventType::Damage, "Player", "c".to_string(), Some(5.0));
    log.log(CombatLogEventType::Damage, "Player", "no amount".to_string());

    assert_eq!(log.total_for("Player", CombatLogEventType::Damage), 15.0);
    assert_eq!(log.count_for("Player", CombatLogEventType::Damage), 3);
    assert_eq!(log.total_for("Drone", CombatLogEventType::Damage), 99.0);
}

#[test]
fn test_save_to_file_writes_json() {
    let mut log = create_test_log();
    log.log_amount(
        CombatLogEventType::Healing,
        "Player",
        "Player is repaired for 20".to_string(),
        Some(20.0),
    );

    let path = std::env::temp_dir().join(format!("overclock_log_{}.json", std::process::id()));
    log.save_to_file(&path).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(json["entries"][0]["event_type"], "Healing");
    assert_eq!(json["entries"][0]["amount"], 20.0);

    let _ = std::fs::remove_file(&path);
}
