//! Headless scenario execution
//!
//! Runs a scripted scenario through [`CombatPlugin`] without any window, at a
//! fixed time step, and reports how the combatant fared.

use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use serde::Serialize;

use crate::combat::combatant::{CombatIntent, Combatant};
use crate::combat::events::{CombatIntentEvent, DamageEvent};
use crate::combat::log::{CombatLog, CombatLogEventType};
use crate::combat::systems::build_combatant;
use crate::combat::{CombatPlugin, CombatSet};
use crate::config::CombatantConfig;
use crate::rng::GameRng;

use super::config::{IncomingFire, ScenarioAction, ScenarioConfig, TimelineEntry};

/// Upper bound on random hits issued in a single frame
const MAX_INCOMING_PER_FRAME: usize = 8;

/// Result of a completed headless scenario
///
/// This struct provides programmatic access to run results for testing and analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    pub scenario: String,
    pub combatant: String,
    /// Simulated seconds until the run ended
    pub elapsed: f32,
    pub survived: bool,
    pub max_health: f32,
    pub final_health: f32,
    pub final_shield: f32,
    pub final_heat: f32,
    pub overloaded_at_end: bool,
    pub shots_fired: u32,
    pub projectiles_fired: u32,
    pub damage_taken: f32,
    pub damage_absorbed: f32,
    /// How many times the combatant overloaded
    pub overloads: usize,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
}

/// Resource to track headless run state
#[derive(Resource)]
pub struct HeadlessRunState {
    pub scenario: String,
    pub max_duration: f32,
    pub elapsed_time: f32,
    pub stop_on_death: bool,
    /// The scripted combatant
    pub combatant: Entity,
    /// Remaining scripted actions, earliest first
    pending: VecDeque<TimelineEntry>,
    incoming_fire: Option<IncomingFire>,
    next_incoming_at: f32,
    trigger_held_until: Option<f32>,
    pub random_seed: Option<u64>,
    pub run_complete: bool,
    /// Populated when the run completes
    pub result: Option<RunResult>,
}

/// Written to `output_path` when a run completes
#[derive(Serialize)]
struct RunReport<'a> {
    result: &'a RunResult,
    log: &'a CombatLog,
}

/// Build an app ready to step through `scenario`
///
/// `with_logging` installs Bevy's log subscriber; leave it off when more than
/// one app may be built in the same process (tests).
pub fn build_headless_app(
    scenario: &ScenarioConfig,
    combatant_config: CombatantConfig,
    with_logging: bool,
) -> Result<App, String> {
    scenario.validate()?;

    let step = Duration::try_from_secs_f32(1.0 / scenario.tick_rate)
        .map_err(|e| format!("Invalid tick_rate {}: {}", scenario.tick_rate, e))?;
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    if with_logging {
        app.add_plugins(LogPlugin::default());
    }
    app.add_plugins(CombatPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(step))
        .insert_resource(GameRng::from_optional_seed(scenario.random_seed));

    // Slow tick rates must not be clipped by the virtual clock
    {
        let mut virtual_time = app.world_mut().resource_mut::<Time<Virtual>>();
        let max_delta = virtual_time.max_delta().max(step);
        virtual_time.set_max_delta(max_delta);
    }

    let (combatant, inbox) = build_combatant(combatant_config).map_err(|e| e.to_string())?;
    let name = combatant.name().to_string();
    let entity = app.world_mut().spawn((combatant, inbox)).id();

    app.world_mut()
        .resource_mut::<CombatLog>()
        .log(CombatLogEventType::MatchEvent, &name, format!("{} enters (headless mode)", name));

    app.insert_resource(HeadlessRunState {
        scenario: scenario.name.clone(),
        max_duration: scenario.max_duration_secs,
        elapsed_time: 0.0,
        stop_on_death: scenario.stop_on_death,
        combatant: entity,
        pending: scenario.sorted_timeline().into(),
        incoming_fire: scenario.incoming_fire.clone(),
        next_incoming_at: scenario.incoming_fire.as_ref().map_or(0.0, |f| f.interval),
        trigger_held_until: None,
        random_seed: scenario.random_seed,
        run_complete: false,
        result: None,
    })
    .add_systems(Update, headless_run_script.before(CombatSet))
    .add_systems(Update, headless_check_run_end.after(CombatSet));

    Ok(app)
}

/// Advance the clock and emit whatever the script has due
fn headless_run_script(
    time: Res<Time>,
    mut state: ResMut<HeadlessRunState>,
    mut rng: ResMut<GameRng>,
    mut combatants: Query<&mut Combatant>,
    mut damage_events: EventWriter<DamageEvent>,
    mut intents: EventWriter<CombatIntentEvent>,
    mut combat_log: ResMut<CombatLog>,
) {
    if state.run_complete {
        return;
    }
    state.elapsed_time += time.delta_secs();
    let now = state.elapsed_time;
    let entity = state.combatant;

    while state.pending.front().is_some_and(|e| e.at <= now) {
        let Some(entry) = state.pending.pop_front() else {
            break;
        };
        match entry.action {
            ScenarioAction::Damage { amount, category } => {
                damage_events.send(DamageEvent {
                    target: entity,
                    source: None,
                    amount,
                    category,
                });
            }
            ScenarioAction::Fire => {
                intents.send(CombatIntentEvent {
                    entity,
                    intent: CombatIntent::FireRequested,
                });
            }
            ScenarioAction::HoldTrigger { duration } => {
                state.trigger_held_until = Some(entry.at + duration);
            }
            ScenarioAction::VentStart => {
                intents.send(CombatIntentEvent {
                    entity,
                    intent: CombatIntent::VentRequested,
                });
            }
            ScenarioAction::VentStop => {
                intents.send(CombatIntentEvent {
                    entity,
                    intent: CombatIntent::VentReleased,
                });
            }
            ScenarioAction::Heal { amount } => {
                if let Ok(mut combatant) = combatants.get_mut(entity) {
                    let restored = combatant.health_mut().heal(amount);
                    if restored > 0.0 {
                        let name = combatant.name().to_string();
                        combat_log.log_amount(
                            CombatLogEventType::Healing,
                            &name,
                            format!("{} is repaired for {:.0}", name, restored),
                            Some(restored),
                        );
                    }
                }
            }
            ScenarioAction::ActivateShield { shield_type, strength } => {
                if let Ok(mut combatant) = combatants.get_mut(entity) {
                    if let Err(e) = combatant.shield_mut().activate_shield(shield_type, strength) {
                        warn!("Scenario shield activation rejected: {}", e);
                    }
                }
            }
            ScenarioAction::Reset => {
                if let Ok(mut combatant) = combatants.get_mut(entity) {
                    combatant.reset();
                    let name = combatant.name().to_string();
                    combat_log.log(CombatLogEventType::MatchEvent, &name, format!("{} respawns", name));
                }
            }
        }
    }

    if state.trigger_held_until.is_some_and(|until| now <= until) {
        intents.send(CombatIntentEvent {
            entity,
            intent: CombatIntent::FireRequested,
        });
    }

    if let Some(incoming) = state.incoming_fire.clone() {
        let mut issued = 0;
        while state.next_incoming_at <= now {
            if issued == MAX_INCOMING_PER_FRAME {
                warn!("Incoming fire fell behind, skipping to the next interval");
                state.next_incoming_at = now + incoming.interval;
                break;
            }
            issued += 1;
            let amount = rng.random_range(incoming.min_damage, incoming.max_damage);
            let category = rng.random_category(&incoming.categories);
            damage_events.send(DamageEvent {
                target: entity,
                source: None,
                amount,
                category,
            });
            state.next_incoming_at += incoming.interval;
        }
    }
}

/// Finish the run on timeout or (optionally) death
fn headless_check_run_end(
    combatants: Query<&Combatant>,
    combat_log: Res<CombatLog>,
    mut state: ResMut<HeadlessRunState>,
) {
    if state.run_complete {
        return;
    }
    let Ok(combatant) = combatants.get(state.combatant) else {
        warn!("Scenario combatant despawned, ending run");
        state.run_complete = true;
        return;
    };

    let timed_out = state.elapsed_time >= state.max_duration;
    let died = !combatant.is_alive();
    if !timed_out && !(died && state.stop_on_death) {
        return;
    }

    if died {
        info!("{} destroyed after {:.1}s", combatant.name(), state.elapsed_time);
    } else {
        info!("Scenario '{}' reached {:.1}s", state.scenario, state.elapsed_time);
    }

    let result = build_run_result(combatant, &combat_log, &state);
    state.result = Some(result);
    state.run_complete = true;
}

fn build_run_result(combatant: &Combatant, combat_log: &CombatLog, state: &HeadlessRunState) -> RunResult {
    let overloads = combat_log
        .filter_by_type(CombatLogEventType::Overload)
        .iter()
        .filter(|e| e.combatant == combatant.name() && e.message.ends_with("overloads"))
        .count();
    let stats = combatant.stats();

    RunResult {
        scenario: state.scenario.clone(),
        combatant: combatant.name().to_string(),
        elapsed: state.elapsed_time,
        survived: combatant.is_alive(),
        max_health: combatant.health().max_health(),
        final_health: combatant.health().current_health(),
        final_shield: combatant.shield().current_strength(),
        final_heat: combatant.heat().current_load(),
        overloaded_at_end: combatant.heat().is_overloaded(),
        shots_fired: stats.shots_fired,
        projectiles_fired: stats.projectiles_fired,
        damage_taken: stats.damage_taken,
        damage_absorbed: stats.damage_absorbed,
        overloads,
        random_seed: state.random_seed,
    }
}

/// Save the result and combat log as JSON
fn save_run_report(result: &RunResult, combat_log: &CombatLog, path: &Path) -> Result<(), String> {
    let report = RunReport {
        result,
        log: combat_log,
    };
    let contents = serde_json::to_string_pretty(&report)
        .map_err(|e| format!("Failed to serialize run report: {}", e))?;
    std::fs::write(path, contents).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}

/// Run a headless scenario with the given configuration
pub fn run_headless_scenario(scenario: ScenarioConfig, with_logging: bool) -> Result<RunResult, String> {
    let combatant_config = scenario.resolve_combatant()?;
    let mut app = build_headless_app(&scenario, combatant_config, with_logging)?;
    info!(
        "Starting headless scenario '{}' ({:.0}s at {:.0} Hz)",
        scenario.name, scenario.max_duration_secs, scenario.tick_rate
    );

    // The first update only primes the clock, hence the slack
    let frame_budget = (scenario.max_duration_secs * scenario.tick_rate).ceil() as usize + 8;
    for _ in 0..frame_budget {
        app.update();
        if app.world().resource::<HeadlessRunState>().run_complete {
            break;
        }
    }

    let result = app
        .world()
        .resource::<HeadlessRunState>()
        .result
        .clone()
        .ok_or_else(|| format!("Scenario '{}' did not finish", scenario.name))?;

    if let Some(path) = &scenario.output_path {
        save_run_report(&result, app.world().resource::<CombatLog>(), Path::new(path))?;
        info!("Run report saved to {}", path);
    }

    Ok(result)
}
