//! JSON scenario configuration for headless mode
//!
//! A scenario scripts what happens to a single combatant over time: hits,
//! trigger pulls, venting, heals and shield activations, plus optional seeded
//! random incoming fire.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::combat::damage::DamageCategory;
use crate::combat::shield::ShieldType;
use crate::config::{load_combatant_config, CombatantConfig};

/// Something the script does at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScenarioAction {
    /// Hit the combatant
    Damage {
        amount: f32,
        #[serde(default)]
        category: DamageCategory,
    },
    /// One trigger pull
    Fire,
    /// Pull the trigger every frame for `duration` seconds
    HoldTrigger { duration: f32 },
    VentStart,
    VentStop,
    Heal { amount: f32 },
    ActivateShield {
        #[serde(default)]
        shield_type: ShieldType,
        strength: f32,
    },
    /// Respawn the combatant with its configured state
    Reset,
}

/// A scripted action and when it happens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Seconds since the scenario started
    pub at: f32,
    pub action: ScenarioAction,
}

/// Random hits arriving at a fixed interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingFire {
    /// Seconds between hits
    pub interval: f32,
    pub min_damage: f32,
    pub max_damage: f32,
    /// Categories to draw from (empty = all)
    #[serde(default)]
    pub categories: Vec<DamageCategory>,
}

/// Headless scenario configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Scenario name used in output
    #[serde(default = "default_name")]
    pub name: String,
    /// Inline combatant tuning (takes precedence over `combatant_config`)
    #[serde(default)]
    pub combatant: Option<CombatantConfig>,
    /// Path to a RON combatant tuning file
    #[serde(default)]
    pub combatant_config: Option<String>,
    /// Simulation steps per second
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f32,
    /// Maximum scenario duration in seconds
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// End the run as soon as the combatant dies
    #[serde(default = "default_true")]
    pub stop_on_death: bool,
    /// Random seed for deterministic reproduction of incoming fire
    #[serde(default)]
    pub random_seed: Option<u64>,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
    #[serde(default)]
    pub incoming_fire: Option<IncomingFire>,
    /// Where to write the run report (optional)
    #[serde(default)]
    pub output_path: Option<String>,
}

/// Slowest and fastest supported simulation rates, in steps per second
pub const MIN_TICK_RATE: f32 = 1.0;
pub const MAX_TICK_RATE: f32 = 1000.0;

fn default_name() -> String {
    "Scenario".to_string()
}

fn default_tick_rate() -> f32 {
    60.0
}

fn default_max_duration() -> f32 {
    30.0
}

fn default_true() -> bool {
    true
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            combatant: None,
            combatant_config: None,
            tick_rate: default_tick_rate(),
            max_duration_secs: default_max_duration(),
            stop_on_death: true,
            random_seed: None,
            timeline: Vec::new(),
            incoming_fire: None,
            output_path: None,
        }
    }
}

impl ScenarioConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read scenario file: {}", e))?;
        Self::from_json(&contents)
    }

    /// Parse and validate JSON text
    pub fn from_json(contents: &str) -> Result<Self, String> {
        let config: ScenarioConfig = serde_json::from_str(contents)
            .map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_TICK_RATE..=MAX_TICK_RATE).contains(&self.tick_rate) {
            return Err(format!(
                "tick_rate must be within [{}, {}], got {}",
                MIN_TICK_RATE, MAX_TICK_RATE, self.tick_rate
            ));
        }
        if !(self.max_duration_secs > 0.0) || !self.max_duration_secs.is_finite() {
            return Err("max_duration_secs must be positive".to_string());
        }

        for (i, entry) in self.timeline.iter().enumerate() {
            if !(entry.at >= 0.0) {
                return Err(format!("timeline[{}].at must not be negative", i));
            }
            match &entry.action {
                ScenarioAction::Damage { amount, .. } | ScenarioAction::Heal { amount } => {
                    if !(*amount >= 0.0) {
                        return Err(format!("timeline[{}] amount must not be negative", i));
                    }
                }
                ScenarioAction::HoldTrigger { duration } => {
                    if !(*duration > 0.0) {
                        return Err(format!("timeline[{}] duration must be positive", i));
                    }
                }
                ScenarioAction::ActivateShield { strength, .. } => {
                    if !(*strength > 0.0) {
                        return Err(format!("timeline[{}] shield strength must be positive", i));
                    }
                }
                ScenarioAction::Fire
                | ScenarioAction::VentStart
                | ScenarioAction::VentStop
                | ScenarioAction::Reset => {}
            }
        }

        if let Some(incoming) = &self.incoming_fire {
            let step = 1.0 / self.tick_rate;
            if !(incoming.interval >= step) || !incoming.interval.is_finite() {
                return Err(format!(
                    "incoming_fire.interval must be at least one tick ({:.4}s), got {}",
                    step, incoming.interval
                ));
            }
            if !(incoming.min_damage >= 0.0) || incoming.max_damage < incoming.min_damage {
                return Err(format!(
                    "incoming_fire damage range [{}, {}] is invalid",
                    incoming.min_damage, incoming.max_damage
                ));
            }
        }

        if let Some(combatant) = &self.combatant {
            combatant.validate().map_err(|e| e.to_string())?;
        }

        Ok(())
    }

    /// Inline tuning, else the referenced RON file, else built-in defaults
    pub fn resolve_combatant(&self) -> Result<CombatantConfig, String> {
        if let Some(combatant) = &self.combatant {
            return Ok(combatant.clone());
        }
        match &self.combatant_config {
            Some(path) => load_combatant_config(&PathBuf::from(path)).map_err(|e| e.to_string()),
            None => Ok(CombatantConfig::default()),
        }
    }

    /// Timeline sorted by time; entries at the same time keep file order
    pub fn sorted_timeline(&self) -> Vec<TimelineEntry> {
        let mut timeline = self.timeline.clone();
        timeline.sort_by(|a, b| a.at.total_cmp(&b.at));
        timeline
    }
}
