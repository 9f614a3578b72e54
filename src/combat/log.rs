//! Combat logging
//!
//! Records combat events for post-run analysis. The headless runner saves the
//! log as JSON when a scenario finishes.

use std::path::Path;

use bevy::prelude::*;
use serde::Serialize;

/// A single entry in the combat log
#[derive(Debug, Clone, Serialize)]
pub struct CombatLogEntry {
    /// Timestamp in simulation time (seconds since start)
    pub timestamp: f32,
    /// The type of event
    pub event_type: CombatLogEventType,
    /// Name of the combatant the entry is about
    pub combatant: String,
    /// Human-readable description of the event
    pub message: String,
    /// Numeric payload (damage, heal, projectile count), if any
    pub amount: Option<f32>,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CombatLogEventType {
    /// Damage taken, after shields and resistance
    Damage,
    /// Damage soaked by a shield
    Absorbed,
    /// Health restored
    Healing,
    /// Weapon fired
    ShotsFired,
    /// Overload started or ended
    Overload,
    /// Shield activated or depleted
    Shield,
    /// Combatant died
    Death,
    /// Run event (start, end, etc.)
    MatchEvent,
}

/// The combat log resource storing all events
#[derive(Resource, Default, Debug, Serialize)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current simulation time
    pub match_time: f32,
}

impl CombatLog {
    /// Clear the log for a new run
    pub fn clear(&mut self) {
        self.entries.clear();
        self.match_time = 0.0;
    }

    /// Add a new entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, combatant: &str, message: String) {
        self.log_amount(event_type, combatant, message, None);
    }

    /// Add a new entry carrying a numeric payload
    pub fn log_amount(
        &mut self,
        event_type: CombatLogEventType,
        combatant: &str,
        message: String,
        amount: Option<f32>,
    ) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type,
            combatant: combatant.to_string(),
            message,
            amount,
        });
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Sum of logged amounts of one type for one combatant
    pub fn total_for(&self, combatant: &str, event_type: CombatLogEventType) -> f32 {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type && e.combatant == combatant)
            .filter_map(|e| e.amount)
            .sum()
    }

    /// Number of entries of one type for one combatant
    pub fn count_for(&self, combatant: &str, event_type: CombatLogEventType) -> usize {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type && e.combatant == combatant)
            .count()
    }

    /// Write the log as pretty JSON
    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize combat log: {}", e))?;
        std::fs::write(path, contents)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        info!("Saved combat log to {}", path.display());
        Ok(())
    }
}
