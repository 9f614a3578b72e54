//! Health regulator
//!
//! Hit points with per-category resistances. Purely event driven: there is no
//! per-tick update. Alive -> Dead is the only transition and it never reverses;
//! bringing a combatant back is a [`HealthRegulator::reset`] by its owner.

use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::bus::{CombatNotification, NotificationBus};
use super::constants::DEFAULT_MAX_HEALTH;
use super::damage::DamageCategory;
use crate::config::{require_positive, ConfigError};

/// Tuning for a health regulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthConfig {
    pub max_health: f32,
    /// Damage mitigation per category, 0.0 (none) to 1.0 (immune).
    /// Missing categories take full damage.
    #[serde(default)]
    pub resistances: HashMap<DamageCategory, f32>,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            max_health: DEFAULT_MAX_HEALTH,
            resistances: HashMap::new(),
        }
    }
}

impl HealthConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("health.max_health", self.max_health)
    }
}

/// Hit points and resistances for one combatant
#[derive(Debug)]
pub struct HealthRegulator {
    config: HealthConfig,
    current_health: f32,
    alive: bool,
    resistances: HashMap<DamageCategory, f32>,
    bus: NotificationBus,
}

impl HealthRegulator {
    /// Build a regulator at full health. Configured resistances are clamped
    /// the same way [`set_resistance`](Self::set_resistance) clamps them.
    pub fn new(config: HealthConfig, bus: NotificationBus) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut health = Self {
            current_health: config.max_health,
            alive: true,
            resistances: HashMap::new(),
            config,
            bus,
        };
        health.apply_configured_resistances();
        Ok(health)
    }

    fn apply_configured_resistances(&mut self) {
        self.resistances.clear();
        let configured: Vec<(DamageCategory, f32)> = self
            .config
            .resistances
            .iter()
            .map(|(category, value)| (*category, *value))
            .collect();
        for (category, value) in configured {
            self.set_resistance(category, value);
        }
    }

    /// Apply damage after resistance. Returns the hit points actually removed
    /// (0 once dead).
    pub fn take_damage(&mut self, amount: f32, category: DamageCategory) -> f32 {
        if !self.alive {
            return 0.0;
        }

        debug_assert!(amount >= 0.0, "take_damage: amount cannot be negative, got {}", amount);
        let resistance = self.resistance(category);
        if resistance >= 1.0 {
            return 0.0;
        }
        let mitigated = amount.max(0.0) * (1.0 - resistance);
        let applied = mitigated.min(self.current_health);

        if applied <= 0.0 {
            return 0.0;
        }

        self.current_health = (self.current_health - mitigated).max(0.0);
        self.bus.publish(CombatNotification::HealthChanged {
            current: self.current_health,
        });

        if self.current_health <= 0.0 {
            self.current_health = 0.0;
            self.alive = false;
            debug!("Combatant died from {} damage", category.name());
            self.bus.publish(CombatNotification::Died);
        }

        applied
    }

    /// Restore hit points up to max. Returns the amount actually restored
    /// (0 when dead or already full).
    pub fn heal(&mut self, amount: f32) -> f32 {
        if !self.alive {
            return 0.0;
        }

        debug_assert!(amount >= 0.0, "heal: amount cannot be negative, got {}", amount);
        let before = self.current_health;
        self.current_health = (self.current_health + amount.max(0.0)).min(self.config.max_health);

        let restored = self.current_health - before;
        if restored > 0.0 {
            self.bus.publish(CombatNotification::HealthChanged {
                current: self.current_health,
            });
        }
        restored
    }

    /// Set the mitigation for a category, clamped to [0, 1]
    pub fn set_resistance(&mut self, category: DamageCategory, value: f32) {
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        self.resistances.insert(category, value);
    }

    /// Mitigation for a category; 0.0 when never set
    pub fn resistance(&self, category: DamageCategory) -> f32 {
        self.resistances.get(&category).copied().unwrap_or(0.0)
    }

    pub fn current_health(&self) -> f32 {
        self.current_health
    }

    pub fn max_health(&self) -> f32 {
        self.config.max_health
    }

    pub fn fraction(&self) -> f32 {
        self.current_health / self.config.max_health
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn config(&self) -> &HealthConfig {
        &self.config
    }

    /// Full health, alive, configured resistances
    pub fn reset(&mut self) {
        self.current_health = self.config.max_health;
        self.alive = true;
        self.apply_configured_resistances();
        self.bus.publish(CombatNotification::HealthChanged {
            current: self.current_health,
        });
    }
}
