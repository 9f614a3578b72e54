//! Shield regulator
//!
//! A depletable buffer that soaks up damage before it reaches health. Every
//! absorbed hit restarts a recharge delay; once the delay has fully elapsed the
//! shield regenerates at a fixed rate. A shield drained to zero goes inactive
//! and stays down until it is activated again.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::bus::{CombatNotification, NotificationBus};
use super::constants::{DEFAULT_RECHARGE_DELAY, DEFAULT_RECHARGE_RATE, DEFAULT_SHIELD_STRENGTH};
use super::Tick;
use crate::config::{require_non_negative, require_positive, ConfigError};

/// Shield flavours. Presentation only: every type absorbs damage the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShieldType {
    #[default]
    Basic,
    Firewall,
    Encryption,
    Quantum,
}

impl ShieldType {
    pub fn all() -> &'static [ShieldType] {
        &[
            ShieldType::Basic,
            ShieldType::Firewall,
            ShieldType::Encryption,
            ShieldType::Quantum,
        ]
    }

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            ShieldType::Basic => "Basic Shield",
            ShieldType::Firewall => "Firewall",
            ShieldType::Encryption => "Encryption",
            ShieldType::Quantum => "Quantum Shield",
        }
    }
}

/// Tuning for a shield regulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShieldConfig {
    #[serde(default)]
    pub shield_type: ShieldType,
    /// Strength the shield spawns (and resets) with
    pub max_strength: f32,
    /// Strength restored per second while recharging
    pub recharge_rate: f32,
    /// Seconds without absorbing damage before recharge begins
    pub recharge_delay: f32,
}

impl Default for ShieldConfig {
    fn default() -> Self {
        Self {
            shield_type: ShieldType::Basic,
            max_strength: DEFAULT_SHIELD_STRENGTH,
            recharge_rate: DEFAULT_RECHARGE_RATE,
            recharge_delay: DEFAULT_RECHARGE_DELAY,
        }
    }
}

impl ShieldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("shield.max_strength", self.max_strength)?;
        require_positive("shield.recharge_rate", self.recharge_rate)?;
        require_non_negative("shield.recharge_delay", self.recharge_delay)?;
        Ok(())
    }
}

/// Damage-absorbing shield for one combatant
#[derive(Debug)]
pub struct ShieldRegulator {
    config: ShieldConfig,
    shield_type: ShieldType,
    current_strength: f32,
    max_strength: f32,
    recharge_timer: f32,
    active: bool,
    bus: NotificationBus,
}

impl ShieldRegulator {
    /// Build a shield that starts up and at full strength
    pub fn new(config: ShieldConfig, bus: NotificationBus) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            shield_type: config.shield_type,
            current_strength: config.max_strength,
            max_strength: config.max_strength,
            recharge_timer: 0.0,
            active: true,
            config,
            bus,
        })
    }

    /// Raise a fresh shield of the given type and strength
    pub fn activate_shield(&mut self, shield_type: ShieldType, strength: f32) -> Result<(), ConfigError> {
        require_positive("shield strength", strength)?;

        self.shield_type = shield_type;
        self.max_strength = strength;
        self.current_strength = strength;
        self.recharge_timer = 0.0;
        self.active = true;

        self.bus.publish(CombatNotification::ShieldActivated {
            type_name: shield_type.name().to_string(),
        });
        self.bus.publish(CombatNotification::ShieldChanged {
            current: self.current_strength,
            max: self.max_strength,
        });
        Ok(())
    }

    /// Soak up as much of `damage` as the shield can hold.
    /// Returns the leftover damage that should reach health.
    pub fn absorb_damage(&mut self, damage: f32) -> f32 {
        debug_assert!(damage >= 0.0, "absorb_damage: damage cannot be negative, got {}", damage);
        let damage = damage.max(0.0);

        if !self.active || self.current_strength <= 0.0 {
            return damage;
        }

        let absorbed = damage.min(self.current_strength);
        if absorbed <= 0.0 {
            return damage;
        }

        self.current_strength -= absorbed;
        // Even a partial absorb restarts the full delay
        self.recharge_timer = self.config.recharge_delay;

        self.bus.publish(CombatNotification::ShieldChanged {
            current: self.current_strength,
            max: self.max_strength,
        });

        if self.current_strength <= 0.0 {
            self.current_strength = 0.0;
            self.active = false;
            debug!("{} depleted", self.shield_type.name());
            self.bus.publish(CombatNotification::ShieldDepleted);
        }

        damage - absorbed
    }

    pub fn current_strength(&self) -> f32 {
        self.current_strength
    }

    pub fn max_strength(&self) -> f32 {
        self.max_strength
    }

    pub fn fraction(&self) -> f32 {
        self.current_strength / self.max_strength
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn shield_type(&self) -> ShieldType {
        self.shield_type
    }

    /// Seconds left before recharge may begin
    pub fn recharge_timer(&self) -> f32 {
        self.recharge_timer
    }

    pub fn config(&self) -> &ShieldConfig {
        &self.config
    }

    /// Restore the configured shield at full strength
    pub fn reset(&mut self) {
        self.shield_type = self.config.shield_type;
        self.max_strength = self.config.max_strength;
        self.current_strength = self.config.max_strength;
        self.recharge_timer = 0.0;
        self.active = true;
        self.bus.publish(CombatNotification::ShieldChanged {
            current: self.current_strength,
            max: self.max_strength,
        });
    }
}

impl Tick for ShieldRegulator {
    fn update(&mut self, dt: f32) {
        if !self.active || self.current_strength >= self.max_strength {
            return;
        }
        let dt = dt.max(0.0);

        if self.recharge_timer > 0.0 {
            // Time past the end of the delay is dropped; recharge starts next tick
            self.recharge_timer = (self.recharge_timer - dt).max(0.0);
            return;
        }

        let before = self.current_strength;
        self.current_strength =
            (self.current_strength + self.config.recharge_rate * dt).min(self.max_strength);

        if self.current_strength != before {
            self.bus.publish(CombatNotification::ShieldChanged {
                current: self.current_strength,
                max: self.max_strength,
            });
        }
    }
}
