//! Combatant
//!
//! Owns one heat, shield and health regulator plus a weapon, and wires them
//! together:
//! - incoming damage hits the shield first; the leftover reaches health
//! - incoming damage and every trigger pull add heat
//! - the fire pattern is chosen from the heat fraction at the moment of firing
//!
//! All three regulators publish on the bus handle the combatant was built with.

use bevy::prelude::*;

use super::bus::NotificationBus;
use super::damage::DamageCategory;
use super::health::HealthRegulator;
use super::heat::HeatRegulator;
use super::shield::ShieldRegulator;
use super::weapon_mode::{FirePattern, FirePatternProvider, WeaponVariant};
use super::Tick;
use crate::config::{CombatantConfig, ConfigError};

/// Player/AI intent signals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatIntent {
    FireRequested,
    VentRequested,
    VentReleased,
}

/// Why a trigger pull produced nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireRejection {
    Dead,
    Overloaded,
    Cooldown,
}

/// Result of applying an intent
#[derive(Debug, Clone, PartialEq)]
pub enum IntentOutcome {
    Fired(FirePattern),
    FireRejected(FireRejection),
    /// Venting request handled; false when refused (overloaded or dead)
    Venting(bool),
}

/// How an incoming hit was split between shield and health
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageOutcome {
    pub absorbed: f32,
    pub applied: f32,
    pub killed: bool,
}

/// Running totals since spawn or the last reset
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CombatStats {
    pub shots_fired: u32,
    pub projectiles_fired: u32,
    pub damage_absorbed: f32,
    pub damage_taken: f32,
    pub fire_rejections: u32,
}

/// A combatant's full resource state
#[derive(Component, Debug)]
pub struct Combatant {
    config: CombatantConfig,
    heat: HeatRegulator,
    shield: ShieldRegulator,
    health: HealthRegulator,
    fire_cooldown: f32,
    stats: CombatStats,
    bus: NotificationBus,
}

impl Combatant {
    /// Validate `config` and build every regulator on `bus`
    pub fn new(config: CombatantConfig, bus: NotificationBus) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            heat: HeatRegulator::new(config.heat.clone(), bus.clone())?,
            shield: ShieldRegulator::new(config.shield.clone(), bus.clone())?,
            health: HealthRegulator::new(config.health.clone(), bus.clone())?,
            fire_cooldown: 0.0,
            stats: CombatStats::default(),
            config,
            bus,
        })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &CombatantConfig {
        &self.config
    }

    pub fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    pub fn heat(&self) -> &HeatRegulator {
        &self.heat
    }

    pub fn heat_mut(&mut self) -> &mut HeatRegulator {
        &mut self.heat
    }

    pub fn shield(&self) -> &ShieldRegulator {
        &self.shield
    }

    pub fn shield_mut(&mut self) -> &mut ShieldRegulator {
        &mut self.shield
    }

    pub fn health(&self) -> &HealthRegulator {
        &self.health
    }

    pub fn health_mut(&mut self) -> &mut HealthRegulator {
        &mut self.health
    }

    pub fn weapon(&self) -> &WeaponVariant {
        &self.config.weapon
    }

    pub fn stats(&self) -> &CombatStats {
        &self.stats
    }

    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    /// Seconds until the weapon can fire again
    pub fn fire_cooldown(&self) -> f32 {
        self.fire_cooldown
    }

    /// Route a hit through shield then health, and heat up from it
    pub fn receive_damage(&mut self, amount: f32, category: DamageCategory) -> DamageOutcome {
        if !self.health.is_alive() {
            return DamageOutcome::default();
        }

        let leftover = self.shield.absorb_damage(amount);
        let absorbed = amount - leftover;
        let applied = self.health.take_damage(leftover, category);
        let killed = !self.health.is_alive();

        if !killed {
            self.heat.add_load(amount * self.config.heat_per_damage);
        }

        self.stats.damage_absorbed += absorbed;
        self.stats.damage_taken += applied;

        DamageOutcome {
            absorbed,
            applied,
            killed,
        }
    }

    /// Whether a trigger pull right now would produce a pattern
    pub fn can_fire(&self) -> Result<(), FireRejection> {
        if !self.health.is_alive() {
            Err(FireRejection::Dead)
        } else if self.heat.is_overloaded() {
            Err(FireRejection::Overloaded)
        } else if self.fire_cooldown > 0.0 {
            Err(FireRejection::Cooldown)
        } else {
            Ok(())
        }
    }

    /// Pull the trigger. The pattern reflects heat *before* this shot's load.
    pub fn fire(&mut self) -> Result<FirePattern, FireRejection> {
        if let Err(rejection) = self.can_fire() {
            self.stats.fire_rejections += 1;
            return Err(rejection);
        }

        let pattern = self.config.weapon.select_pattern(self.heat.load_fraction());
        self.heat.add_load(self.config.weapon.heat_per_shot);
        self.fire_cooldown = self.config.weapon.cooldown();

        self.stats.shots_fired += 1;
        self.stats.projectiles_fired += pattern.shot_count() as u32;
        Ok(pattern)
    }

    pub fn apply_intent(&mut self, intent: CombatIntent) -> IntentOutcome {
        match intent {
            CombatIntent::FireRequested => match self.fire() {
                Ok(pattern) => IntentOutcome::Fired(pattern),
                Err(rejection) => IntentOutcome::FireRejected(rejection),
            },
            CombatIntent::VentRequested => {
                IntentOutcome::Venting(self.health.is_alive() && self.heat.start_venting())
            }
            CombatIntent::VentReleased => IntentOutcome::Venting(self.heat.stop_venting()),
        }
    }

    /// Respawn: every regulator back to its configured starting state
    pub fn reset(&mut self) {
        self.heat.reset();
        self.shield.reset();
        self.health.reset();
        self.fire_cooldown = 0.0;
        self.stats = CombatStats::default();
    }
}

impl Tick for Combatant {
    fn update(&mut self, dt: f32) {
        if !self.health.is_alive() {
            return;
        }
        self.fire_cooldown = (self.fire_cooldown - dt.max(0.0)).max(0.0);
        self.heat.update(dt);
        self.shield.update(dt);
    }
}
