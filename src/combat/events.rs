//! Combat events
//!
//! ECS events flowing into and out of the combat systems.

use bevy::prelude::*;

use super::bus::CombatNotification;
use super::combatant::CombatIntent;
use super::damage::DamageCategory;
use super::weapon_mode::FirePattern;

/// Event fired by collision/combat resolution when a combatant is hit
#[derive(Event, Debug, Clone)]
pub struct DamageEvent {
    /// Entity receiving the damage
    pub target: Entity,
    /// Entity dealing the damage, if known
    pub source: Option<Entity>,
    /// Raw amount before shields and resistance
    pub amount: f32,
    pub category: DamageCategory,
}

/// Event fired by input handling or AI
#[derive(Event, Debug, Clone, Copy)]
pub struct CombatIntentEvent {
    pub entity: Entity,
    pub intent: CombatIntent,
}

/// Event fired when a trigger pull produced a pattern.
/// Projectile spawning lives outside this crate and reads these.
#[derive(Event, Debug, Clone)]
pub struct ShotsFiredEvent {
    pub shooter: Entity,
    pub pattern: FirePattern,
}

/// A bus notification marshalled into the ECS, tagged with its combatant
#[derive(Event, Debug, Clone)]
pub struct CombatNotificationEvent {
    pub entity: Entity,
    pub notification: CombatNotification,
}

/// Event fired when a combatant dies
#[derive(Event, Debug, Clone, Copy)]
pub struct CombatantDeathEvent {
    /// Entity that died
    pub victim: Entity,
    /// Entity that dealt the killing blow, if known
    pub killer: Option<Entity>,
}
