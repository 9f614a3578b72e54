//! Combat system
//!
//! Implements the combat resource core:
//! - Heat load with dissipation, venting and overload lockout
//! - Recharging damage shields
//! - Health with per-category resistances
//! - Heat-driven weapon modes
//! - A notification bus decoupling all of the above from presentation
//!
//! The regulators are plain structs usable without Bevy. [`CombatPlugin`] hosts
//! them as components and advances them every frame.

use bevy::prelude::*;

pub mod bus;
pub mod combatant;
pub mod constants;
pub mod damage;
pub mod events;
pub mod health;
pub mod heat;
pub mod log;
pub mod shield;
pub mod systems;
pub mod weapon_mode;

use events::*;
use systems::*;

/// Something that advances with simulation time
pub trait Tick {
    /// Advance by `dt` seconds (negative values are treated as 0)
    fn update(&mut self, dt: f32);
}

/// Plugin for the combat system
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app
            // Combat events
            .add_event::<DamageEvent>()
            .add_event::<CombatIntentEvent>()
            .add_event::<ShotsFiredEvent>()
            .add_event::<CombatNotificationEvent>()
            .add_event::<CombatantDeathEvent>()
            // Resources
            .init_resource::<log::CombatLog>()
            .init_resource::<SimulationSpeed>()
            // Systems
            .add_systems(
                Update,
                (
                    tick_combatants,
                    apply_combat_intents,
                    resolve_damage_events,
                    forward_notifications,
                    record_combat_log,
                )
                    .chain()
                    .in_set(CombatSet),
            );
    }
}

/// System set containing every combat system, for ordering external systems
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct CombatSet;

/// Controls the speed of the combat simulation
#[derive(Resource)]
pub struct SimulationSpeed {
    /// Speed multiplier (0.0 = paused, 0.5 = half speed, 1.0 = normal, 2.0 = double)
    pub multiplier: f32,
}

impl Default for SimulationSpeed {
    fn default() -> Self {
        Self { multiplier: 1.0 }
    }
}

impl SimulationSpeed {
    pub fn pause(&mut self) {
        self.multiplier = 0.0;
    }

    pub fn normal_speed(&mut self) {
        self.multiplier = 1.0;
    }

    pub fn is_paused(&self) -> bool {
        self.multiplier == 0.0
    }
}
