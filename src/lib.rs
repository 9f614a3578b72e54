//! Overclock - combat resource core
//!
//! Heat load, recharging shields and resistant health for a single combatant,
//! with heat-driven weapon modes and a notification bus between them and
//! whatever presents them.
//!
//! This library exposes the core modules for testing and reuse.

pub mod cli;
pub mod combat;
pub mod config;
pub mod headless;
pub mod rng;

// Re-export commonly used types
pub use combat::bus::{CombatNotification, NotificationBus, NotificationKind, SubscriptionId};
pub use combat::combatant::Combatant;
pub use combat::damage::DamageCategory;
pub use combat::log::{CombatLog, CombatLogEventType};
pub use combat::{CombatPlugin, Tick};
pub use config::{load_combatant_config, CombatantConfig, ConfigError};
pub use headless::{RunResult, ScenarioConfig};
