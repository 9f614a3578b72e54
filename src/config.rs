//! Data-driven combatant configuration
//!
//! Regulator and weapon tuning is loaded from `assets/config/combatant.ron`
//! rather than hardcoded, so balance changes don't require recompilation.
//!
//! ## Usage
//! ```ignore
//! let config = load_combatant_config(Path::new(DEFAULT_CONFIG_PATH))?;
//! let combatant = Combatant::new(config, NotificationBus::new())?;
//! ```

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::constants::DEFAULT_HEAT_PER_DAMAGE;
use crate::combat::health::HealthConfig;
use crate::combat::heat::HeatConfig;
use crate::combat::shield::ShieldConfig;
use crate::combat::weapon_mode::WeaponVariant;

/// Where the tuning file lives, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "assets/config/combatant.ron";

/// Rejected configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("{field} must be within [{min}, {max}), got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("{0}")]
    Invalid(String),
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

/// Reject zero, negative and non-finite values
pub(crate) fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

/// Reject negative and non-finite values
pub(crate) fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn default_heat_per_damage() -> f32 {
    DEFAULT_HEAT_PER_DAMAGE
}

/// Complete tuning for one combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantConfig {
    /// Display name used in the combat log
    pub name: String,
    #[serde(default)]
    pub heat: HeatConfig,
    #[serde(default)]
    pub shield: ShieldConfig,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub weapon: WeaponVariant,
    /// Heat added per point of incoming damage (before shields)
    #[serde(default = "default_heat_per_damage")]
    pub heat_per_damage: f32,
}

impl Default for CombatantConfig {
    fn default() -> Self {
        Self {
            name: "Player".to_string(),
            heat: HeatConfig::default(),
            shield: ShieldConfig::default(),
            health: HealthConfig::default(),
            weapon: WeaponVariant::default(),
            heat_per_damage: DEFAULT_HEAT_PER_DAMAGE,
        }
    }
}

impl CombatantConfig {
    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.heat.validate()?;
        self.shield.validate()?;
        self.health.validate()?;
        self.weapon.validate()?;
        require_non_negative("heat_per_damage", self.heat_per_damage)?;
        Ok(())
    }

    /// Parse and validate RON text. `origin` only labels errors.
    pub fn from_ron(contents: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: CombatantConfig = ron::from_str(contents).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// Load and validate a combatant tuning file
pub fn load_combatant_config(path: &Path) -> Result<CombatantConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let config = CombatantConfig::from_ron(&contents, &path.display().to_string())?;
    info!("Loaded combatant '{}' from {}", config.name, path.display());
    Ok(config)
}
