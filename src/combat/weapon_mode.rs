//! Heat-driven weapon modes
//!
//! The weapon changes character as it heats up: a single accurate bolt when
//! cool, a fast twin burst when warm, and a wide damaging fan when near
//! overload. Selection is a pure function of the heat fraction, recomputed on
//! every trigger pull.
//!
//! ## Default table
//! | Heat fraction | Mode      | Shots              | Speed | Damage |
//! |---------------|-----------|--------------------|-------|--------|
//! | < 0.3         | Precision | 0°                 | 1000  | 12     |
//! | 0.3 .. 0.7    | Rapid     | −4°, +4°           | 850   | 8      |
//! | >= 0.7        | Chaos     | 0°, −12°, +12°     | 700   | 15     |

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::constants::*;
use crate::config::{require_non_negative, require_positive, ConfigError};

/// Fire modes, from coolest to hottest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponMode {
    Precision,
    Rapid,
    Chaos,
}

impl WeaponMode {
    pub fn name(&self) -> &'static str {
        match self {
            WeaponMode::Precision => "Precision",
            WeaponMode::Rapid => "Rapid",
            WeaponMode::Chaos => "Chaos",
        }
    }
}

/// One projectile of a fire pattern
#[derive(Debug, Clone, PartialEq)]
pub struct ShotDescriptor {
    /// Degrees off the aim direction (negative = left)
    pub angular_offset: f32,
    pub speed: f32,
    pub damage: f32,
    /// Presentation hint for the projectile visuals
    pub visual_tag: String,
}

/// Everything one trigger pull produces
#[derive(Debug, Clone, PartialEq)]
pub struct FirePattern {
    pub mode: WeaponMode,
    pub shots: SmallVec<[ShotDescriptor; 3]>,
}

impl FirePattern {
    pub fn shot_count(&self) -> usize {
        self.shots.len()
    }

    /// Damage dealt if every shot lands
    pub fn total_damage(&self) -> f32 {
        self.shots.iter().map(|s| s.damage).sum()
    }

    /// Widest angular offset in either direction
    pub fn spread(&self) -> f32 {
        self.shots
            .iter()
            .map(|s| s.angular_offset.abs())
            .fold(0.0, f32::max)
    }
}

/// Anything that can turn a heat fraction into a fire pattern.
///
/// Implementations must be stateless: the same fraction always yields the
/// same pattern.
pub trait FirePatternProvider {
    fn select_pattern(&self, heat_fraction: f32) -> FirePattern;
}

/// Shot layout for a single mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeProfile {
    /// Angular offset of each shot, in firing order
    pub offsets: Vec<f32>,
    pub speed: f32,
    pub damage: f32,
    pub visual_tag: String,
}

impl ModeProfile {
    fn shots(&self) -> SmallVec<[ShotDescriptor; 3]> {
        self.offsets
            .iter()
            .map(|&angular_offset| ShotDescriptor {
                angular_offset,
                speed: self.speed,
                damage: self.damage,
                visual_tag: self.visual_tag.clone(),
            })
            .collect()
    }

    fn validate(&self, mode: WeaponMode) -> Result<(), ConfigError> {
        if self.offsets.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "{} mode must fire at least one shot",
                mode.name()
            )));
        }
        require_positive("weapon mode speed", self.speed)?;
        require_non_negative("weapon mode damage", self.damage)?;
        Ok(())
    }
}

/// Threshold table mapping heat fraction to a mode profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponModeSelector {
    /// Heat fraction at which Rapid replaces Precision
    pub rapid_threshold: f32,
    /// Heat fraction at which Chaos replaces Rapid
    pub chaos_threshold: f32,
    pub precision: ModeProfile,
    pub rapid: ModeProfile,
    pub chaos: ModeProfile,
}

impl Default for WeaponModeSelector {
    fn default() -> Self {
        Self {
            rapid_threshold: RAPID_THRESHOLD,
            chaos_threshold: CHAOS_THRESHOLD,
            precision: ModeProfile {
                offsets: vec![0.0],
                speed: PRECISION_SPEED,
                damage: PRECISION_DAMAGE,
                visual_tag: "precision_bolt".to_string(),
            },
            rapid: ModeProfile {
                offsets: vec![-RAPID_SPREAD_DEG, RAPID_SPREAD_DEG],
                speed: RAPID_SPEED,
                damage: RAPID_DAMAGE,
                visual_tag: "rapid_tracer".to_string(),
            },
            chaos: ModeProfile {
                offsets: vec![0.0, -CHAOS_SPREAD_DEG, CHAOS_SPREAD_DEG],
                speed: CHAOS_SPEED,
                damage: CHAOS_DAMAGE,
                visual_tag: "chaos_burst".to_string(),
            },
        }
    }
}

impl WeaponModeSelector {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = 0.0 <= self.rapid_threshold
            && self.rapid_threshold <= self.chaos_threshold
            && self.chaos_threshold <= 1.0;
        if !ordered {
            return Err(ConfigError::Invalid(format!(
                "weapon thresholds must satisfy 0 <= rapid ({}) <= chaos ({}) <= 1",
                self.rapid_threshold, self.chaos_threshold
            )));
        }
        self.precision.validate(WeaponMode::Precision)?;
        self.rapid.validate(WeaponMode::Rapid)?;
        self.chaos.validate(WeaponMode::Chaos)?;
        Ok(())
    }

    /// Which mode a heat fraction falls into. Out-of-range input is clamped;
    /// NaN counts as cold.
    pub fn mode_for(&self, heat_fraction: f32) -> WeaponMode {
        let fraction = if heat_fraction.is_nan() {
            0.0
        } else {
            heat_fraction.clamp(0.0, 1.0)
        };

        if fraction >= self.chaos_threshold {
            WeaponMode::Chaos
        } else if fraction >= self.rapid_threshold {
            WeaponMode::Rapid
        } else {
            WeaponMode::Precision
        }
    }

    pub fn profile(&self, mode: WeaponMode) -> &ModeProfile {
        match mode {
            WeaponMode::Precision => &self.precision,
            WeaponMode::Rapid => &self.rapid,
            WeaponMode::Chaos => &self.chaos,
        }
    }
}

impl FirePatternProvider for WeaponModeSelector {
    fn select_pattern(&self, heat_fraction: f32) -> FirePattern {
        let mode = self.mode_for(heat_fraction);
        FirePattern {
            mode,
            shots: self.profile(mode).shots(),
        }
    }
}

/// Pattern from the default table
pub fn select_pattern(heat_fraction: f32) -> FirePattern {
    WeaponModeSelector::default().select_pattern(heat_fraction)
}

/// A named weapon: its heat cost, trigger rate and mode table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponVariant {
    pub name: String,
    /// Heat added per trigger pull
    pub heat_per_shot: f32,
    /// Trigger pulls per second
    pub fire_rate: f32,
    #[serde(default)]
    pub modes: WeaponModeSelector,
}

impl Default for WeaponVariant {
    fn default() -> Self {
        Self {
            name: "Overclock Blaster".to_string(),
            heat_per_shot: DEFAULT_HEAT_PER_SHOT,
            fire_rate: DEFAULT_FIRE_RATE,
            modes: WeaponModeSelector::default(),
        }
    }
}

impl WeaponVariant {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("weapon.heat_per_shot", self.heat_per_shot)?;
        require_positive("weapon.fire_rate", self.fire_rate)?;
        self.modes.validate()
    }

    /// Seconds between trigger pulls
    pub fn cooldown(&self) -> f32 {
        1.0 / self.fire_rate
    }
}

impl FirePatternProvider for WeaponVariant {
    fn select_pattern(&self, heat_fraction: f32) -> FirePattern {
        self.modes.select_pattern(heat_fraction)
    }
}
