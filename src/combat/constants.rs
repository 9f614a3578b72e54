//! Combat Constants
//!
//! Default tuning values for the regulators and the standard weapon.
//! Everything here can be overridden from `assets/config/combatant.ron`.

// ============================================================================
// Heat
// ============================================================================

/// Heat load at which a combatant overloads
pub const DEFAULT_MAX_LOAD: f32 = 100.0;

/// Passive heat loss per second
pub const DEFAULT_DISSIPATION_RATE: f32 = 10.0;

/// Heat loss per second while actively venting
pub const DEFAULT_VENTING_RATE: f32 = 30.0;

/// Overload lockout length in seconds
pub const DEFAULT_OVERLOAD_DURATION: f32 = 3.0;

/// Heat added per point of damage received (before shields)
pub const DEFAULT_HEAT_PER_DAMAGE: f32 = 0.25;

// ============================================================================
// Shield
// ============================================================================

pub const DEFAULT_SHIELD_STRENGTH: f32 = 50.0;

/// Shield points restored per second once the recharge delay has elapsed
pub const DEFAULT_RECHARGE_RATE: f32 = 5.0;

/// Seconds after the last absorbed hit before the shield starts recharging
pub const DEFAULT_RECHARGE_DELAY: f32 = 3.0;

// ============================================================================
// Health
// ============================================================================

pub const DEFAULT_MAX_HEALTH: f32 = 100.0;

// ============================================================================
// Weapon modes
// ============================================================================

/// Below this heat fraction the weapon fires in Precision mode
pub const RAPID_THRESHOLD: f32 = 0.3;

/// At or above this heat fraction the weapon fires in Chaos mode
pub const CHAOS_THRESHOLD: f32 = 0.7;

pub const PRECISION_SPEED: f32 = 1000.0;
pub const PRECISION_DAMAGE: f32 = 12.0;

/// Rapid mode fires a pair of shots at plus and minus this angle (degrees)
pub const RAPID_SPREAD_DEG: f32 = 4.0;
pub const RAPID_SPEED: f32 = 850.0;
pub const RAPID_DAMAGE: f32 = 8.0;

/// Chaos mode fans its outer shots out to this angle (degrees)
pub const CHAOS_SPREAD_DEG: f32 = 12.0;
pub const CHAOS_SPEED: f32 = 700.0;
pub const CHAOS_DAMAGE: f32 = 15.0;

/// Heat added by each trigger pull of the standard weapon
pub const DEFAULT_HEAT_PER_SHOT: f32 = 6.0;

/// Trigger pulls per second for the standard weapon
pub const DEFAULT_FIRE_RATE: f32 = 8.0;
