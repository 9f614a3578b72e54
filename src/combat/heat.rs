//! Heat regulator
//!
//! Firing and taking hits build up heat load. Load bleeds off passively every
//! tick, faster while venting. Reaching the maximum triggers an overload: a
//! timed lockout during which further load is ignored and venting is
//! unavailable. When the lockout expires the load resets.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::bus::{CombatNotification, NotificationBus};
use super::constants::{
    DEFAULT_DISSIPATION_RATE, DEFAULT_MAX_LOAD, DEFAULT_OVERLOAD_DURATION, DEFAULT_VENTING_RATE,
};
use super::Tick;
use crate::config::{require_positive, ConfigError};

/// Tuning for a heat regulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatConfig {
    /// Load at which the regulator overloads
    pub max_load: f32,
    /// Passive load loss per second
    pub dissipation_rate: f32,
    /// Load loss per second while venting
    pub venting_rate: f32,
    /// Lockout length in seconds once overloaded
    pub overload_duration: f32,
    /// Fraction of max load left over when an overload ends (0.0 = fully cooled)
    #[serde(default)]
    pub overload_recovery_fraction: f32,
}

impl Default for HeatConfig {
    fn default() -> Self {
        Self {
            max_load: DEFAULT_MAX_LOAD,
            dissipation_rate: DEFAULT_DISSIPATION_RATE,
            venting_rate: DEFAULT_VENTING_RATE,
            overload_duration: DEFAULT_OVERLOAD_DURATION,
            overload_recovery_fraction: 0.0,
        }
    }
}

impl HeatConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("heat.max_load", self.max_load)?;
        require_positive("heat.dissipation_rate", self.dissipation_rate)?;
        require_positive("heat.venting_rate", self.venting_rate)?;
        require_positive("heat.overload_duration", self.overload_duration)?;
        if !(0.0..1.0).contains(&self.overload_recovery_fraction) {
            return Err(ConfigError::OutOfRange {
                field: "heat.overload_recovery_fraction",
                value: self.overload_recovery_fraction,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(())
    }
}

/// Heat/overload state machine for one combatant
#[derive(Debug)]
pub struct HeatRegulator {
    config: HeatConfig,
    current_load: f32,
    is_overloaded: bool,
    is_venting: bool,
    overload_timer: f32,
    bus: NotificationBus,
}

impl HeatRegulator {
    /// Build a cold regulator. Rejects non-positive max load or lockout and
    /// negative rates.
    pub fn new(config: HeatConfig, bus: NotificationBus) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            current_load: 0.0,
            is_overloaded: false,
            is_venting: false,
            overload_timer: 0.0,
            bus,
        })
    }

    /// Add heat load. Returns false (and changes nothing) while overloaded.
    pub fn add_load(&mut self, amount: f32) -> bool {
        if self.is_overloaded {
            return false;
        }

        debug_assert!(amount >= 0.0, "add_load: amount cannot be negative, got {}", amount);
        self.current_load += amount.max(0.0);

        let max = self.config.max_load;
        self.bus.publish(CombatNotification::LoadChanged {
            current: self.current_load.min(max),
            max,
        });

        if self.current_load >= max {
            self.current_load = max;
            self.is_overloaded = true;
            self.is_venting = false;
            self.overload_timer = self.config.overload_duration;
            debug!("Heat overloaded, locked out for {:.1}s", self.overload_timer);
            self.bus.publish(CombatNotification::OverloadStarted);
        }

        true
    }

    /// Switch to active venting. Refused while overloaded.
    pub fn start_venting(&mut self) -> bool {
        if self.is_overloaded {
            return false;
        }
        self.is_venting = true;
        true
    }

    /// Return to passive dissipation. Refused while overloaded.
    pub fn stop_venting(&mut self) -> bool {
        if self.is_overloaded {
            return false;
        }
        self.is_venting = false;
        true
    }

    /// Current load as a fraction of max, in [0, 1]
    pub fn load_fraction(&self) -> f32 {
        (self.current_load / self.config.max_load).clamp(0.0, 1.0)
    }

    pub fn current_load(&self) -> f32 {
        self.current_load
    }

    pub fn max_load(&self) -> f32 {
        self.config.max_load
    }

    pub fn is_overloaded(&self) -> bool {
        self.is_overloaded
    }

    pub fn is_venting(&self) -> bool {
        self.is_venting
    }

    /// Seconds of lockout remaining (0 when not overloaded)
    pub fn overload_timer(&self) -> f32 {
        self.overload_timer
    }

    pub fn config(&self) -> &HeatConfig {
        &self.config
    }

    /// Back to the freshly constructed state
    pub fn reset(&mut self) {
        self.current_load = 0.0;
        self.is_overloaded = false;
        self.is_venting = false;
        self.overload_timer = 0.0;
        self.bus.publish(CombatNotification::LoadChanged {
            current: 0.0,
            max: self.config.max_load,
        });
    }

    fn end_overload(&mut self) {
        self.overload_timer = 0.0;
        self.is_overloaded = false;
        self.current_load = self.config.max_load * self.config.overload_recovery_fraction;
        debug!("Heat overload ended, load reset to {:.1}", self.current_load);

        self.bus.publish(CombatNotification::OverloadEnded);
        self.bus.publish(CombatNotification::LoadChanged {
            current: self.current_load,
            max: self.config.max_load,
        });
    }
}

impl Tick for HeatRegulator {
    fn update(&mut self, dt: f32) {
        let dt = dt.max(0.0);

        if self.is_overloaded {
            self.overload_timer -= dt;
            if self.overload_timer <= 0.0 {
                // No dissipation in the tick that ends the lockout
                self.end_overload();
            }
            return;
        }

        if self.current_load > 0.0 {
            let rate = if self.is_venting {
                self.config.venting_rate
            } else {
                self.config.dissipation_rate
            };
            let before = self.current_load;
            self.current_load = (self.current_load - rate * dt).max(0.0);

            if self.current_load != before {
                self.bus.publish(CombatNotification::LoadChanged {
                    current: self.current_load,
                    max: self.config.max_load,
                });
            }
        }

        debug_assert!(self.overload_timer >= 0.0, "heat: overload timer went negative");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::bus::NotificationKind;
    use std::sync::{Arc, Mutex};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn regulator() -> HeatRegulator {
        HeatRegulator::new(HeatConfig::default(), NotificationBus::new()).unwrap()
    }

    fn collect(bus: &NotificationBus) -> Arc<Mutex<Vec<CombatNotification>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        bus.subscribe_all(move |n| sink.lock().unwrap().push(n.clone()));
        seen
    }

    #[test]
    fn test_add_load_accumulates_exactly() {
        let mut heat = regulator();
        assert!(heat.add_load(12.5));
        assert!(heat.add_load(7.5));
        assert_eq!(heat.current_load(), 20.0);
        assert!(!heat.is_overloaded());
    }

    #[test]
    fn test_dissipation_then_overload() {
        let mut heat = regulator();

        heat.add_load(95.0);
        heat.update(0.6);
        assert!(approx(heat.current_load(), 89.0), "got {}", heat.current_load());
        assert!(!heat.is_overloaded());

        heat.add_load(10.0);
        assert!(approx(heat.current_load(), 99.0));
        assert!(!heat.is_overloaded());

        assert!(heat.add_load(2.0));
        assert!(heat.is_overloaded());
        assert_eq!(heat.current_load(), 100.0);
        assert_eq!(heat.overload_timer(), heat.config().overload_duration);
    }

    #[test]
    fn test_add_load_refused_while_overloaded() {
        let mut heat = regulator();
        heat.add_load(150.0);
        assert!(heat.is_overloaded());
        assert_eq!(heat.current_load(), 100.0);

        assert!(!heat.add_load(5.0));
        assert_eq!(heat.current_load(), 100.0);
    }

    #[test]
    fn test_overload_ends_with_zero_load_and_no_dissipation() {
        let mut heat = regulator();
        heat.add_load(100.0);

        heat.update(2.0);
        assert!(heat.is_overloaded());
        assert_eq!(heat.current_load(), 100.0);

        heat.update(1.5);
        assert!(!heat.is_overloaded());
        assert_eq!(heat.current_load(), 0.0);
        assert_eq!(heat.overload_timer(), 0.0);
    }

    #[test]
    fn test_recovery_fraction_policy() {
        let config = HeatConfig {
            overload_recovery_fraction: 0.5,
            ..HeatConfig::default()
        };
        let mut heat = HeatRegulator::new(config, NotificationBus::new()).unwrap();
        heat.add_load(100.0);
        heat.update(10.0);
        assert!(!heat.is_overloaded());
        assert_eq!(heat.current_load(), 50.0);
    }

    #[test]
    fn test_venting_is_faster_and_blocked_by_overload() {
        let mut heat = regulator();
        heat.add_load(50.0);
        assert!(heat.start_venting());
        heat.update(1.0);
        assert!(approx(heat.current_load(), 50.0 - DEFAULT_VENTING_RATE));

        heat.add_load(100.0);
        assert!(heat.is_overloaded());
        assert!(!heat.is_venting(), "overload cancels venting");
        assert!(!heat.start_venting());
        assert!(!heat.is_venting());
    }

    #[test]
    fn test_load_floors_at_zero() {
        let mut heat = regulator();
        heat.add_load(1.0);
        heat.update(5.0);
        assert_eq!(heat.current_load(), 0.0);
        assert_eq!(heat.load_fraction(), 0.0);
    }

    #[test]
    fn test_notifications_for_overload_cycle() {
        let bus = NotificationBus::new();
        let seen = collect(&bus);
        let mut heat = HeatRegulator::new(HeatConfig::default(), bus).unwrap();

        heat.add_load(120.0);
        heat.update(5.0);

        let kinds: Vec<NotificationKind> = seen.lock().unwrap().iter().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                NotificationKind::LoadChanged,
                NotificationKind::OverloadStarted,
                NotificationKind::OverloadEnded,
                NotificationKind::LoadChanged,
            ]
        );
    }

    #[test]
    fn test_no_load_changed_when_already_cold() {
        let bus = NotificationBus::new();
        let seen = collect(&bus);
        let mut heat = HeatRegulator::new(HeatConfig::default(), bus).unwrap();

        heat.update(1.0);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad_max = HeatConfig {
            max_load: 0.0,
            ..HeatConfig::default()
        };
        assert!(HeatRegulator::new(bad_max, NotificationBus::new()).is_err());

        let bad_rate = HeatConfig {
            dissipation_rate: -1.0,
            ..HeatConfig::default()
        };
        assert!(matches!(
            HeatRegulator::new(bad_rate, NotificationBus::new()),
            Err(ConfigError::NotPositive { field: "heat.dissipation_rate", .. })
        ));

        let stalled = HeatConfig {
            venting_rate: 0.0,
            ..HeatConfig::default()
        };
        assert!(matches!(
            HeatRegulator::new(stalled, NotificationBus::new()),
            Err(ConfigError::NotPositive { field: "heat.venting_rate", .. })
        ));
    }

    #[test]
    fn test_reset_clears_overload() {
        let mut heat = regulator();
        heat.add_load(100.0);
        heat.reset();
        assert!(!heat.is_overloaded());
        assert_eq!(heat.current_load(), 0.0);
        assert!(heat.add_load(1.0));
    }
}
