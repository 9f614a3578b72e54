//! Headless mode for scripted runs
//!
//! This module runs a single combatant through a scripted scenario without any
//! graphical output, suitable for automated testing and balance checks.
//!
//! ## Usage
//!
//! ```bash
//! # Run a headless scenario
//! cargo run --release -- --headless demos/overheat.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "name": "Overheat",
//!   "max_duration_secs": 10,
//!   "random_seed": 7,
//!   "timeline": [
//!     { "at": 0.5, "action": { "type": "HoldTrigger", "duration": 4.0 } },
//!     { "at": 6.0, "action": { "type": "VentStart" } }
//!   ],
//!   "incoming_fire": { "interval": 1.5, "min_damage": 5, "max_damage": 20 }
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::{IncomingFire, ScenarioAction, ScenarioConfig, TimelineEntry};
pub use runner::{build_headless_app, run_headless_scenario, HeadlessRunState, RunResult};
