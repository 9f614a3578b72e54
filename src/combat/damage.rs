//! Damage categories
//!
//! The closed set of damage types incoming attacks can carry. Health applies a
//! per-category resistance before subtracting hit points.

use serde::{Deserialize, Serialize};

/// Types of damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageCategory {
    Physical,
    Malware,
    DDoS,
    Phishing,
    BruteForce,
    SQLInjection,
}

impl DamageCategory {
    /// Get all damage categories
    pub fn all() -> &'static [DamageCategory] {
        &[
            DamageCategory::Physical,
            DamageCategory::Malware,
            DamageCategory::DDoS,
            DamageCategory::Phishing,
            DamageCategory::BruteForce,
            DamageCategory::SQLInjection,
        ]
    }

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            DamageCategory::Physical => "Physical",
            DamageCategory::Malware => "Malware",
            DamageCategory::DDoS => "DDoS",
            DamageCategory::Phishing => "Phishing",
            DamageCategory::BruteForce => "Brute Force",
            DamageCategory::SQLInjection => "SQL Injection",
        }
    }

    /// Parse a category from its variant or display name
    pub fn parse(name: &str) -> Result<DamageCategory, String> {
        DamageCategory::all()
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(name) || format!("{:?}", c) == name)
            .ok_or_else(|| {
                format!(
                    "Unknown damage category: '{}'. Valid categories: Physical, Malware, DDoS, Phishing, BruteForce, SQLInjection",
                    name
                )
            })
    }
}

impl Default for DamageCategory {
    fn default() -> Self {
        DamageCategory::Physical
    }
}
