//! Session configuration, read from JSON.
//!
//! Every field is optional; missing fields fall back to [`EconomyConfig::default`].

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::economy::ladder::UpgradeLadder;
use crate::economy::state::UpgradeKind;
use crate::error::ConfigError;

/// How a tap batch is charged against the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TapPolicy {
    /// One debit of `score_per_tap` per batch, rejected when the pool can't cover it.
    #[default]
    PerPress,
    /// One unit per contact, clamped at zero; rejected only when the pool is empty.
    PerContact,
}

/// Shape of an upgrade ladder's cost progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CostCurve {
    /// `base + level * increment`
    Linear,
    /// `base * 2^level`
    #[default]
    Exponential,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub initial_max_taps: u64,
    pub initial_score_per_tap: u64,
    pub regen_interval_ms: u64,
    pub regen_amount: u64,
    /// Idle delay after the first tap before regeneration begins.
    pub regen_start_delay_ms: Option<u64>,
    pub upgrade_cost_base: u64,
    pub upgrade_cost_increment: u64,
    pub max_upgrade_level: Option<u32>,
    pub cost_curve: CostCurve,
    /// Per-track overrides of `cost_curve`.
    pub yield_curve: Option<CostCurve>,
    pub capacity_curve: Option<CostCurve>,
    pub tap_policy: TapPolicy,
    pub yield_step: u64,
    pub capacity_step: u64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            initial_max_taps: 2000,
            initial_score_per_tap: 1,
            regen_interval_ms: 1000,
            regen_amount: 1,
            regen_start_delay_ms: None,
            upgrade_cost_base: 1500,
            upgrade_cost_increment: 1500,
            max_upgrade_level: None,
            cost_curve: CostCurve::Exponential,
            yield_curve: None,
            capacity_curve: None,
            tap_policy: TapPolicy::PerPress,
            yield_step: 1,
            capacity_step: 1000,
        }
    }
}

impl EconomyConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON config string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would break the economy invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("initial_max_taps", self.initial_max_taps),
            ("initial_score_per_tap", self.initial_score_per_tap),
            ("regen_interval_ms", self.regen_interval_ms),
            ("regen_amount", self.regen_amount),
            ("upgrade_cost_base", self.upgrade_cost_base),
            ("yield_step", self.yield_step),
            ("capacity_step", self.capacity_step),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::Invalid(format!("{name} must be greater than zero")));
        }

        let uses_linear = [self.yield_curve, self.capacity_curve]
            .iter()
            .any(|c| c.unwrap_or(self.cost_curve) == CostCurve::Linear);
        if uses_linear && self.upgrade_cost_increment == 0 {
            return Err(ConfigError::Invalid(
                "upgrade_cost_increment must be greater than zero for a linear cost curve".into(),
            ));
        }

        // The last purchasable level must still be priced below the ceiling.
        if let Some(max) = self.max_upgrade_level.filter(|max| *max > 0) {
            let ladder = UpgradeLadder::from_config(self);
            let saturated = UpgradeKind::all()
                .iter()
                .find(|kind| ladder.cost_for(**kind, max - 1) == u64::MAX);
            if let Some(kind) = saturated {
                return Err(ConfigError::Invalid(format!(
                    "max_upgrade_level {max} prices the {kind} track past u64::MAX"
                )));
            }
        }
        Ok(())
    }

    pub fn scheduler(&self) -> SchedulerConfig {
        SchedulerConfig {
            interval: Duration::from_millis(self.regen_interval_ms),
            start_delay: self.regen_start_delay_ms.map(Duration::from_millis),
        }
    }
}

/// Timing for the regeneration scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub interval: Duration,
    /// When set, ticking starts only this long after the first tap.
    pub start_delay: Option<Duration>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        EconomyConfig::default().scheduler()
    }
}
