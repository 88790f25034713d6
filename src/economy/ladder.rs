//! Upgrade ladder: cost and affordability for each upgrade track.
//!
//! `level` is always the track's *current* level, so `cost_for(kind, level)`
//! is the price of reaching `level + 1`.

use crate::config::{CostCurve, EconomyConfig};

use super::state::UpgradeKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpgradeLadder {
    pub base: u64,
    pub increment: u64,
    pub max_level: Option<u32>,
    yield_curve: CostCurve,
    capacity_curve: CostCurve,
}

impl UpgradeLadder {
    pub fn from_config(config: &EconomyConfig) -> Self {
        Self {
            base: config.upgrade_cost_base,
            increment: config.upgrade_cost_increment,
            max_level: config.max_upgrade_level,
            yield_curve: config.yield_curve.unwrap_or(config.cost_curve),
            capacity_curve: config.capacity_curve.unwrap_or(config.cost_curve),
        }
    }

    pub fn curve(&self, kind: UpgradeKind) -> CostCurve {
        match kind {
            UpgradeKind::Yield => self.yield_curve,
            UpgradeKind::Capacity => self.capacity_curve,
        }
    }

    /// Price of the next level on `kind`'s track.
    ///
    /// Saturates at `u64::MAX` and stops increasing from there. An exponential
    /// track saturates at the first level where `base * 2^level` overflows
    /// (level 54 for a base of 1500). `EconomyConfig::validate` rejects level
    /// caps that would let a purchase reach that point.
    pub fn cost_for(&self, kind: UpgradeKind, level: u32) -> u64 {
        match self.curve(kind) {
            CostCurve::Linear => self
                .base
                .saturating_add((level as u64).saturating_mul(self.increment)),
            CostCurve::Exponential => match 2u64.checked_pow(level) {
                Some(factor) => self.base.saturating_mul(factor),
                None => u64::MAX,
            },
        }
    }

    /// How close `total_score` is to affording the next level, in `[0, 1]`.
    pub fn progress_fraction(&self, kind: UpgradeKind, level: u32, total_score: u64) -> f64 {
        let cost = self.cost_for(kind, level);
        if cost == 0 {
            return 1.0;
        }
        (total_score as f64 / cost as f64).min(1.0)
    }

    pub fn is_capped(&self, level: u32) -> bool {
        self.max_level.is_some_and(|max| level >= max)
    }
}
