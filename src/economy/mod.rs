//! Tap economy engine: a depleting, regenerating tap pool funding an upgrade ladder.

pub mod ladder;
pub mod logic;
pub mod save;
pub mod state;

mod simulator;

use std::mem;

use crate::config::EconomyConfig;
use crate::error::{ConfigError, EconomyError};

use ladder::UpgradeLadder;
use logic::{PurchaseOutcome, TapOutcome};
use state::{EconomySnapshot, EconomyState, FeedbackEvent, UpgradeKind};

/// One session's engine: configuration plus the state it exclusively owns.
#[derive(Clone, Debug)]
pub struct TapEconomy {
    config: EconomyConfig,
    ladder: UpgradeLadder,
    pub(crate) state: EconomyState,
}

impl TapEconomy {
    pub fn new(config: EconomyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let ladder = UpgradeLadder::from_config(&config);
        let state = EconomyState::new(&config);
        Ok(Self {
            config,
            ladder,
            state,
        })
    }

    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    pub fn ladder(&self) -> &UpgradeLadder {
        &self.ladder
    }

    pub fn state(&self) -> &EconomyState {
        &self.state
    }

    pub fn apply_taps(&mut self, requested_count: u32) -> Result<TapOutcome, EconomyError> {
        logic::apply_taps(&mut self.state, &self.config, requested_count)
    }

    pub fn tick(&mut self) -> u64 {
        logic::tick(&mut self.state, &self.config)
    }

    pub fn tick_many(&mut self, ticks: u32) -> u64 {
        logic::tick_many(&mut self.state, &self.config, ticks)
    }

    pub fn purchase_upgrade(&mut self, kind: UpgradeKind) -> Result<PurchaseOutcome, EconomyError> {
        logic::purchase_upgrade(&mut self.state, &self.config, &self.ladder, kind)
    }

    pub fn snapshot(&self) -> EconomySnapshot {
        self.state.snapshot()
    }

    /// Take all pending feedback events, oldest first.
    pub fn drain_feedback(&mut self) -> Vec<FeedbackEvent> {
        mem::take(&mut self.state.feedback)
    }

    /// Price of the next level on `kind`'s track.
    pub fn next_cost(&self, kind: UpgradeKind) -> u64 {
        self.ladder.cost_for(kind, self.state.upgrade_levels.get(kind))
    }

    /// Progress toward affording the next level of `kind`, in `[0, 1]`.
    pub fn progress(&self, kind: UpgradeKind) -> f64 {
        self.ladder.progress_fraction(
            kind,
            self.state.upgrade_levels.get(kind),
            self.state.total_score,
        )
    }

    pub fn is_capped(&self, kind: UpgradeKind) -> bool {
        self.ladder.is_capped(self.state.upgrade_levels.get(kind))
    }
}
