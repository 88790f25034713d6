//! Tap economy state definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::EconomyConfig;
use crate::error::EconomyError;

/// Maximum pending feedback events; older ones are dropped first.
pub const MAX_PENDING_FEEDBACK: usize = 20;

/// Purchasable upgrade tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKind {
    /// Raises score per tap.
    Yield,
    /// Raises pool capacity.
    Capacity,
}

impl UpgradeKind {
    /// All upgrade kinds in display order.
    pub fn all() -> &'static [UpgradeKind] {
        &[UpgradeKind::Yield, UpgradeKind::Capacity]
    }

    pub fn name(&self) -> &'static str {
        match self {
            UpgradeKind::Yield => "yield",
            UpgradeKind::Capacity => "capacity",
        }
    }

    /// Key to buy (1-2 mapped to track index).
    pub fn key(&self) -> char {
        match self {
            UpgradeKind::Yield => '1',
            UpgradeKind::Capacity => '2',
        }
    }

    pub fn index(&self) -> usize {
        match self {
            UpgradeKind::Yield => 0,
            UpgradeKind::Capacity => 1,
        }
    }
}

impl fmt::Display for UpgradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UpgradeKind {
    type Err = EconomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yield" | "y" => Ok(UpgradeKind::Yield),
            "capacity" | "c" => Ok(UpgradeKind::Capacity),
            other => Err(EconomyError::InvalidInput(format!(
                "unknown upgrade kind '{other}'"
            ))),
        }
    }
}

/// Independent level counters per upgrade track.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeLevels {
    #[serde(rename = "yield")]
    pub yield_level: u32,
    #[serde(rename = "capacity")]
    pub capacity_level: u32,
}

impl UpgradeLevels {
    pub fn get(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::Yield => self.yield_level,
            UpgradeKind::Capacity => self.capacity_level,
        }
    }

    fn get_mut(&mut self, kind: UpgradeKind) -> &mut u32 {
        match kind {
            UpgradeKind::Yield => &mut self.yield_level,
            UpgradeKind::Capacity => &mut self.capacity_level,
        }
    }

    /// Raise a track by one level, returning the new level.
    pub fn bump(&mut self, kind: UpgradeKind) -> u32 {
        let level = self.get_mut(kind);
        *level += 1;
        *level
    }
}

/// Counters kept for the stats screen. Not part of the economy itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionStats {
    /// Contacts in accepted tap batches.
    pub taps_registered: u64,
    /// Regeneration ticks that raised the pool.
    pub ticks: u64,
    pub purchases: u32,
    pub score_spent: u64,
}

/// Transient event for the presentation layer (floating "+N", purchase burst).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FeedbackEvent {
    PointsEarned { points: u64, contacts: u32 },
    PurchaseCelebrated { kind: UpgradeKind, level: u32, cost: u64 },
}

/// Read-only view handed to observers after every operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomySnapshot {
    pub available_taps: u64,
    pub max_taps: u64,
    pub score_per_tap: u64,
    pub total_score: u64,
    pub current_score: u64,
    pub upgrade_levels: UpgradeLevels,
}

/// Full mutable state of one tapper session.
#[derive(Clone, Debug, PartialEq)]
pub struct EconomyState {
    /// Current pool level.
    pub available_taps: u64,
    /// Pool capacity; only the capacity upgrade raises it.
    pub max_taps: u64,
    /// Score per funded tap; only the yield upgrade raises it.
    pub score_per_tap: u64,
    /// Spendable score.
    pub total_score: u64,
    /// Session counter mirroring score gains (display only, never spent).
    pub current_score: u64,
    pub upgrade_levels: UpgradeLevels,
    pub stats: SessionStats,
    /// Pending feedback for the presentation layer.
    pub feedback: Vec<FeedbackEvent>,
}

impl EconomyState {
    /// Fresh session: full pool, no score, no upgrades.
    pub fn new(config: &EconomyConfig) -> Self {
        Self {
            available_taps: config.initial_max_taps,
            max_taps: config.initial_max_taps,
            score_per_tap: config.initial_score_per_tap,
            total_score: 0,
            current_score: 0,
            upgrade_levels: UpgradeLevels::default(),
            stats: SessionStats::default(),
            feedback: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> EconomySnapshot {
        EconomySnapshot {
            available_taps: self.available_taps,
            max_taps: self.max_taps,
            score_per_tap: self.score_per_tap,
            total_score: self.total_score,
            current_score: self.current_score,
            upgrade_levels: self.upgrade_levels,
        }
    }

    pub fn push_feedback(&mut self, event: FeedbackEvent) {
        self.feedback.push(event);
        if self.feedback.len() > MAX_PENDING_FEEDBACK {
            self.feedback.remove(0);
        }
    }
}
