//! Error types for the tap economy.
//!
//! Every variant of [`EconomyError`] is a normal, user-facing outcome: the
//! operation was rejected and the state is exactly what it was before the call.

use thiserror::Error;

use crate::economy::state::UpgradeKind;

/// Rejection reasons for engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EconomyError {
    /// The pool cannot fund the tap.
    #[error("not enough taps: need {required}, have {available}")]
    InsufficientResource { required: u64, available: u64 },

    /// Not enough score to pay for the upgrade.
    #[error("not enough points: upgrade costs {cost}, have {available}")]
    InsufficientFunds { cost: u64, available: u64 },

    /// The upgrade track is already at its configured maximum level.
    #[error("{kind} upgrade is already at max level {max_level}")]
    LevelCapped { kind: UpgradeKind, max_level: u32 },

    /// Malformed request (zero contacts, unknown upgrade kind, unknown command).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Problems loading or validating an [`EconomyConfig`](crate::config::EconomyConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Problems writing or restoring an economy snapshot.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to parse snapshot: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("snapshot version {saved} is older than the minimum compatible version {min}")]
    IncompatibleVersion { saved: u32, min: u32 },

    #[error("snapshot violates economy invariants: {0}")]
    Corrupt(String),
}
