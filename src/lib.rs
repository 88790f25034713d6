//! Coin tapper: tap-resource economy engine.
//!
//! A pool of taps drains as the player taps a coin, refills on a schedule,
//! and funds upgrades that raise tap yield and pool capacity.

pub mod config;
pub mod display;
pub mod economy;
pub mod error;
pub mod input;
pub mod scheduler;
pub mod session;
pub mod time;

pub use config::{CostCurve, EconomyConfig, SchedulerConfig, TapPolicy};
pub use economy::logic::{PurchaseOutcome, TapOutcome};
pub use economy::state::{EconomySnapshot, FeedbackEvent, UpgradeKind, UpgradeLevels};
pub use economy::TapEconomy;
pub use error::{ConfigError, EconomyError, SaveError};
pub use input::InputEvent;
pub use scheduler::{RegenHandle, RegenerationScheduler};
pub use session::{EconomyUpdate, Session};
