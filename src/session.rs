//! Shared, serialized access to one session's economy.
//!
//! `Session` is a cheap clonable handle. Tap handlers, the regeneration
//! scheduler and the presentation layer may hold clones on different threads;
//! every operation runs to completion under one mutex.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::info;

use crate::config::{EconomyConfig, SchedulerConfig};
use crate::economy::logic::{PurchaseOutcome, TapOutcome};
use crate::economy::save;
use crate::economy::state::{EconomySnapshot, FeedbackEvent, UpgradeKind};
use crate::economy::TapEconomy;
use crate::error::{ConfigError, EconomyError, SaveError};
use crate::input::InputEvent;
use crate::scheduler::{RegenHandle, RegenerationScheduler, Signal};
use crate::time::RegenClock;

/// Sent to subscribers after every state change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EconomyUpdate {
    pub snapshot: EconomySnapshot,
    /// Feedback produced since the previous update.
    pub feedback: Vec<FeedbackEvent>,
}

struct SessionInner {
    economy: TapEconomy,
    subscribers: Vec<Sender<EconomyUpdate>>,
    /// Frame-driven regeneration for hosts that call `pump()`.
    clock: RegenClock,
    /// Delayed-start schedulers waiting for the first tap.
    activity: Vec<Sender<Signal>>,
}

impl SessionInner {
    /// Push the current snapshot to every live subscriber.
    fn broadcast(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let update = EconomyUpdate {
            snapshot: self.economy.snapshot(),
            feedback: self.economy.drain_feedback(),
        };
        self.subscribers.retain(|tx| tx.send(update.clone()).is_ok());
    }

    fn note_activity(&mut self) {
        self.clock.arm();
        for tx in self.activity.drain(..) {
            let _ = tx.send(Signal::Activity);
        }
    }
}

#[derive(Clone)]
pub struct Session {
    inner: Arc<Mutex<SessionInner>>,
}

impl Session {
    pub fn new(config: EconomyConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_economy(TapEconomy::new(config)?))
    }

    pub fn from_economy(economy: TapEconomy) -> Self {
        let clock = RegenClock::new(&economy.config().scheduler());
        info!(
            max_taps = economy.snapshot().max_taps,
            score_per_tap = economy.snapshot().score_per_tap,
            policy = ?economy.config().tap_policy,
            curve = ?economy.config().cost_curve,
            "session started"
        );
        Self {
            inner: Arc::new(Mutex::new(SessionInner {
                economy,
                subscribers: Vec::new(),
                clock,
                activity: Vec::new(),
            })),
        }
    }

    /// Operations never panic mid-mutation, so a poisoned lock still holds
    /// a consistent economy.
    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn apply_taps(&self, requested_count: u32) -> Result<TapOutcome, EconomyError> {
        let mut inner = self.lock();
        let outcome = inner.economy.apply_taps(requested_count)?;
        inner.note_activity();
        inner.broadcast();
        Ok(outcome)
    }

    pub fn tick(&self) -> u64 {
        let mut inner = self.lock();
        let available = inner.economy.tick();
        inner.broadcast();
        available
    }

    pub fn purchase_upgrade(&self, kind: UpgradeKind) -> Result<PurchaseOutcome, EconomyError> {
        let mut inner = self.lock();
        let outcome = inner.economy.purchase_upgrade(kind)?;
        inner.broadcast();
        Ok(outcome)
    }

    /// Route an inbound event to the matching operation.
    pub fn dispatch(&self, event: &InputEvent) -> Result<EconomySnapshot, EconomyError> {
        match event {
            InputEvent::Tap(count) => {
                self.apply_taps(*count)?;
            }
            InputEvent::Tick => {
                self.tick();
            }
            InputEvent::Purchase(kind) => {
                self.purchase_upgrade(*kind)?;
            }
        }
        Ok(self.snapshot())
    }

    /// Advance the frame-driven clock to `now_ms` and apply due ticks.
    pub fn pump(&self, now_ms: f64) -> u32 {
        let mut inner = self.lock();
        let ticks = inner.clock.update(now_ms);
        if ticks > 0 {
            inner.economy.tick_many(ticks);
            inner.broadcast();
        }
        ticks
    }

    pub fn snapshot(&self) -> EconomySnapshot {
        self.lock().economy.snapshot()
    }

    /// Pending feedback, for hosts that poll instead of subscribing.
    pub fn drain_feedback(&self) -> Vec<FeedbackEvent> {
        self.lock().economy.drain_feedback()
    }

    pub fn next_cost(&self, kind: UpgradeKind) -> u64 {
        self.lock().economy.next_cost(kind)
    }

    pub fn progress(&self, kind: UpgradeKind) -> f64 {
        self.lock().economy.progress(kind)
    }

    pub fn subscribe(&self) -> Receiver<EconomyUpdate> {
        let (tx, rx) = mpsc::channel();
        self.lock().subscribers.push(tx);
        rx
    }

    /// Start background regeneration. Stop it by stopping or dropping the handle.
    pub fn start_regeneration(&self, config: SchedulerConfig) -> std::io::Result<RegenHandle> {
        RegenerationScheduler::spawn(self.clone(), config)
    }

    pub(crate) fn watch_activity(&self, tx: Sender<Signal>) {
        self.lock().activity.push(tx);
    }

    pub fn save(&self) -> Result<String, SaveError> {
        save::to_json(&self.lock().economy)
    }

    pub fn restore(&self, json: &str) -> Result<(), SaveError> {
        let mut inner = self.lock();
        save::restore(&mut inner.economy, json)?;
        inner.broadcast();
        Ok(())
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with_economy<R>(&self, f: impl FnOnce(&mut TapEconomy) -> R) -> R {
        f(&mut self.lock().economy)
    }
}
