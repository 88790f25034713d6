//! Background regeneration: a thread that ticks a [`Session`] at a fixed interval.
//!
//! The thread waits on a control channel with a timeout, so `stop()` (or
//! dropping the handle) interrupts it immediately rather than after the
//! current interval elapses.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::SchedulerConfig;
use crate::session::Session;

/// Messages from the session and the handle to the scheduler thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Signal {
    /// A tap was registered (starts a delayed-start scheduler).
    Activity,
    Stop,
}

enum Wait {
    Elapsed,
    Stopped,
}

pub struct RegenerationScheduler;

impl RegenerationScheduler {
    /// Start ticking `session` on a background thread.
    pub fn spawn(session: Session, config: SchedulerConfig) -> std::io::Result<RegenHandle> {
        let (tx, rx) = mpsc::channel();
        if config.start_delay.is_some() {
            session.watch_activity(tx.clone());
        }
        let join = thread::Builder::new()
            .name("regen-scheduler".into())
            .spawn(move || run(session, config, rx))?;
        info!(
            interval_ms = config.interval.as_millis() as u64,
            start_delay_ms = config.start_delay.map(|d| d.as_millis() as u64),
            "regeneration started"
        );
        Ok(RegenHandle {
            tx,
            join: Some(join),
        })
    }
}

/// Owner of a running scheduler. Dropping it stops the thread.
pub struct RegenHandle {
    tx: Sender<Signal>,
    join: Option<JoinHandle<()>>,
}

impl RegenHandle {
    /// Stop ticking and wait for the thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    pub fn is_running(&self) -> bool {
        self.join.as_ref().is_some_and(|j| !j.is_finished())
    }

    fn shutdown(&mut self) {
        if let Some(join) = self.join.take() {
            let _ = self.tx.send(Signal::Stop);
            let _ = join.join();
            info!("regeneration stopped");
        }
    }
}

impl Drop for RegenHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(session: Session, config: SchedulerConfig, rx: Receiver<Signal>) {
    if let Some(delay) = config.start_delay {
        // Idle until the first tap, then wait out the delay.
        loop {
            match rx.recv() {
                Ok(Signal::Activity) => break,
                Ok(Signal::Stop) | Err(_) => return,
            }
        }
        debug!(delay_ms = delay.as_millis() as u64, "first tap seen, delaying regeneration");
        if let Wait::Stopped = wait(&rx, delay) {
            return;
        }
    }

    loop {
        match wait(&rx, config.interval) {
            Wait::Elapsed => {
                session.tick();
            }
            Wait::Stopped => return,
        }
    }
}

/// Sleep for `duration` unless stopped first. Activity signals don't reset the wait.
fn wait(rx: &Receiver<Signal>, duration: Duration) -> Wait {
    let deadline = Instant::now() + duration;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(Signal::Activity) => continue,
            Ok(Signal::Stop) | Err(RecvTimeoutError::Disconnected) => return Wait::Stopped,
            Err(RecvTimeoutError::Timeout) => return Wait::Elapsed,
        }
    }
}
