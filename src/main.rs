//! Headless driver: feeds stdin commands into a tapper session.
//!
//! ```text
//! coin-tapper [config.json]
//! > tap 3
//! > buy yield
//! > status
//! ```

use std::fs;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use coin_tapper::display::{describe_feedback, render_status, status_line};
use coin_tapper::{EconomyConfig, InputEvent, Session};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

const HELP: &str = "commands: tap [n] | tick | buy <yield|capacity> | 1 | 2 | status | save | load <file> | help | quit";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => match EconomyConfig::load(&path) {
            Ok(c) => c,
            Err(e) => {
                error!(%path, error = %e, "could not load config");
                return ExitCode::FAILURE;
            }
        },
        None => EconomyConfig::default(),
    };
    let scheduler_config = config.scheduler();

    let session = match Session::new(config) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "invalid config");
            return ExitCode::FAILURE;
        }
    };
    let regen = match session.start_regeneration(scheduler_config) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "could not start regeneration");
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", render_status(&session));
    let _ = writeln!(stdout, "{HELP}");

    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!(error = %e, "failed to read stdin");
                break;
            }
        };
        let trimmed = line.trim();
        let mut words = trimmed.split_whitespace();
        match words.next() {
            None => continue,
            Some("quit") | Some("q") => break,
            Some("help") | Some("h") => {
                let _ = writeln!(stdout, "{HELP}");
            }
            Some("status") | Some("s") => {
                let _ = writeln!(stdout, "{}", render_status(&session));
            }
            Some("save") => match session.save() {
                Ok(json) => {
                    let _ = writeln!(stdout, "{json}");
                }
                Err(e) => warn!(error = %e, "save failed"),
            },
            Some("load") => {
                let Some(path) = words.next() else {
                    let _ = writeln!(stdout, "load needs a file path");
                    continue;
                };
                match fs::read_to_string(path) {
                    Ok(json) => match session.restore(&json) {
                        Ok(()) => {
                            let _ = writeln!(stdout, "{}", status_line(&session.snapshot()));
                        }
                        Err(e) => {
                            let _ = writeln!(stdout, "{e}");
                        }
                    },
                    Err(e) => {
                        let _ = writeln!(stdout, "could not read {path}: {e}");
                    }
                }
            }
            Some(_) => {
                let event = match single_key(trimmed).and_then(InputEvent::from_key) {
                    Some(ev) => Ok(ev),
                    None => InputEvent::parse(trimmed),
                };
                match event.and_then(|ev| session.dispatch(&ev)) {
                    Ok(snap) => {
                        for fb in session.drain_feedback() {
                            let _ = writeln!(stdout, "{}", describe_feedback(&fb));
                        }
                        let _ = writeln!(stdout, "{}", status_line(&snap));
                    }
                    Err(e) => {
                        let _ = writeln!(stdout, "{e}");
                    }
                }
            }
        }
    }

    regen.stop();
    ExitCode::SUCCESS
}

/// The line's only character, if it is exactly one.
fn single_key(line: &str) -> Option<char> {
    let mut chars = line.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
