//! Inbound events, normalized from keys and text commands.
//!
//! Touch capture and gesture recognition belong to the host; by the time an
//! event reaches here a tap batch is just a contact count.

use crate::economy::state::UpgradeKind;
use crate::error::EconomyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A tap batch with this many simultaneous contacts.
    Tap(u32),
    /// One regeneration step.
    Tick,
    Purchase(UpgradeKind),
}

impl InputEvent {
    /// Parse a text command: `tap [n]`, `tick`, `buy <yield|capacity>`.
    pub fn parse(line: &str) -> Result<Self, EconomyError> {
        let mut words = line.split_whitespace();
        let command = words
            .next()
            .ok_or_else(|| EconomyError::InvalidInput("empty command".into()))?;

        let event = match command.to_ascii_lowercase().as_str() {
            "tap" | "t" => {
                let count = match words.next() {
                    Some(n) => n.parse::<u32>().map_err(|_| {
                        EconomyError::InvalidInput(format!("bad contact count '{n}'"))
                    })?,
                    None => 1,
                };
                InputEvent::Tap(count)
            }
            "tick" => InputEvent::Tick,
            "buy" | "b" => {
                let kind = words
                    .next()
                    .ok_or_else(|| EconomyError::InvalidInput("buy needs an upgrade kind".into()))?;
                InputEvent::Purchase(kind.parse()?)
            }
            other => {
                return Err(EconomyError::InvalidInput(format!("unknown command '{other}'")));
            }
        };

        if let Some(extra) = words.next() {
            return Err(EconomyError::InvalidInput(format!(
                "unexpected argument '{extra}'"
            )));
        }
        Ok(event)
    }

    /// Single-key shortcuts: `t`/space taps, `1`/`2` buy an upgrade.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            't' | ' ' => Some(InputEvent::Tap(1)),
            _ => UpgradeKind::all()
                .iter()
                .find(|k| k.key() == key)
                .map(|k| InputEvent::Purchase(*k)),
        }
    }
}
