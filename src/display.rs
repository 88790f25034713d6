//! Text rendering of economy state for the headless driver.

use std::fmt::Write;

use crate::economy::state::{EconomySnapshot, FeedbackEvent, UpgradeKind};
use crate::session::Session;

/// Format a number with commas (e.g. 1234567 → "1,234,567").
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Ten-cell progress bar, e.g. `[####------]`.
pub fn progress_bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * 10.0).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(10 - filled))
}

/// One status line for a snapshot.
pub fn status_line(snap: &EconomySnapshot) -> String {
    format!(
        "taps {}/{} | score {} | +{}/tap | yield lv{} capacity lv{}",
        format_number(snap.available_taps),
        format_number(snap.max_taps),
        format_number(snap.total_score),
        format_number(snap.score_per_tap),
        snap.upgrade_levels.yield_level,
        snap.upgrade_levels.capacity_level,
    )
}

/// Status line plus the upgrade shop.
pub fn render_status(session: &Session) -> String {
    let mut out = status_line(&session.snapshot());
    for kind in UpgradeKind::all() {
        let _ = write!(
            out,
            "\n  [{}] {:<8} {} {}",
            kind.key(),
            kind.name(),
            progress_bar(session.progress(*kind)),
            format_number(session.next_cost(*kind)),
        );
    }
    out
}

pub fn describe_feedback(event: &FeedbackEvent) -> String {
    match event {
        FeedbackEvent::PointsEarned { points, .. } => format!("+{}", format_number(*points)),
        FeedbackEvent::PurchaseCelebrated { kind, level, .. } => {
            format!("*** {} upgraded to level {} ***", kind, level)
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_format_number_commas_at_correct_positions(n in any::<u64>()) {
            let s = format_number(n);
            let stripped: String = s.chars().filter(|c| *c != ',').collect();
            prop_assert_eq!(stripped, n.to_string());
        }

        #[test]
        fn prop_format_number_groups_of_three(n in 1000u64..u64::MAX) {
            let s = format_number(n);
            for group in s.split(',').skip(1) {
                prop_assert_eq!(group.len(), 3, "got: {}", s);
            }
        }

        #[test]
        fn prop_format_number_small_values_no_comma(n in 0u64..1000) {
            prop_assert!(!format_number(n).contains(','));
        }
    }
}
