//! Tap economy transitions: pure functions over [`EconomyState`], fully testable.
//!
//! Every function either applies its whole effect or returns an error with the
//! economy untouched.

use tracing::{debug, info};

use crate::config::{EconomyConfig, TapPolicy};
use crate::error::EconomyError;

use super::ladder::UpgradeLadder;
use super::state::{EconomySnapshot, EconomyState, FeedbackEvent, UpgradeKind};

/// Result of an accepted tap batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TapOutcome {
    pub available_taps: u64,
    pub total_score: u64,
    /// Points the presentation layer should animate.
    pub points: u64,
}

/// Result of a successful upgrade purchase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PurchaseOutcome {
    pub kind: UpgradeKind,
    pub cost_paid: u64,
    pub new_level: u32,
    pub snapshot: EconomySnapshot,
}

/// Register a tap batch of `requested_count` simultaneous contacts.
pub fn apply_taps(
    state: &mut EconomyState,
    config: &EconomyConfig,
    requested_count: u32,
) -> Result<TapOutcome, EconomyError> {
    if requested_count == 0 {
        return Err(EconomyError::InvalidInput(
            "tap batch must contain at least one contact".into(),
        ));
    }

    let debit = match config.tap_policy {
        TapPolicy::PerPress => {
            if state.score_per_tap > state.available_taps {
                return Err(EconomyError::InsufficientResource {
                    required: state.score_per_tap,
                    available: state.available_taps,
                });
            }
            state.score_per_tap
        }
        TapPolicy::PerContact => {
            if state.available_taps == 0 {
                return Err(EconomyError::InsufficientResource {
                    required: 1,
                    available: 0,
                });
            }
            (requested_count as u64).min(state.available_taps)
        }
    };

    let points = (requested_count as u64).saturating_mul(state.score_per_tap);
    state.available_taps -= debit;
    state.total_score = state.total_score.saturating_add(points);
    state.current_score = state.current_score.saturating_add(points);
    state.stats.taps_registered += requested_count as u64;
    state.push_feedback(FeedbackEvent::PointsEarned {
        points,
        contacts: requested_count,
    });

    debug!(
        contacts = requested_count,
        points,
        available = state.available_taps,
        "tap batch applied"
    );

    Ok(TapOutcome {
        available_taps: state.available_taps,
        total_score: state.total_score,
        points,
    })
}

/// One regeneration step. Returns the new pool level.
pub fn tick(state: &mut EconomyState, config: &EconomyConfig) -> u64 {
    tick_many(state, config, 1)
}

/// `ticks` regeneration steps at once, clamped to capacity.
pub fn tick_many(state: &mut EconomyState, config: &EconomyConfig, ticks: u32) -> u64 {
    if ticks == 0 {
        return state.available_taps;
    }
    if state.available_taps >= state.max_taps {
        return state.available_taps;
    }
    // Ticks past the one that fills the pool are no-ops and don't count.
    let deficit = state.max_taps - state.available_taps;
    let to_fill = deficit / config.regen_amount + u64::from(deficit % config.regen_amount != 0);
    state.stats.ticks += to_fill.min(ticks as u64);
    let gain = config.regen_amount.saturating_mul(ticks as u64);
    state.available_taps = state.available_taps.saturating_add(gain).min(state.max_taps);
    debug!(ticks, available = state.available_taps, "pool regenerated");
    state.available_taps
}

/// Try to buy the next level of `kind`.
pub fn purchase_upgrade(
    state: &mut EconomyState,
    config: &EconomyConfig,
    ladder: &UpgradeLadder,
    kind: UpgradeKind,
) -> Result<PurchaseOutcome, EconomyError> {
    let level = state.upgrade_levels.get(kind);
    if let Some(max_level) = ladder.max_level.filter(|_| ladder.is_capped(level)) {
        return Err(EconomyError::LevelCapped { kind, max_level });
    }

    let cost = ladder.cost_for(kind, level);
    if state.total_score < cost {
        return Err(EconomyError::InsufficientFunds {
            cost,
            available: state.total_score,
        });
    }

    state.total_score -= cost;
    let new_level = state.upgrade_levels.bump(kind);
    apply_upgrade_effect(state, config, kind);
    state.stats.purchases += 1;
    state.stats.score_spent = state.stats.score_spent.saturating_add(cost);
    state.push_feedback(FeedbackEvent::PurchaseCelebrated {
        kind,
        level: new_level,
        cost,
    });

    info!(%kind, level = new_level, cost, "upgrade purchased");

    Ok(PurchaseOutcome {
        kind,
        cost_paid: cost,
        new_level,
        snapshot: state.snapshot(),
    })
}

/// Apply an upgrade's effect to the economy parameters.
fn apply_upgrade_effect(state: &mut EconomyState, config: &EconomyConfig, kind: UpgradeKind) {
    match kind {
        UpgradeKind::Yield => {
            state.score_per_tap = state.score_per_tap.saturating_add(config.yield_step);
        }
        UpgradeKind::Capacity => {
            state.max_taps = state.max_taps.saturating_add(config.capacity_step);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CostCurve;

    fn scenario_config() -> EconomyConfig {
        EconomyConfig {
            initial_max_taps: 2000,
            initial_score_per_tap: 1,
            regen_amount: 1,
            ..EconomyConfig::default()
        }
    }

    fn linear_config() -> EconomyConfig {
        EconomyConfig {
            upgrade_cost_base: 1500,
            upgrade_cost_increment: 1500,
            cost_curve: CostCurve::Linear,
            ..EconomyConfig::default()
        }
    }

    #[test]
    fn five_taps_then_tick() {
        let config = scenario_config();
        let mut state = EconomyState::new(&config);
        for _ in 0..5 {
            apply_taps(&mut state, &config, 1).unwrap();
        }
        assert_eq!(state.available_taps, 1995);
        assert_eq!(state.total_score, 5);
        assert_eq!(tick(&mut state, &config), 1996);
    }

    #[test]
    fn zero_contacts_is_invalid() {
        let config = scenario_config();
        let mut state = EconomyState::new(&config);
        let before = state.clone();
        assert!(matches!(
            apply_taps(&mut state, &config, 0),
            Err(EconomyError::InvalidInput(_))
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn per_press_multi_touch_debits_once() {
        let config = scenario_config();
        let mut state = EconomyState::new(&config);
        state.score_per_tap = 3;
        let out = apply_taps(&mut state, &config, 4).unwrap();
        assert_eq!(out.points, 12);
        assert_eq!(out.available_taps, 1997);
        assert_eq!(out.total_score, 12);
        assert_eq!(state.current_score, 12);
        assert_eq!(state.stats.taps_registered, 4);
    }

    #[test]
    fn per_press_rejects_when_yield_exceeds_pool() {
        let config = scenario_config();
        let mut state = EconomyState::new(&config);
        state.score_per_tap = 5;
        state.available_taps = 4;
        state.total_score = 100;
        let before = state.clone();
        let err = apply_taps(&mut state, &config, 1).unwrap_err();
        assert_eq!(
            err,
            EconomyError::InsufficientResource {
                required: 5,
                available: 4
            }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn rejected_tap_leaves_save_untouched() {
        let config = EconomyConfig {
            initial_max_taps: 3,
            initial_score_per_tap: 5,
            ..scenario_config()
        };
        let mut economy = crate::economy::TapEconomy::new(config).unwrap();
        let saved = crate::economy::save::to_json(&economy).unwrap();
        assert!(economy.apply_taps(1).is_err());
        assert_eq!(crate::economy::save::to_json(&economy).unwrap(), saved);
    }

    #[test]
    fn per_press_exact_pool_drains_to_zero() {
        let config = scenario_config();
        let mut state = EconomyState::new(&config);
        state.score_per_tap = 2;
        state.available_taps = 2;
        let out = apply_taps(&mut state, &config, 1).unwrap();
        assert_eq!(out.available_taps, 0);
    }

    #[test]
    fn per_contact_debits_each_contact_and_clamps() {
        let config = EconomyConfig {
            tap_policy: TapPolicy::PerContact,
            ..scenario_config()
        };
        let mut state = EconomyState::new(&config);
        state.score_per_tap = 2;
        state.available_taps = 3;
        let out = apply_taps(&mut state, &config, 5).unwrap();
        assert_eq!(out.available_taps, 0);
        // Score is not reduced by the clamp.
        assert_eq!(out.points, 10);
        assert_eq!(out.total_score, 10);

        let err = apply_taps(&mut state, &config, 1).unwrap_err();
        assert!(matches!(err, EconomyError::InsufficientResource { .. }));
        assert_eq!(state.total_score, 10);
    }

    #[test]
    fn tap_queues_points_feedback() {
        let config = scenario_config();
        let mut state = EconomyState::new(&config);
        apply_taps(&mut state, &config, 3).unwrap();
        assert_eq!(
            state.feedback,
            vec![FeedbackEvent::PointsEarned {
                points: 3,
                contacts: 3
            }]
        );
    }

    #[test]
    fn tick_at_capacity_is_noop() {
        let config = scenario_config();
        let mut state = EconomyState::new(&config);
        let before = state.clone();
        assert_eq!(tick(&mut state, &config), 2000);
        assert_eq!(state, before);
    }

    #[test]
    fn tick_clamps_to_capacity() {
        let config = EconomyConfig {
            regen_amount: 10,
            ..scenario_config()
        };
        let mut state = EconomyState::new(&config);
        state.available_taps = 1995;
        assert_eq!(tick(&mut state, &config), 2000);
    }

    #[test]
    fn tick_many_matches_repeated_ticks() {
        let config = EconomyConfig {
            regen_amount: 3,
            ..scenario_config()
        };
        let mut a = EconomyState::new(&config);
        let mut b = EconomyState::new(&config);
        a.available_taps = 100;
        b.available_taps = 100;
        for _ in 0..25 {
            tick(&mut a, &config);
        }
        tick_many(&mut b, &config, 25);
        assert_eq!(a, b);
        assert_eq!(a.available_taps, 175);
        assert_eq!(a.stats.ticks, 25);
    }

    #[test]
    fn tick_many_past_capacity_counts_only_filling_ticks() {
        let config = scenario_config();
        let mut a = EconomyState::new(&config);
        let mut b = EconomyState::new(&config);
        a.available_taps = 1999;
        b.available_taps = 1999;
        for _ in 0..100 {
            tick(&mut a, &config);
        }
        tick_many(&mut b, &config, 100);
        assert_eq!(a, b);
        assert_eq!(b.stats.ticks, 1);

        let config = EconomyConfig {
            regen_amount: 3,
            ..scenario_config()
        };
        let mut c = EconomyState::new(&config);
        c.available_taps = 1993;
        tick_many(&mut c, &config, 50);
        assert_eq!(c.available_taps, 2000);
        // 1993 -> 1996 -> 1999 -> 2000
        assert_eq!(c.stats.ticks, 3);
    }

    #[test]
    fn tick_many_zero_does_nothing() {
        let config = scenario_config();
        let mut state = EconomyState::new(&config);
        state.available_taps = 10;
        let before = state.clone();
        tick_many(&mut state, &config, 0);
        assert_eq!(state, before);
    }

    #[test]
    fn purchase_insufficient_funds_then_success() {
        let config = linear_config();
        let ladder = UpgradeLadder::from_config(&config);
        let mut state = EconomyState::new(&config);
        state.total_score = 1000;
        let before = state.clone();
        let err = purchase_upgrade(&mut state, &config, &ladder, UpgradeKind::Yield).unwrap_err();
        assert_eq!(
            err,
            EconomyError::InsufficientFunds {
                cost: 1500,
                available: 1000
            }
        );
        assert_eq!(state, before);

        state.total_score = 1500;
        let out = purchase_upgrade(&mut state, &config, &ladder, UpgradeKind::Yield).unwrap();
        assert_eq!(out.cost_paid, 1500);
        assert_eq!(out.new_level, 1);
        assert_eq!(state.total_score, 0);
        assert_eq!(state.score_per_tap, 2);
        assert_eq!(state.upgrade_levels.get(UpgradeKind::Yield), 1);
        assert_eq!(state.upgrade_levels.get(UpgradeKind::Capacity), 0);
    }

    #[test]
    fn exponential_purchases_cost_1500_3000_6000() {
        let config = EconomyConfig {
            upgrade_cost_base: 1500,
            cost_curve: CostCurve::Exponential,
            ..EconomyConfig::default()
        };
        let ladder = UpgradeLadder::from_config(&config);
        let mut state = EconomyState::new(&config);
        state.total_score = 1500 + 3000 + 6000;
        let paid: Vec<u64> = (0..3)
            .map(|_| {
                purchase_upgrade(&mut state, &config, &ladder, UpgradeKind::Yield)
                    .unwrap()
                    .cost_paid
            })
            .collect();
        assert_eq!(paid, vec![1500, 3000, 6000]);
        assert_eq!(state.total_score, 0);
        assert_eq!(state.score_per_tap, 4);
        assert_eq!(state.stats.score_spent, 10_500);
    }

    #[test]
    fn capacity_upgrade_raises_max_only() {
        let config = linear_config();
        let ladder = UpgradeLadder::from_config(&config);
        let mut state = EconomyState::new(&config);
        state.total_score = 1500;
        state.available_taps = 10;
        purchase_upgrade(&mut state, &config, &ladder, UpgradeKind::Capacity).unwrap();
        assert_eq!(state.max_taps, 3000);
        assert_eq!(state.available_taps, 10);
        assert_eq!(state.score_per_tap, 1);
    }

    #[test]
    fn level_cap_checked_before_funds() {
        let config = EconomyConfig {
            max_upgrade_level: Some(1),
            ..linear_config()
        };
        let ladder = UpgradeLadder::from_config(&config);
        let mut state = EconomyState::new(&config);
        state.total_score = 1_000_000;
        purchase_upgrade(&mut state, &config, &ladder, UpgradeKind::Yield).unwrap();
        let before = state.clone();
        let err = purchase_upgrade(&mut state, &config, &ladder, UpgradeKind::Yield).unwrap_err();
        assert_eq!(
            err,
            EconomyError::LevelCapped {
                kind: UpgradeKind::Yield,
                max_level: 1
            }
        );
        assert_eq!(state, before);
        // The other track has its own level.
        assert!(purchase_upgrade(&mut state, &config, &ladder, UpgradeKind::Capacity).is_ok());
    }

    #[test]
    fn level_cap_wins_over_short_funds() {
        let config = EconomyConfig {
            max_upgrade_level: Some(1),
            ..linear_config()
        };
        let ladder = UpgradeLadder::from_config(&config);
        let mut state = EconomyState::new(&config);
        state.total_score = 1500;
        purchase_upgrade(&mut state, &config, &ladder, UpgradeKind::Yield).unwrap();
        state.total_score = 10;
        assert!(state.total_score < ladder.cost_for(UpgradeKind::Yield, 1));
        let before = state.clone();
        let err = purchase_upgrade(&mut state, &config, &ladder, UpgradeKind::Yield).unwrap_err();
        assert_eq!(
            err,
            EconomyError::LevelCapped {
                kind: UpgradeKind::Yield,
                max_level: 1
            }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn purchase_does_not_touch_current_score() {
        let config = linear_config();
        let ladder = UpgradeLadder::from_config(&config);
        let mut state = EconomyState::new(&config);
        state.total_score = 2000;
        state.current_score = 2000;
        purchase_upgrade(&mut state, &config, &ladder, UpgradeKind::Yield).unwrap();
        assert_eq!(state.current_score, 2000);
        assert_eq!(state.total_score, 500);
    }

    #[test]
    fn purchase_queues_celebration() {
        let config = linear_config();
        let ladder = UpgradeLadder::from_config(&config);
        let mut state = EconomyState::new(&config);
        state.total_score = 1500;
        purchase_upgrade(&mut state, &config, &ladder, UpgradeKind::Capacity).unwrap();
        assert_eq!(
            state.feedback.last(),
            Some(&FeedbackEvent::PurchaseCelebrated {
                kind: UpgradeKind::Capacity,
                level: 1,
                cost: 1500
            })
        );
    }
}
