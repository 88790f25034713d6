//! タップ経済のスナップショット保存/復元。
//!
//! ## バージョニング方針
//!
//! - `SAVE_VERSION`: 現在のスナップショット形式バージョン。フィールド追加時にインクリメントする。
//! - `MIN_COMPATIBLE_VERSION`: 読み込み可能な最小バージョン。
//!   既存フィールドの意味変更や削除など破壊的変更を行った場合のみインクリメントする。
//!
//! `MIN_COMPATIBLE_VERSION` 以上の旧スナップショットは、
//! 不足フィールドにデフォルト値を補完して読み込む。一時的なフィードバックは保存しない。

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SaveError;

use super::state::{SessionStats, UpgradeLevels};
use super::TapEconomy;

/// スナップショットのフォーマットバージョン。v2 で `stats` を追加。
const SAVE_VERSION: u32 = 2;

/// 互換性を維持できる最小バージョン。
const MIN_COMPATIBLE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    economy: EconomySave,
}

/// シリアライズ用のセーブデータ。フィードバックキューは含まない。
#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct EconomySave {
    available_taps: u64,
    max_taps: u64,
    score_per_tap: u64,
    total_score: u64,
    current_score: u64,
    upgrade_levels: UpgradeLevels,
    stats: SessionStats,
}

fn extract_save(economy: &TapEconomy) -> SaveData {
    let state = economy.state();
    SaveData {
        version: SAVE_VERSION,
        economy: EconomySave {
            available_taps: state.available_taps,
            max_taps: state.max_taps,
            score_per_tap: state.score_per_tap,
            total_score: state.total_score,
            current_score: state.current_score,
            upgrade_levels: state.upgrade_levels,
            stats: state.stats,
        },
    }
}

/// Check a snapshot against the invariants of the engine it is restored into.
fn check_save(economy: &TapEconomy, save: &EconomySave) -> Result<(), SaveError> {
    let config = economy.config();
    if save.max_taps < config.initial_max_taps {
        return Err(SaveError::Corrupt(format!(
            "max_taps {} is below the configured floor {}",
            save.max_taps, config.initial_max_taps
        )));
    }
    if save.available_taps > save.max_taps {
        return Err(SaveError::Corrupt(format!(
            "available_taps {} exceeds max_taps {}",
            save.available_taps, save.max_taps
        )));
    }
    if save.score_per_tap == 0 {
        return Err(SaveError::Corrupt("score_per_tap must be at least 1".into()));
    }
    if let Some(max) = config.max_upgrade_level {
        let levels = save.upgrade_levels;
        if levels.yield_level > max || levels.capacity_level > max {
            return Err(SaveError::Corrupt(format!(
                "upgrade levels {levels:?} exceed max level {max}"
            )));
        }
    }
    Ok(())
}

fn apply_save(economy: &mut TapEconomy, save: &EconomySave) {
    let state = &mut economy.state;
    state.available_taps = save.available_taps;
    state.max_taps = save.max_taps;
    state.score_per_tap = save.score_per_tap;
    state.total_score = save.total_score;
    state.current_score = save.current_score;
    state.upgrade_levels = save.upgrade_levels;
    state.stats = save.stats;
    state.feedback.clear();
}

/// Serialize the economy state as a versioned JSON snapshot.
pub fn to_json(economy: &TapEconomy) -> Result<String, SaveError> {
    serde_json::to_string(&extract_save(economy)).map_err(SaveError::Serialize)
}

/// Replace the economy state with a snapshot. On error the economy is untouched.
pub fn restore(economy: &mut TapEconomy, json: &str) -> Result<(), SaveError> {
    let save_data: SaveData = serde_json::from_str(json).map_err(|e| {
        warn!(error = %e, "failed to parse economy snapshot");
        SaveError::Parse(e)
    })?;

    if save_data.version < MIN_COMPATIBLE_VERSION {
        warn!(
            saved = save_data.version,
            min_compatible = MIN_COMPATIBLE_VERSION,
            "snapshot too old, ignoring"
        );
        return Err(SaveError::IncompatibleVersion {
            saved: save_data.version,
            min: MIN_COMPATIBLE_VERSION,
        });
    }

    if save_data.version < SAVE_VERSION {
        info!(
            saved = save_data.version,
            current = SAVE_VERSION,
            "migrating older snapshot"
        );
    }

    if let Err(e) = check_save(economy, &save_data.economy) {
        warn!(error = %e, "rejecting snapshot");
        return Err(e);
    }

    apply_save(economy, &save_data.economy);
    Ok(())
}
