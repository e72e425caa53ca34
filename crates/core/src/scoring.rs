//! Scoring module - placement and combo scoring
//!
//! - Every placement earns one point per placed cell.
//! - Each completed row or column adds [`LINE_BONUS`], each completed square adds
//!   [`SQUARE_BONUS`].
//! - When anything was cleared, `(cells + bonus)` is multiplied by
//!   `max(1, 1 + 0.2 * clears)` and rounded half up.
//! - When nothing was cleared the placed cell count is the whole delta; no
//!   multiplier is applied.
//!
//! The multiplier is kept as an integer percentage so no floating point is
//! involved.

use crate::types::{
    ClearCounts, COMBO_STEP_DENOMINATOR, COMBO_STEP_NUMERATOR, LINE_BONUS, SQUARE_BONUS,
};

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScoreResult {
    /// Points for the placed cells
    pub base: u32,
    /// Line and square bonus before the multiplier
    pub clear_bonus: u32,
    /// Combo multiplier in percent (100 = x1.0). 100 when nothing was cleared.
    pub multiplier_percent: u32,
    pub total: u32,
}

/// Bonus for completed structures, before the combo multiplier
pub fn calculate_clear_bonus(counts: ClearCounts) -> u32 {
    (counts.rows + counts.cols)
        .saturating_mul(LINE_BONUS)
        .saturating_add(counts.squares.saturating_mul(SQUARE_BONUS))
}

/// Combo multiplier for `clears` simultaneous clears, in percent
///
/// `max(100, 100 + 100 * clears * NUMERATOR / DENOMINATOR)`
pub fn combo_multiplier_percent(clears: u32) -> u32 {
    let step = 100 * COMBO_STEP_NUMERATOR / COMBO_STEP_DENOMINATOR;
    100u32.saturating_add(clears.saturating_mul(step)).max(100)
}

/// Multiply by a percentage, rounding half up
pub fn apply_multiplier(points: u32, percent: u32) -> u32 {
    let scaled = points as u64 * percent as u64 + 50;
    (scaled / 100).min(u32::MAX as u64) as u32
}

/// Score one placement
pub fn calculate_score(cells_placed: u32, counts: ClearCounts) -> ScoreResult {
    if counts.is_empty() {
        return ScoreResult {
            base: cells_placed,
            clear_bonus: 0,
            multiplier_percent: 100,
            total: cells_placed,
        };
    }

    let clear_bonus = calculate_clear_bonus(counts);
    let multiplier_percent = combo_multiplier_percent(counts.total());
    let total = apply_multiplier(cells_placed.saturating_add(clear_bonus), multiplier_percent);

    ScoreResult {
        base: cells_placed,
        clear_bonus,
        multiplier_percent,
        total,
    }
}
