//! Scoring module - line-clear points, level progression and drop timing
//!
//! Classic rules: a fixed base score per number of simultaneously cleared
//! lines, multiplied by `level + 1`. A level is gained every ten lines and the
//! drop period shrinks as `1000ms / (level + 1)`.

use std::time::Duration;

use crate::types::{BASE_DROP_MS, LINES_PER_LEVEL, LINE_SCORES};

/// Most lines one frozen piece can complete
pub const MAX_LINES_PER_CLEAR: usize = LINE_SCORES.len() - 1;

/// Points for clearing `lines` rows at once on `level` (0-based).
///
/// A single piece spans at most four rows, so more than four completed lines
/// means the board was corrupted. Debug builds assert; release builds score it
/// as a four-line clear.
pub fn line_score(lines: usize, level: u32) -> u32 {
    debug_assert!(
        lines <= MAX_LINES_PER_CLEAR,
        "{} lines cleared by a single piece",
        lines
    );
    let base_score = LINE_SCORES[lines.min(MAX_LINES_PER_CLEAR)];
    base_score.saturating_mul(level.saturating_add(1))
}

/// Level reached after `total_lines` cleared lines
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL
}

/// Drop-loop period for a level
pub fn drop_period(level: u32) -> Duration {
    Duration::from_micros(BASE_DROP_MS * 1000 / (level as u64 + 1))
}
