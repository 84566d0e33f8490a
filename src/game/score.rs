//! Scoring Engine
//!
//! Converts a finished run into points:
//!
//! ```text
//! score = 1000 * (f_walk(walk) * 0.5 + f_puzzle(puzzle) * 0.5 - f_hints(hints) * 0.5)
//! score = score * 2^-skips
//! result = max(0, round(score))
//! ```
//!
//! Every `f_*` is a clamped linear ramp. The module also ranks leaderboard
//! entries, since the server stores raw run statistics and ordering happens
//! client-side with the same formula.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::Duration;

/// Points for a perfect run.
pub const MAX_SCORE: f64 = 1000.0;

/// Clamped linear ramp between two thresholds.
///
/// Evaluates to 1 at or beyond `full_credit`, 0 at or beyond `zero_credit`
/// and interpolates in between. The thresholds may be ordered either way.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ramp {
    /// Input at which the ramp reaches 1.
    pub full_credit: f64,
    /// Input at which the ramp reaches 0.
    pub zero_credit: f64,
}

impl Ramp {
    /// Create a ramp.
    pub const fn new(full_credit: f64, zero_credit: f64) -> Self {
        Self { full_credit, zero_credit }
    }

    /// Evaluate at `x`.
    pub fn value(&self, x: f64) -> f64 {
        let t = (x - self.zero_credit) / (self.full_credit - self.zero_credit);
        t.clamp(0.0, 1.0)
    }
}

/// Weights and thresholds of the score formula.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoringConfig {
    /// Walking time ramp (seconds).
    pub walk: Ramp,
    /// Puzzle time ramp (seconds).
    pub puzzle: Ramp,
    /// Hint ramp; full value means the full hint penalty.
    pub hints: Ramp,
    /// Weight of the walking term.
    pub walk_weight: f64,
    /// Weight of the puzzle term.
    pub puzzle_weight: f64,
    /// Weight of the hint penalty.
    pub hint_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            walk: Ramp::new(900.0, 7200.0),
            puzzle: Ramp::new(120.0, 1500.0),
            hints: Ramp::new(20.0, 0.0),
            walk_weight: 0.5,
            puzzle_weight: 0.5,
            hint_weight: 0.5,
        }
    }
}

impl ScoringConfig {
    /// Score a run.
    pub fn score(&self, walking_secs: i64, puzzle_secs: i64, hints: u32, skips: u32) -> u32 {
        let raw = MAX_SCORE
            * (self.walk.value(walking_secs as f64) * self.walk_weight
                + self.puzzle.value(puzzle_secs as f64) * self.puzzle_weight
                - self.hints.value(hints as f64) * self.hint_weight);

        let penalized = raw * 2f64.powi(-(skips.min(i32::MAX as u32) as i32));

        if penalized <= 0.0 {
            0
        } else {
            penalized.round() as u32
        }
    }
}

/// Score a run with the default formula.
pub fn final_score(walking_secs: i64, puzzle_secs: i64, hints: u32, skips: u32) -> u32 {
    ScoringConfig::default().score(walking_secs, puzzle_secs, hints, skips)
}

// =============================================================================
// SCORE ENTRIES
// =============================================================================

/// Statistics of one finished run as stored on the leaderboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Player name.
    pub username: String,
    /// Opaque ordering field; the server keeps the submission timestamp here.
    pub highscore: String,
    /// Total play time in whole seconds.
    pub total_time_secs: i64,
    /// Time spent looking at puzzles in whole seconds.
    pub puzzle_time_secs: i64,
    /// Walked distance in whole meters.
    pub distance_meters: i64,
    /// Hints used.
    pub hints: u32,
    /// Puzzles skipped.
    pub skips: u32,
}

impl ScoreEntry {
    /// Time not spent on puzzles.
    pub fn walking_time_secs(&self) -> i64 {
        self.total_time_secs - self.puzzle_time_secs
    }

    /// Points for this run.
    pub fn score(&self) -> u32 {
        final_score(self.walking_time_secs(), self.puzzle_time_secs, self.hints, self.skips)
    }

    /// One-line summary as shown on the leaderboard.
    pub fn summary(&self) -> String {
        format!(
            "{} - {} Points, Walking: {} Solving: {} Hints: {} Skips: {}",
            self.username,
            self.score(),
            Duration::from_seconds(self.walking_time_secs() as f64),
            Duration::from_seconds(self.puzzle_time_secs as f64),
            self.hints,
            self.skips
        )
    }

    /// Same run statistics, ignoring the opaque `highscore` field.
    fn same_run(&self, other: &ScoreEntry) -> bool {
        self.username == other.username
            && self.total_time_secs == other.total_time_secs
            && self.puzzle_time_secs == other.puzzle_time_secs
            && self.hints == other.hints
            && self.skips == other.skips
    }
}

/// A leaderboard row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedEntry {
    /// 1-based position.
    pub rank: usize,
    /// Computed points.
    pub score: u32,
    /// The run.
    pub entry: ScoreEntry,
}

/// Sorted leaderboard with the local player's position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ranking {
    /// Rows, best first.
    pub entries: Vec<RankedEntry>,
    /// Rank of the local player's entry, if it is on the board.
    pub player_rank: Option<usize>,
}

impl Ranking {
    /// First `n` rows.
    pub fn top(&self, n: usize) -> &[RankedEntry] {
        &self.entries[..n.min(self.entries.len())]
    }
}

/// Score, sort (best first, ties keep server order) and number entries.
pub fn rank_entries(entries: Vec<ScoreEntry>, player: Option<&ScoreEntry>) -> Ranking {
    let mut scored: Vec<(u32, ScoreEntry)> =
        entries.into_iter().map(|e| (e.score(), e)).collect();
    scored.sort_by_key(|(score, _)| Reverse(*score));

    let mut player_rank = None;
    let entries: Vec<RankedEntry> = scored
        .into_iter()
        .enumerate()
        .map(|(i, (score, entry))| {
            let rank = i + 1;
            if player_rank.is_none() && player.is_some_and(|p| p.same_run(&entry)) {
                player_rank = Some(rank);
            }
            RankedEntry { rank, score, entry }
        })
        .collect();

    debug!(count = entries.len(), ?player_rank, "Ranked leaderboard");
    Ranking { entries, player_rank }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(name: &str, total: i64, puzzle: i64, hints: u32, skips: u32) -> ScoreEntry {
        ScoreEntry {
            username: name.to_string(),
            highscore: "0".to_string(),
            total_time_secs: total,
            puzzle_time_secs: puzzle,
            distance_meters: 1200,
            hints,
            skips,
        }
    }

    #[test]
    fn test_perfect_run() {
        assert_eq!(final_score(0, 0, 0, 0), 1000);
        assert_eq!(final_score(899, 119, 0, 0), 1000);
    }

    #[test]
    fn test_ramp_endpoints() {
        let walk = Ramp::new(900.0, 7200.0);
        assert_eq!(walk.value(0.0), 1.0);
        assert_eq!(walk.value(900.0), 1.0);
        assert_eq!(walk.value(7200.0), 0.0);
        assert_eq!(walk.value(10_000.0), 0.0);
        assert!((walk.value(4050.0) - 0.5).abs() < 1e-12);

        let hints = Ramp::new(20.0, 0.0);
        assert_eq!(hints.value(0.0), 0.0);
        assert!((hints.value(5.0) - 0.25).abs() < 1e-12);
        assert_eq!(hints.value(40.0), 1.0);
    }

    #[test]
    fn test_known_scores() {
        // Half walking credit, full puzzle credit
        assert_eq!(final_score(4050, 0, 0, 0), 750);
        // Ten hints cost a quarter of the maximum
        assert_eq!(final_score(0, 0, 10, 0), 750);
        // One skip halves
        assert_eq!(final_score(0, 0, 0, 1), 500);
        // Slow on everything
        assert_eq!(final_score(8000, 2000, 0, 0), 0);
        // Hint penalty exceeds remaining credit
        assert_eq!(final_score(8000, 2000, 20, 0), 0);
    }

    #[test]
    fn test_entry_score_uses_walking_time() {
        let e = entry("ada", 4050 + 100, 100, 0, 0);
        assert_eq!(e.walking_time_secs(), 4050);
        assert_eq!(e.score(), 750);
    }

    #[test]
    fn test_rank_entries_orders_best_first() {
        let slow = entry("slow", 7000, 1000, 5, 2);
        let fast = entry("fast", 600, 60, 0, 0);
        let mid = entry("mid", 3000, 300, 2, 0);

        let ranking = rank_entries(vec![slow.clone(), fast.clone(), mid.clone()], Some(&mid));

        let names: Vec<&str> = ranking.entries.iter().map(|r| r.entry.username.as_str()).collect();
        assert_eq!(names, vec!["fast", "mid", "slow"]);
        assert_eq!(ranking.entries[0].rank, 1);
        assert_eq!(ranking.entries[2].rank, 3);
        assert_eq!(ranking.player_rank, Some(2));
        assert_eq!(ranking.top(2).len(), 2);
        assert_eq!(ranking.top(10).len(), 3);
    }

    #[test]
    fn test_rank_without_player() {
        let ranking = rank_entries(vec![entry("a", 10, 5, 0, 0)], Some(&entry("b", 10, 5, 0, 0)));
        assert_eq!(ranking.player_rank, None);

        let empty = rank_entries(Vec::new(), None);
        assert!(empty.entries.is_empty());
    }

    #[test]
    fn test_summary_format() {
        let e = entry("ada", 700, 100, 1, 0);
        assert_eq!(e.summary(), "ada - 975 Points, Walking: 10:00 Solving: 1:40 Hints: 1 Skips: 0");
    }

    proptest! {
        #[test]
        fn test_score_bounded(
            walk in 0i64..20_000, puzzle in 0i64..5_000, hints in 0u32..100, skips in 0u32..20,
        ) {
            prop_assert!(final_score(walk, puzzle, hints, skips) <= 1000);
        }

        #[test]
        fn test_score_non_increasing_in_hints(
            walk in 0i64..20_000, puzzle in 0i64..5_000, hints in 0u32..100, skips in 0u32..10,
        ) {
            prop_assert!(final_score(walk, puzzle, hints + 1, skips) <= final_score(walk, puzzle, hints, skips));
        }

        #[test]
        fn test_score_non_increasing_in_skips(
            walk in 0i64..20_000, puzzle in 0i64..5_000, hints in 0u32..100, skips in 0u32..10,
        ) {
            prop_assert!(final_score(walk, puzzle, hints, skips + 1) <= final_score(walk, puzzle, hints, skips));
        }

        #[test]
        fn test_one_skip_halves(
            walk in 0i64..20_000, puzzle in 0i64..5_000, hints in 0u32..100,
        ) {
            let full = final_score(walk, puzzle, hints, 0) as f64;
            let halved = final_score(walk, puzzle, hints, 1) as f64;
            prop_assert!((halved - full / 2.0).abs() <= 1.0);
        }
    }
}
