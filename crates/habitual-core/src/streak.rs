//! Consecutive-day streak calculation.
//!
//! The current streak walks backward from today over the completion set:
//! each date must sit exactly one day before the previous match, starting at
//! today itself. Under [`StreakPolicy::Strict`] a habit not yet done today has
//! a streak of zero; [`StreakPolicy::Lenient`] lets the walk start at
//! yesterday instead.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How an incomplete "today" affects the current streak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakPolicy {
    /// Today must be completed for any nonzero streak.
    #[default]
    Strict,
    /// A run ending yesterday still counts while today is pending.
    Lenient,
}

impl std::str::FromStr for StreakPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(StreakPolicy::Strict),
            "lenient" => Ok(StreakPolicy::Lenient),
            other => Err(format!("unknown streak policy: {other}")),
        }
    }
}

/// Current streak under the strict policy.
pub fn current_streak(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    run_ending_at(dates, today, 0)
}

/// Current streak under the given policy.
pub fn streak_with_policy(
    dates: &BTreeSet<NaiveDate>,
    today: NaiveDate,
    policy: StreakPolicy,
) -> u32 {
    match policy {
        StreakPolicy::Strict => current_streak(dates, today),
        StreakPolicy::Lenient if dates.contains(&today) => current_streak(dates, today),
        StreakPolicy::Lenient => run_ending_at(dates, today, 1),
    }
}

/// Walk dates newest-first; count while `today - date` equals the expected
/// offset, beginning at `start_offset`.
fn run_ending_at(dates: &BTreeSet<NaiveDate>, today: NaiveDate, start_offset: i64) -> u32 {
    let mut expected = start_offset;
    let mut streak = 0;

    for date in dates.iter().rev() {
        let days_diff = (today - *date).num_days();
        if days_diff != expected {
            break;
        }
        streak += 1;
        expected += 1;
    }

    streak
}

/// Longest run of consecutive days anywhere in the history.
pub fn longest_streak(dates: &BTreeSet<NaiveDate>) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;

    for date in dates {
        run = match prev {
            Some(p) if (*date - p).num_days() == 1 => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(*date);
    }

    best
}
