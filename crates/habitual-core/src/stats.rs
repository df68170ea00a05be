//! Per-habit statistics and the month calendar view.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::habit::Habit;
use crate::streak;

/// Statistics for a single habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitStats {
    pub habit_id: String,
    pub name: String,
    /// The cached streak, as shown next to the habit.
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completions: usize,
    /// Days from creation through today, inclusive.
    pub days_tracked: u32,
    /// Share of tracked days that were completed, in `[0, 1]`.
    pub completion_rate: f64,
}

impl HabitStats {
    pub fn for_habit(habit: &Habit, today: NaiveDate) -> Self {
        let days_tracked =
            u32::try_from(((today - habit.created_at).num_days() + 1).max(1)).unwrap_or(u32::MAX);
        let in_window = if habit.created_at <= today {
            habit.completed_dates.range(habit.created_at..=today).count()
        } else {
            0
        };
        let completion_rate = (in_window as f64 / days_tracked as f64).clamp(0.0, 1.0);

        Self {
            habit_id: habit.id.clone(),
            name: habit.name.clone(),
            current_streak: habit.streak_count,
            longest_streak: streak::longest_streak(&habit.completed_dates),
            total_completions: habit.completed_dates.len(),
            days_tracked,
            completion_rate,
        }
    }
}

/// Aggregate view across all habits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub date: NaiveDate,
    pub total_habits: usize,
    pub completed_today: usize,
    pub best_current_streak: u32,
    pub per_habit: Vec<HabitStats>,
}

pub fn summary(habits: &[Habit], today: NaiveDate) -> StatsSummary {
    StatsSummary {
        date: today,
        total_habits: habits.len(),
        completed_today: habits.iter().filter(|h| h.is_completed_on(today)).count(),
        best_current_streak: habits.iter().map(|h| h.streak_count).max().unwrap_or(0),
        per_habit: habits
            .iter()
            .map(|h| HabitStats::for_habit(h, today))
            .collect(),
    }
}

/// Names of habits completed on each day of a month, for days with at least
/// one completion. Habit order within a day follows `habits`.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidMonth`] if `year`/`month` is not a real
/// month.
pub fn month_completions(
    habits: &[Habit],
    year: i32,
    month: u32,
) -> Result<BTreeMap<NaiveDate, Vec<String>>, ValidationError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(ValidationError::InvalidMonth { year, month })?;
    let next = first
        .checked_add_months(chrono::Months::new(1))
        .ok_or(ValidationError::InvalidMonth { year, month })?;

    let mut days: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
    for habit in habits {
        for date in habit.completed_dates.range(first..next) {
            days.entry(*date).or_default().push(habit.name.clone());
        }
    }
    Ok(days)
}

/// The `(year, month)` containing `date`.
pub fn month_of(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::DEFAULT_COLOR;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn habit_with(name: &str, created: NaiveDate, done: &[NaiveDate]) -> Habit {
        let mut habit = Habit::new(name, "", DEFAULT_COLOR, created).unwrap();
        for d in done {
            habit.toggle(*d);
        }
        habit
    }

    #[test]
    fn stats_for_fresh_habit() {
        let habit = habit_with("Read", date(3, 10), &[]);
        let stats = HabitStats::for_habit(&habit, date(3, 10));
        assert_eq!(stats.days_tracked, 1);
        assert_eq!(stats.total_completions, 0);
        assert_eq!(stats.completion_rate, 0.0);
        assert_eq!(stats.longest_streak, 0);
    }

    #[test]
    fn completion_rate_counts_only_tracked_window() {
        // one completion predates creation (imported history)
        let habit = habit_with("Read", date(3, 1), &[date(2, 29), date(3, 1), date(3, 2)]);
        let stats = HabitStats::for_habit(&habit, date(3, 4));
        assert_eq!(stats.days_tracked, 4);
        assert_eq!(stats.total_completions, 3);
        assert!((stats.completion_rate - 0.5).abs() < f64::EPSILON);
        assert_eq!(stats.longest_streak, 3);
    }

    #[test]
    fn days_tracked_spans_extreme_ranges() {
        let future = habit_with("Later", date(6, 1), &[]);
        assert_eq!(HabitStats::for_habit(&future, date(5, 1)).days_tracked, 1);

        let ancient = habit_with("Old", NaiveDate::MIN, &[]);
        let stats = HabitStats::for_habit(&ancient, NaiveDate::MAX);
        let expected = (NaiveDate::MAX - NaiveDate::MIN).num_days() + 1;
        assert_eq!(i64::from(stats.days_tracked), expected);
        assert_eq!(stats.completion_rate, 0.0);
    }

    #[test]
    fn summary_counts_today() {
        let today = date(5, 20);
        let mut a = habit_with("A", date(5, 1), &[today, date(5, 19)]);
        a.refresh_streak(today, Default::default());
        let b = habit_with("B", date(5, 1), &[date(5, 19)]);

        let s = summary(&[a, b], today);
        assert_eq!(s.total_habits, 2);
        assert_eq!(s.completed_today, 1);
        assert_eq!(s.best_current_streak, 2);
        assert_eq!(s.per_habit.len(), 2);
    }

    #[test]
    fn month_completions_groups_by_day() {
        let a = habit_with("A", date(1, 1), &[date(1, 31), date(2, 1), date(2, 29)]);
        let b = habit_with("B", date(1, 1), &[date(2, 1), date(3, 1)]);

        let feb = month_completions(&[a, b], 2024, 2).unwrap();
        assert_eq!(feb.len(), 2);
        assert_eq!(feb[&date(2, 1)], vec!["A".to_string(), "B".to_string()]);
        assert_eq!(feb[&date(2, 29)], vec!["A".to_string()]);
    }

    #[test]
    fn month_completions_rejects_bad_month() {
        assert_eq!(
            month_completions(&[], 2024, 13),
            Err(ValidationError::InvalidMonth { year: 2024, month: 13 })
        );
    }

    #[test]
    fn month_of_splits_date() {
        assert_eq!(month_of(date(7, 4)), (2024, 7));
    }
}
