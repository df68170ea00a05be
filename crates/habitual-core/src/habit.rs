//! The habit record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::streak::{self, StreakPolicy};

/// Colour used when none is given.
pub const DEFAULT_COLOR: &str = "#4299e1";

/// A user-defined habit and its completion history.
///
/// `streak_count` is a cache of the streak computed from `completed_dates`;
/// call [`Habit::refresh_streak`] after touching the dates directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: NaiveDate,
    #[serde(default)]
    pub completed_dates: BTreeSet<NaiveDate>,
    #[serde(default)]
    pub streak_count: u32,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    DEFAULT_COLOR.into()
}

impl Habit {
    /// Create a habit with a fresh id and no completions.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] for an empty name and
    /// [`ValidationError::InvalidColor`] for a colour not in `#RRGGBB` form.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        color: impl Into<String>,
        created_at: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let color = color.into();
        validate_color(&color)?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name,
            description: description.into(),
            created_at,
            completed_dates: BTreeSet::new(),
            streak_count: 0,
            color,
        })
    }

    /// Whether the habit was marked done on `date`.
    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completed_dates.contains(&date)
    }

    /// Flip the completion state of `date`. Returns the new state.
    pub fn toggle(&mut self, date: NaiveDate) -> bool {
        if self.completed_dates.remove(&date) {
            false
        } else {
            self.completed_dates.insert(date);
            true
        }
    }

    /// Recompute the cached streak. Returns `true` if the cached value changed.
    pub fn refresh_streak(&mut self, today: NaiveDate, policy: StreakPolicy) -> bool {
        let streak = streak::streak_with_policy(&self.completed_dates, today, policy);
        let changed = streak != self.streak_count;
        self.streak_count = streak;
        changed
    }
}

/// Check a `#RRGGBB` colour tag.
pub fn validate_color(color: &str) -> Result<(), ValidationError> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidColor(color.to_string()))
    }
}

/// The example habits a first run starts with.
pub fn seed_habits(today: NaiveDate) -> Vec<Habit> {
    [
        ("Morning Meditation", "10 minutes of mindfulness", "#9F7AEA"),
        ("Read a Book", "At least 20 pages", "#F6AD55"),
        ("Exercise", "30 minutes workout", "#F56565"),
    ]
    .into_iter()
    .map(|(name, description, color)| Habit {
        id: Uuid::new_v4().to_string(),
        name: name.into(),
        description: description.into(),
        created_at: today,
        completed_dates: BTreeSet::new(),
        streak_count: 0,
        color: color.into(),
    })
    .collect()
}
