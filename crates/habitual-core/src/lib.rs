//! # Habitual Core Library
//!
//! This library provides the core logic for the Habitual habit tracker.
//! All operations are available through the `habitual` CLI; any graphical
//! front-end is expected to be a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Habit**: the single entity, a named habit with a set of completion dates
//! - **Streak**: pure consecutive-day streak calculation
//! - **Storage**: a JSON document of habits plus TOML configuration
//! - **Stats**: per-habit statistics and the month calendar view
//!
//! ## Key Components
//!
//! - [`HabitStore`]: owns the habit collection and persists every mutation
//! - [`current_streak`]: the streak calculator
//! - [`Config`]: application configuration management

pub mod clock;
pub mod error;
pub mod habit;
pub mod stats;
pub mod storage;
pub mod streak;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use habit::{Habit, DEFAULT_COLOR};
pub use stats::{HabitStats, StatsSummary};
pub use storage::{Config, HabitStore};
pub use streak::{current_streak, longest_streak, streak_with_policy, StreakPolicy};
