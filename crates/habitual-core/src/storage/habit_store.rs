//! JSON-file habit storage.
//!
//! The whole collection lives in memory and every mutation rewrites the
//! document in full. Writes go to a sibling temp file that is renamed over
//! the target, so a crash mid-write leaves the previous document intact.
//! If a write fails the in-memory collection is restored to its state before
//! the mutation.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{CoreError, Result, ValidationError};
use crate::habit::{self, Habit, DEFAULT_COLOR};
use crate::storage::Config;
use crate::streak::StreakPolicy;

/// Owns the habit collection and its backing document.
pub struct HabitStore {
    path: PathBuf,
    habits: Vec<Habit>,
    clock: Box<dyn Clock + Send + Sync>,
    policy: StreakPolicy,
    default_color: String,
}

impl HabitStore {
    /// Open the store at the configured location and load it.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or the data
    /// directory cannot be created. A missing or malformed habits document is
    /// not an error.
    pub fn open() -> Result<Self> {
        let config = Config::load()?;
        let mut store = Self::from_config(&config, SystemClock)?;
        store.load();
        Ok(store)
    }

    /// Build an unloaded store from a configuration.
    pub fn from_config(config: &Config, clock: impl Clock + Send + Sync + 'static) -> Result<Self> {
        let mut store = Self::with_path(config.habits_path()?, clock);
        store.policy = config.streak.policy;
        store.default_color = config.habits.default_color.clone();
        Ok(store)
    }

    /// Build an unloaded store over an explicit document path.
    pub fn with_path(path: impl Into<PathBuf>, clock: impl Clock + Send + Sync + 'static) -> Self {
        Self {
            path: path.into(),
            habits: Vec::new(),
            clock: Box::new(clock),
            policy: StreakPolicy::default(),
            default_color: DEFAULT_COLOR.to_string(),
        }
    }

    /// Use a different streak policy for subsequent recomputation.
    pub fn with_policy(mut self, policy: StreakPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The clock's current date.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Replace the in-memory collection with the persisted document.
    ///
    /// A missing, unreadable or malformed document seeds the example habits
    /// instead; nothing is written until the next mutation. Cached streaks are
    /// recomputed against today.
    pub fn load(&mut self) {
        let today = self.today();

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no habits file, seeding examples");
                self.habits = habit::seed_habits(today);
                return;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read habits file, seeding examples");
                self.habits = habit::seed_habits(today);
                return;
            }
        };

        match serde_json::from_str::<Vec<Habit>>(&content) {
            Ok(mut habits) => {
                for habit in &mut habits {
                    let cached = habit.streak_count;
                    if habit.refresh_streak(today, self.policy) {
                        debug!(
                            id = %habit.id,
                            cached,
                            actual = habit.streak_count,
                            "stale streak replaced on load"
                        );
                    }
                }
                debug!(path = %self.path.display(), count = habits.len(), "loaded habits");
                self.habits = habits;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "malformed habits file, seeding examples");
                self.habits = habit::seed_habits(today);
            }
        }
    }

    /// Overwrite the document with the full collection.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if the document cannot be written.
    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.habits)?;
        let storage_err = |source: std::io::Error| CoreError::Storage {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(storage_err)?;
        }

        let tmp = self.temp_path();
        std::fs::write(&tmp, content).map_err(storage_err)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(storage_err(e));
        }

        debug!(path = %self.path.display(), count = self.habits.len(), "saved habits");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "habits.json".to_string());
        self.path.with_file_name(format!(".{name}.tmp"))
    }

    /// Persist, restoring `snapshot` if the write fails.
    fn commit(&mut self, snapshot: Vec<Habit>) -> Result<()> {
        if let Err(e) = self.save() {
            warn!(error = %e, "save failed, rolling back in-memory change");
            self.habits = snapshot;
            return Err(e);
        }
        Ok(())
    }

    /// All habits in insertion order.
    pub fn list(&self) -> &[Habit] {
        &self.habits
    }

    /// Look up a habit by id.
    pub fn get(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.habits
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| CoreError::not_found(id))
    }

    /// Add a habit with the configured default colour.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] for an empty name, or a storage
    /// error if persisting fails. The store is unchanged on error.
    pub fn add(&mut self, name: &str, description: &str) -> Result<&Habit> {
        let color = self.default_color.clone();
        self.add_with_color(name, description, &color)
    }

    /// Add a habit with an explicit `#RRGGBB` colour.
    ///
    /// # Errors
    ///
    /// As [`HabitStore::add`], plus [`ValidationError::InvalidColor`].
    pub fn add_with_color(&mut self, name: &str, description: &str, color: &str) -> Result<&Habit> {
        let habit = Habit::new(name, description, color, self.today())?;
        let snapshot = self.habits.clone();

        info!(id = %habit.id, name = %habit.name, "adding habit");
        self.habits.push(habit);
        self.commit(snapshot)?;

        Ok(&self.habits[self.habits.len() - 1])
    }

    /// Remove a habit. An unknown id is a no-op. The document is rewritten
    /// either way.
    ///
    /// Returns whether a habit was removed.
    ///
    /// # Errors
    ///
    /// Returns a storage error if persisting fails.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let snapshot = self.habits.clone();
        self.habits.retain(|h| h.id != id);
        let removed = self.habits.len() != snapshot.len();

        if removed {
            info!(id, "removed habit");
        } else {
            debug!(id, "remove: no such habit");
        }
        self.commit(snapshot)?;
        Ok(removed)
    }

    /// Flip the completion state of `date` and recompute the streak.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] for an unknown id,
    /// [`ValidationError::FutureDate`] for a date after today, or a storage
    /// error if persisting fails. Nothing changes on error.
    pub fn toggle_completion(&mut self, id: &str, date: NaiveDate) -> Result<&Habit> {
        let idx = self.position(id)?;
        let today = self.today();
        if date > today {
            return Err(ValidationError::FutureDate { date, today }.into());
        }

        let snapshot = self.habits.clone();
        let policy = self.policy;
        let habit = &mut self.habits[idx];
        let done = habit.toggle(date);
        habit.refresh_streak(today, policy);
        info!(id, %date, done, streak = habit.streak_count, "toggled completion");

        self.commit(snapshot)?;
        Ok(&self.habits[idx])
    }

    /// Mark today done. Returns `false` if it already was.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] or a storage error.
    pub fn complete_today(&mut self, id: &str) -> Result<bool> {
        self.set_today(id, true)
    }

    /// Clear today's completion. Returns `false` if it was not set.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] or a storage error.
    pub fn uncomplete_today(&mut self, id: &str) -> Result<bool> {
        self.set_today(id, false)
    }

    fn set_today(&mut self, id: &str, done: bool) -> Result<bool> {
        let idx = self.position(id)?;
        let today = self.today();
        if self.habits[idx].is_completed_on(today) == done {
            return Ok(false);
        }
        self.toggle_completion(id, today)?;
        Ok(true)
    }

    /// Recompute every cached streak against today, persisting if any changed.
    ///
    /// [`HabitStore::load`] already recomputes, so this only matters for a
    /// store kept open across midnight.
    ///
    /// # Errors
    ///
    /// Returns a storage error if persisting fails.
    pub fn refresh_streaks(&mut self) -> Result<bool> {
        let today = self.today();
        let policy = self.policy;
        let snapshot = self.habits.clone();

        let mut changed = false;
        for habit in &mut self.habits {
            changed |= habit.refresh_streak(today, policy);
        }
        if changed {
            self.commit(snapshot)?;
        }
        Ok(changed)
    }
}
