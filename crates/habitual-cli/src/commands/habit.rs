//! Habit management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use habitual_core::{Habit, HabitStore};
use std::io::{BufRead, Write};

use super::parse_date;

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,
        /// Optional description
        #[arg(long, default_value = "")]
        description: String,
        /// Colour tag as #RRGGBB (default from config)
        #[arg(long)]
        color: Option<String>,
    },
    /// List habits with their streaks
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one habit
    Show {
        /// Habit ID
        id: String,
    },
    /// Delete a habit
    Remove {
        /// Habit ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Flip completion for a date (default: today)
    Toggle {
        /// Habit ID
        id: String,
        /// Date as YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Mark today complete
    Done {
        /// Habit ID
        id: String,
    },
    /// Clear today's completion
    Undo {
        /// Habit ID
        id: String,
    },
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = HabitStore::open()?;

    match action {
        HabitAction::Add {
            name,
            description,
            color,
        } => {
            let habit = match color {
                Some(color) => store.add_with_color(&name, &description, &color)?,
                None => store.add(&name, &description)?,
            };
            println!("Habit created: {}", habit.id);
            println!("{}", serde_json::to_string_pretty(habit)?);
        }
        HabitAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(store.list())?);
            } else {
                let today = store.today();
                for habit in store.list() {
                    println!("{}", format_row(habit, today));
                }
            }
        }
        HabitAction::Show { id } => {
            let habit = store
                .get(&id)
                .ok_or_else(|| habitual_core::CoreError::not_found(&id))?;
            println!("{}", serde_json::to_string_pretty(habit)?);
        }
        HabitAction::Remove { id, yes } => {
            let Some(habit) = store.get(&id) else {
                println!("no habit with id {id}");
                return Ok(());
            };
            if !yes && !confirm(&format!("Delete habit '{}'?", habit.name))? {
                println!("cancelled");
                return Ok(());
            }
            store.remove(&id)?;
            println!("Habit removed: {id}");
        }
        HabitAction::Toggle { id, date } => {
            let date = date.unwrap_or_else(|| store.today());
            let habit = store.toggle_completion(&id, date)?;
            let state = if habit.is_completed_on(date) {
                "completed"
            } else {
                "cleared"
            };
            println!("{date} {state}; streak: {} days", habit.streak_count);
        }
        HabitAction::Done { id } => {
            let changed = store.complete_today(&id)?;
            report_today(&store, &id, changed, "already completed today");
        }
        HabitAction::Undo { id } => {
            let changed = store.uncomplete_today(&id)?;
            report_today(&store, &id, changed, "not completed today");
        }
    }
    Ok(())
}

fn report_today(store: &HabitStore, id: &str, changed: bool, unchanged_msg: &str) {
    if !changed {
        println!("{unchanged_msg}");
    }
    if let Some(habit) = store.get(id) {
        println!("Streak: {} days", habit.streak_count);
    }
}

fn format_row(habit: &Habit, today: NaiveDate) -> String {
    let mark = if habit.is_completed_on(today) { "x" } else { " " };
    let mut row = format!(
        "[{mark}] {}  {}  streak: {} days  {}",
        habit.id, habit.name, habit.streak_count, habit.color
    );
    if !habit.description.is_empty() {
        row.push_str(&format!("\n    {}", habit.description));
    }
    row
}

fn confirm(prompt: &str) -> std::io::Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use habitual_core::DEFAULT_COLOR;

    #[test]
    fn row_marks_completed_today() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let mut habit = Habit::new("Read", "20 pages", DEFAULT_COLOR, today).unwrap();
        habit.toggle(today);
        habit.streak_count = 1;

        let row = format_row(&habit, today);
        assert!(row.starts_with("[x] "));
        assert!(row.contains("streak: 1 days"));
        assert!(row.contains("\n    20 pages"));
    }

    #[test]
    fn row_without_description_is_single_line() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let habit = Habit::new("Run", "", DEFAULT_COLOR, today).unwrap();
        let row = format_row(&habit, today);
        assert!(row.starts_with("[ ] "));
        assert!(!row.contains('\n'));
    }
}
