use clap::Subcommand;
use habitual_core::{stats, HabitStore};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Streaks and completion rates for all habits
    Summary,
    /// Completions per day for a month (default: current month)
    Calendar {
        #[arg(long, requires = "month")]
        year: Option<i32>,
        #[arg(long, requires = "year")]
        month: Option<u32>,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = HabitStore::open()?;
    let today = store.today();

    match action {
        StatsAction::Summary => {
            let summary = stats::summary(store.list(), today);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        StatsAction::Calendar { year, month } => {
            let (year, month) = match (year, month) {
                (Some(y), Some(m)) => (y, m),
                _ => stats::month_of(today),
            };
            let days = stats::month_completions(store.list(), year, month)?;
            println!("{}", serde_json::to_string_pretty(&days)?);
        }
    }
    Ok(())
}
