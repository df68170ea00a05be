pub mod config;
pub mod habit;
pub mod stats;

/// Parse a `YYYY-MM-DD` argument.
pub fn parse_date(s: &str) -> Result<chrono::NaiveDate, String> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{s}': {e}"))
}
