//! Date range for filtering occurrences.

use chrono::{Duration, NaiveDate, Utc};

use crate::constants::DEFAULT_AGENDA_DAYS;

/// Date range for filtering occurrences.
/// None values mean unbounded in that direction.
#[derive(Debug, Clone)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl Default for DateRange {
    /// Default range: ±DEFAULT_AGENDA_DAYS around today
    fn default() -> Self {
        let today = Utc::now().date_naive();
        DateRange {
            from: Some(today - Duration::days(DEFAULT_AGENDA_DAYS)),
            to: Some(today + Duration::days(DEFAULT_AGENDA_DAYS)),
        }
    }
}

impl DateRange {
    /// Parse date strings into a DateRange.
    /// - `from`: "start" for unbounded, or YYYY-MM-DD
    /// - `to`: YYYY-MM-DD, defaults to +DEFAULT_AGENDA_DAYS if not specified
    pub fn from_args(from: Option<&str>, to: Option<&str>) -> Result<Self, String> {
        let today = Utc::now().date_naive();

        let from_date = match from {
            Some("start") => None, // Unbounded past
            Some(s) => Some(parse_date(s)?),
            None => Some(today - Duration::days(DEFAULT_AGENDA_DAYS)),
        };

        let to_date = match to {
            Some(s) => Some(parse_date(s)?),
            None => Some(today + Duration::days(DEFAULT_AGENDA_DAYS)),
        };

        Ok(DateRange {
            from: from_date,
            to: to_date,
        })
    }

    /// Whether `date` falls inside the range (bounds inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(from) = self.from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if date > to {
                return false;
            }
        }
        true
    }
}

/// Parse YYYY-MM-DD.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
}
