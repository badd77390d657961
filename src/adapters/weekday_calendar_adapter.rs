//! Weekday trading calendar adapter.
//!
//! Sessions are weekdays minus an optional holiday list. Good enough for
//! daily equity panels; an exchange-grade calendar can replace this
//! behind the same port.

use crate::domain::error::TrendsuiteError;
use crate::ports::calendar_port::TradingCalendarPort;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;
use std::path::Path;

pub struct WeekdayCalendarAdapter {
    holidays: BTreeSet<NaiveDate>,
}

impl WeekdayCalendarAdapter {
    pub fn new() -> Self {
        Self {
            holidays: BTreeSet::new(),
        }
    }

    pub fn with_holidays(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Load holidays from a one-column CSV of YYYY-MM-DD dates.
    pub fn from_holiday_file(path: &Path) -> Result<Self, TrendsuiteError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(|e| TrendsuiteError::Data {
                reason: format!("failed to read {}: {}", path.display(), e),
            })?;

        let mut holidays = BTreeSet::new();
        for result in rdr.records() {
            let record = result.map_err(|e| TrendsuiteError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;
            let field = record.get(0).unwrap_or_default().trim();
            if field.is_empty() || field.eq_ignore_ascii_case("date") {
                continue;
            }
            let date =
                NaiveDate::parse_from_str(field, "%Y-%m-%d").map_err(|e| TrendsuiteError::Data {
                    reason: format!("invalid holiday date '{}': {}", field, e),
                })?;
            holidays.insert(date);
        }

        Ok(Self { holidays })
    }

    fn is_session(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
    }
}

impl Default for WeekdayCalendarAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl TradingCalendarPort for WeekdayCalendarAdapter {
    fn next_session(&self, after: NaiveDate) -> Result<NaiveDate, TrendsuiteError> {
        let mut candidate = after + chrono::Duration::days(1);
        // a full year without a session means the holiday list is junk
        for _ in 0..366 {
            if self.is_session(candidate) {
                return Ok(candidate);
            }
            candidate += chrono::Duration::days(1);
        }
        Err(TrendsuiteError::Data {
            reason: format!("no trading session within a year after {}", after),
        })
    }
}
