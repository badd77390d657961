//! Trading calendar port trait.
//!
//! The engine never computes session dates itself; the next valid
//! trading session comes from this collaborator and is only displayed
//! alongside the allocation snapshot.

use crate::domain::error::TrendsuiteError;
use chrono::NaiveDate;

pub trait TradingCalendarPort {
    /// First valid trading session strictly after `after`.
    fn next_session(&self, after: NaiveDate) -> Result<NaiveDate, TrendsuiteError>;
}
