//! Market data access port trait.
//!
//! Retrieval from external providers happens strictly behind this port;
//! the engine only sees fully materialized, gap-free panels and series.

use crate::domain::error::TrendsuiteError;
use crate::domain::panel::{Panel, Series};
use chrono::NaiveDate;

pub trait MarketDataPort {
    /// Wide price panel: one column per ticker, gap-filled, ascending
    /// unique dates.
    fn fetch_prices(&self, tickers: &[String]) -> Result<Panel, TrendsuiteError>;

    /// A single named series (benchmark or risk-free rate).
    fn fetch_series(&self, name: &str) -> Result<Series, TrendsuiteError>;

    fn list_tickers(&self) -> Result<Vec<String>, TrendsuiteError>;

    fn data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TrendsuiteError>;
}
