#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use trendsuite::domain::error::TrendsuiteError;
use trendsuite::domain::panel::{Panel, Series};
use trendsuite::ports::data_port::MarketDataPort;

pub struct MockMarketDataPort {
    pub panel: Panel,
    pub series: HashMap<String, Series>,
    pub errors: HashMap<String, String>,
}

impl MockMarketDataPort {
    pub fn new(panel: Panel) -> Self {
        Self {
            panel,
            series: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, name: &str, series: Series) -> Self {
        self.series.insert(name.to_string(), series);
        self
    }

    pub fn with_error(mut self, name: &str, reason: &str) -> Self {
        self.errors.insert(name.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockMarketDataPort {
    fn fetch_prices(&self, tickers: &[String]) -> Result<Panel, TrendsuiteError> {
        if let Some(reason) = self.errors.get("prices") {
            return Err(TrendsuiteError::Data {
                reason: reason.clone(),
            });
        }
        let _ = tickers;
        Ok(self.panel.clone())
    }

    fn fetch_series(&self, name: &str) -> Result<Series, TrendsuiteError> {
        if let Some(reason) = self.errors.get(name) {
            return Err(TrendsuiteError::Data {
                reason: reason.clone(),
            });
        }
        self.series
            .get(name)
            .cloned()
            .ok_or_else(|| TrendsuiteError::Data {
                reason: format!("no series named {}", name),
            })
    }

    fn list_tickers(&self) -> Result<Vec<String>, TrendsuiteError> {
        Ok(self.panel.tickers().to_vec())
    }

    fn data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TrendsuiteError> {
        if !self.panel.tickers().iter().any(|t| t == ticker) {
            return Ok(None);
        }
        match (self.panel.dates().first(), self.panel.dates().last()) {
            (Some(&first), Some(&last)) => Ok(Some((first, last, self.panel.n_rows()))),
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn dates_from(start: NaiveDate, n: usize) -> Vec<NaiveDate> {
    (0..n)
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect()
}

/// Panel from per-ticker price columns, dated daily from `start`.
pub fn make_panel(start: NaiveDate, tickers: &[&str], columns: &[Vec<f64>]) -> Panel {
    let n_rows = columns[0].len();
    let rows: Vec<Vec<f64>> = (0..n_rows)
        .map(|t| columns.iter().map(|c| c[t]).collect())
        .collect();
    Panel::new(
        dates_from(start, n_rows),
        tickers.iter().map(|s| s.to_string()).collect(),
        rows,
    )
    .unwrap()
}

pub fn flat_series(dates: &[NaiveDate], value: f64) -> Series {
    Series::new(dates.to_vec(), vec![value; dates.len()]).unwrap()
}

/// Geometric price path: `start_price * (1 + growth)^i`.
pub fn growth_column(start_price: f64, growth: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start_price * (1.0 + growth).powi(i as i32)).collect()
}

/// Price path whose daily returns alternate `r_even`, `r_odd` — useful
/// when a test needs nonzero realized volatility with a rising trend.
pub fn alternating_column(start_price: f64, r_even: f64, r_odd: f64, n: usize) -> Vec<f64> {
    let mut prices = Vec::with_capacity(n);
    let mut level = start_price;
    for i in 0..n {
        if i > 0 {
            level *= 1.0 + if i % 2 == 0 { r_even } else { r_odd };
        }
        prices.push(level);
    }
    prices
}
