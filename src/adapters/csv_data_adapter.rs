//! CSV file market data adapter.
//!
//! Prices live in one wide CSV (`date` column plus one column per
//! ticker); benchmark and risk-free rates are two-column `date,value`
//! files. The adapter owns the gap-filling obligation: interior gaps are
//! forward-filled and leading rows are dropped until every requested
//! ticker has traded, so the engine always receives a gap-free panel.

use crate::domain::error::TrendsuiteError;
use crate::domain::panel::{Panel, Series};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::PathBuf;

pub struct CsvDataAdapter {
    prices_path: PathBuf,
    series_paths: HashMap<String, PathBuf>,
}

impl CsvDataAdapter {
    pub fn new(prices_path: PathBuf) -> Self {
        Self {
            prices_path,
            series_paths: HashMap::new(),
        }
    }

    pub fn with_series(mut self, name: &str, path: PathBuf) -> Self {
        self.series_paths.insert(name.to_string(), path);
        self
    }

    /// Build from the `[data]` section: `prices`, `benchmark`, `riskfree`.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TrendsuiteError> {
        let prices = config.get_string("data", "prices").ok_or_else(|| {
            TrendsuiteError::ConfigMissing {
                section: "data".to_string(),
                key: "prices".to_string(),
            }
        })?;

        let mut adapter = CsvDataAdapter::new(PathBuf::from(prices));
        for key in ["benchmark", "riskfree"] {
            if let Some(path) = config.get_string("data", key) {
                adapter = adapter.with_series(key, PathBuf::from(path));
            }
        }
        Ok(adapter)
    }

    fn read_wide_csv(
        &self,
    ) -> Result<(Vec<String>, Vec<(NaiveDate, Vec<Option<f64>>)>), TrendsuiteError> {
        let mut rdr =
            csv::Reader::from_path(&self.prices_path).map_err(|e| TrendsuiteError::Data {
                reason: format!("failed to read {}: {}", self.prices_path.display(), e),
            })?;

        let headers = rdr.headers().map_err(|e| TrendsuiteError::Data {
            reason: format!("CSV header error: {}", e),
        })?;
        let columns: Vec<String> = headers.iter().skip(1).map(|h| h.trim().to_string()).collect();
        if columns.is_empty() {
            return Err(TrendsuiteError::Data {
                reason: format!("{} has no ticker columns", self.prices_path.display()),
            });
        }

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| TrendsuiteError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;
            let date = parse_date(record.get(0).unwrap_or_default())?;

            let mut values = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                let cell = record.get(i + 1).unwrap_or_default().trim();
                if cell.is_empty() {
                    values.push(None);
                } else {
                    let v: f64 = cell.parse().map_err(|e| TrendsuiteError::Data {
                        reason: format!("invalid price for {} on {}: {}", columns[i], date, e),
                    })?;
                    values.push(Some(v));
                }
            }
            rows.push((date, values));
        }

        rows.sort_by_key(|(date, _)| *date);
        Ok((columns, rows))
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, TrendsuiteError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| TrendsuiteError::Data {
        reason: format!("invalid date '{}': {}", value, e),
    })
}

impl MarketDataPort for CsvDataAdapter {
    fn fetch_prices(&self, tickers: &[String]) -> Result<Panel, TrendsuiteError> {
        let (columns, rows) = self.read_wide_csv()?;

        let selected: Vec<usize> = if tickers.is_empty() {
            (0..columns.len()).collect()
        } else {
            tickers
                .iter()
                .map(|t| {
                    columns
                        .iter()
                        .position(|c| c.eq_ignore_ascii_case(t))
                        .ok_or_else(|| TrendsuiteError::Data {
                            reason: format!(
                                "ticker {} not found in {}",
                                t,
                                self.prices_path.display()
                            ),
                        })
                })
                .collect::<Result<_, _>>()?
        };
        let names: Vec<String> = selected.iter().map(|&i| columns[i].clone()).collect();

        // drop leading rows until every selected ticker has traded, then
        // carry the last observation forward over interior gaps
        let mut dates = Vec::new();
        let mut filled: Vec<Vec<f64>> = Vec::new();
        let mut last: Vec<Option<f64>> = vec![None; selected.len()];

        for (date, values) in rows {
            for (slot, &col) in last.iter_mut().zip(&selected) {
                if let Some(v) = values[col] {
                    *slot = Some(v);
                }
            }
            if last.iter().all(|v| v.is_some()) {
                dates.push(date);
                filled.push(last.iter().copied().flatten().collect());
            }
        }

        if dates.is_empty() {
            return Err(TrendsuiteError::Data {
                reason: format!(
                    "no rows in {} with data for every requested ticker",
                    self.prices_path.display()
                ),
            });
        }

        Panel::new(dates, names, filled)
    }

    fn fetch_series(&self, name: &str) -> Result<Series, TrendsuiteError> {
        let path = self
            .series_paths
            .get(name)
            .ok_or_else(|| TrendsuiteError::ConfigMissing {
                section: "data".to_string(),
                key: name.to_string(),
            })?;

        let mut rdr = csv::Reader::from_path(path).map_err(|e| TrendsuiteError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| TrendsuiteError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;
            let date = parse_date(record.get(0).unwrap_or_default())?;
            let cell = record.get(1).unwrap_or_default().trim();
            if cell.is_empty() {
                continue;
            }
            let value: f64 = cell.parse().map_err(|e| TrendsuiteError::Data {
                reason: format!("invalid value in {} on {}: {}", path.display(), date, e),
            })?;
            points.push((date, value));
        }

        points.sort_by_key(|(date, _)| *date);
        let (dates, values) = points.into_iter().unzip();
        Series::new(dates, values)
    }

    fn list_tickers(&self) -> Result<Vec<String>, TrendsuiteError> {
        let (mut columns, _) = self.read_wide_csv()?;
        columns.sort();
        Ok(columns)
    }

    fn data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TrendsuiteError> {
        let (columns, rows) = self.read_wide_csv()?;
        let Some(col) = columns.iter().position(|c| c.eq_ignore_ascii_case(ticker)) else {
            return Ok(None);
        };

        let observed: Vec<NaiveDate> = rows
            .iter()
            .filter(|(_, values)| values[col].is_some())
            .map(|(date, _)| *date)
            .collect();

        match (observed.first(), observed.last()) {
            (Some(&first), Some(&last)) => Ok(Some((first, last, observed.len()))),
            _ => Ok(None),
        }
    }
}

/// Forward-fill a raw series onto a panel's index: each panel date takes
/// the most recent observation at or before it. Fails when the panel
/// starts before the series has any history.
pub fn align_series(
    series: &Series,
    dates: &[NaiveDate],
    name: &str,
) -> Result<Series, TrendsuiteError> {
    let mut values = Vec::with_capacity(dates.len());
    let mut cursor = 0usize;
    let mut current: Option<f64> = None;

    for &date in dates {
        while cursor < series.len() && series.dates()[cursor] <= date {
            current = Some(series.get(cursor));
            cursor += 1;
        }
        match current {
            Some(v) => values.push(v),
            None => {
                return Err(TrendsuiteError::SeriesMisaligned {
                    name: name.to_string(),
                    reason: format!("no observation on or before {}", date),
                });
            }
        }
    }

    Series::new(dates.to_vec(), values)
}
