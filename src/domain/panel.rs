//! Time-indexed price/weight panels and aligned single series.

use chrono::{Datelike, NaiveDate};

use super::error::TrendsuiteError;

/// A time × ticker matrix. Dates are ascending and unique; every row has
/// one value per ticker. Missing values must be filled by the caller
/// before construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    dates: Vec<NaiveDate>,
    tickers: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl Panel {
    pub fn new(
        dates: Vec<NaiveDate>,
        tickers: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, TrendsuiteError> {
        if dates.len() != rows.len() {
            return Err(TrendsuiteError::Panel {
                reason: format!("{} dates but {} rows", dates.len(), rows.len()),
            });
        }
        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(TrendsuiteError::Panel {
                    reason: format!("dates not strictly ascending at {}", pair[1]),
                });
            }
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != tickers.len() {
                return Err(TrendsuiteError::Panel {
                    reason: format!(
                        "row {} has {} values, expected {}",
                        i,
                        row.len(),
                        tickers.len()
                    ),
                });
            }
        }
        Ok(Panel {
            dates,
            tickers,
            rows,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_assets(&self) -> usize {
        self.tickers.len()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn date(&self, t: usize) -> NaiveDate {
        self.dates[t]
    }

    pub fn get(&self, t: usize, a: usize) -> f64 {
        self.rows[t][a]
    }

    pub fn row(&self, t: usize) -> &[f64] {
        &self.rows[t]
    }

    pub fn last_row(&self) -> Option<&[f64]> {
        self.rows.last().map(|r| r.as_slice())
    }

    /// Simple returns: `r[t][a] = p[t][a]/p[t-1][a] - 1`, one row shorter
    /// than the price panel. Row `t` of the result is dated `dates[t+1]`.
    pub fn returns(&self) -> Vec<Vec<f64>> {
        let mut out = Vec::with_capacity(self.rows.len().saturating_sub(1));
        for t in 1..self.rows.len() {
            let row: Vec<f64> = (0..self.tickers.len())
                .map(|a| {
                    let prev = self.rows[t - 1][a];
                    if prev != 0.0 {
                        self.rows[t][a] / prev - 1.0
                    } else {
                        0.0
                    }
                })
                .collect();
            out.push(row);
        }
        out
    }
}

/// A single time series aligned to a panel index.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl Series {
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self, TrendsuiteError> {
        if dates.len() != values.len() {
            return Err(TrendsuiteError::Panel {
                reason: format!("{} dates but {} values", dates.len(), values.len()),
            });
        }
        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(TrendsuiteError::Panel {
                    reason: format!("dates not strictly ascending at {}", pair[1]),
                });
            }
        }
        Ok(Series { dates, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, t: usize) -> f64 {
        self.values[t]
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Simple returns, one element shorter than the series.
    pub fn returns(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.values.len().saturating_sub(1));
        for t in 1..self.values.len() {
            let prev = self.values[t - 1];
            out.push(if prev != 0.0 {
                self.values[t] / prev - 1.0
            } else {
                0.0
            });
        }
        out
    }

    /// Alignment is the data adapter's job; the engine only checks it.
    pub fn check_aligned(&self, panel: &Panel, name: &str) -> Result<(), TrendsuiteError> {
        if self.dates.len() != panel.n_rows() {
            return Err(TrendsuiteError::SeriesMisaligned {
                name: name.to_string(),
                reason: format!("{} observations, panel has {}", self.dates.len(), panel.n_rows()),
            });
        }
        for (a, b) in self.dates.iter().zip(panel.dates()) {
            if a != b {
                return Err(TrendsuiteError::SeriesMisaligned {
                    name: name.to_string(),
                    reason: format!("index mismatch: {} vs {}", a, b),
                });
            }
        }
        Ok(())
    }
}

/// First index whose calendar year is `>= year`, or None when no
/// observation falls on or after the cutoff.
pub fn first_index_in_year(dates: &[NaiveDate], year: i32) -> Option<usize> {
    dates.iter().position(|d| d.year() >= year)
}
