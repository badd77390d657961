//! Conviction-based narrowing of the eligible set.

use std::fmt;
use std::str::FromStr;

use super::signal::SignalSet;

/// How many of the trend-eligible assets to hold each day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvictionMode {
    /// Hold every trend-eligible asset.
    All,
    /// Hold the three strongest trends.
    Top3,
    /// Hold only the single strongest trend.
    Top1,
}

impl ConvictionMode {
    pub fn keep_count(&self) -> Option<usize> {
        match self {
            ConvictionMode::All => None,
            ConvictionMode::Top3 => Some(3),
            ConvictionMode::Top1 => Some(1),
        }
    }
}

impl fmt::Display for ConvictionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvictionMode::All => write!(f, "all"),
            ConvictionMode::Top3 => write!(f, "top3"),
            ConvictionMode::Top1 => write!(f, "top1"),
        }
    }
}

impl FromStr for ConvictionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(ConvictionMode::All),
            "top3" | "top_3" => Ok(ConvictionMode::Top3),
            "top1" | "top_1" => Ok(ConvictionMode::Top1),
            other => Err(format!(
                "unknown conviction mode '{}' (expected all, top3 or top1)",
                other
            )),
        }
    }
}

/// Narrow each row of the eligibility matrix to the top-K assets by
/// conviction score. Ties are broken by ticker order (ascending index),
/// which keeps the filter deterministic. `All` passes the matrix through
/// unchanged.
pub fn rank_filter(signals: &SignalSet, tickers: &[String], mode: ConvictionMode) -> Vec<Vec<bool>> {
    let Some(keep) = mode.keep_count() else {
        return signals.eligible.clone();
    };

    let mut filtered = vec![vec![false; tickers.len()]; signals.eligible.len()];

    for (t, row) in signals.eligible.iter().enumerate() {
        let mut candidates: Vec<usize> = (0..tickers.len()).filter(|&a| row[a]).collect();
        candidates.sort_by(|&x, &y| {
            signals.conviction[t][y]
                .partial_cmp(&signals.conviction[t][x])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| tickers[x].cmp(&tickers[y]))
        });
        for &a in candidates.iter().take(keep) {
            filtered[t][a] = true;
        }
    }

    filtered
}
