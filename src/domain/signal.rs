//! Trend signal generation.
//!
//! An asset is trend-eligible on a day when its fast moving average sits
//! above its slow moving average. Rows inside the slow warm-up are
//! ineligible, never an error.

use super::panel::Panel;

/// Eligibility matrix plus the conviction score used for ranking.
/// Both share the price panel's shape. Conviction is
/// `price / slow_MA - 1`; it is only meaningful where `eligible` is true.
#[derive(Debug, Clone)]
pub struct SignalSet {
    pub eligible: Vec<Vec<bool>>,
    pub conviction: Vec<Vec<f64>>,
}

impl SignalSet {
    /// Count of eligible assets in row `t`.
    pub fn active(&self, t: usize) -> usize {
        self.eligible[t].iter().filter(|&&e| e).count()
    }
}

fn window_mean(prices: &Panel, t: usize, a: usize, window: usize) -> f64 {
    let start = t + 1 - window;
    (start..=t).map(|i| prices.get(i, a)).sum::<f64>() / window as f64
}

/// Compare fast and slow moving averages per asset per day.
/// `signal[t][a]` is true iff `fast[t][a] > slow[t][a]` and row `t` has a
/// fully populated slow window.
pub fn generate_signals(prices: &Panel, fast_window: usize, slow_window: usize) -> SignalSet {
    let n_rows = prices.n_rows();
    let n_assets = prices.n_assets();
    let warmup = slow_window.saturating_sub(1);

    let mut eligible = vec![vec![false; n_assets]; n_rows];
    let mut conviction = vec![vec![0.0; n_assets]; n_rows];

    for t in warmup..n_rows {
        for a in 0..n_assets {
            let fast = window_mean(prices, t, a, fast_window);
            let slow = window_mean(prices, t, a, slow_window);
            eligible[t][a] = fast > slow;
            if slow != 0.0 {
                conviction[t][a] = prices.get(t, a) / slow - 1.0;
            }
        }
    }

    SignalSet {
        eligible,
        conviction,
    }
}
