//! Rolling realized volatility.

use super::metrics::TRADING_DAYS_PER_YEAR;

/// Annualized rolling volatility per asset, aligned to price rows.
///
/// `returns` is the derived return panel (one row shorter than prices);
/// output row `t` uses the `window` most recent returns up to and
/// including price row `t`. Rows with insufficient history are `None` —
/// downstream sizing treats them as infinite risk. Population standard
/// deviation, annualized by sqrt(252).
pub fn realized_volatility(returns: &[Vec<f64>], window: usize) -> Vec<Vec<Option<f64>>> {
    let n_price_rows = returns.len() + 1;
    let n_assets = returns.first().map_or(0, |r| r.len());
    let mut out = vec![vec![None; n_assets]; n_price_rows];

    for t in 1..n_price_rows {
        let i = t - 1;
        if i + 1 < window {
            continue;
        }
        let start = i + 1 - window;
        for a in 0..n_assets {
            let slice: Vec<f64> = (start..=i).map(|j| returns[j][a]).collect();
            let mean = slice.iter().sum::<f64>() / window as f64;
            let variance =
                slice.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / window as f64;
            out[t][a] = Some(variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt());
        }
    }

    out
}
