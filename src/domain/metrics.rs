//! Performance statistics over the out-of-sample window.

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Summary statistics of a daily return series.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceStats {
    pub ann_return: f64,
    pub ann_vol: f64,
    pub sharpe: f64,
    pub max_drawdown: f64,
}

impl PerformanceStats {
    /// `current_riskfree` is the annualized rate used as the Sharpe
    /// hurdle. Sharpe is 0 when the return series has no variance.
    pub fn compute(returns: &[f64], current_riskfree: f64) -> Self {
        if returns.is_empty() {
            return PerformanceStats {
                ann_return: 0.0,
                ann_vol: 0.0,
                sharpe: 0.0,
                max_drawdown: 0.0,
            };
        }

        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let variance = returns.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / n;

        let ann_return = mean * TRADING_DAYS_PER_YEAR;
        let ann_vol = variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt();

        let sharpe = if ann_vol > 0.0 {
            (ann_return - current_riskfree) / ann_vol
        } else {
            0.0
        };

        let curve = equity_curve(returns);
        let max_drawdown = drawdown(&curve).into_iter().fold(0.0_f64, f64::min);

        PerformanceStats {
            ann_return,
            ann_vol,
            sharpe,
            max_drawdown,
        }
    }
}

/// Cumulative product of `1 + r`, implicitly based at 1.0 the session
/// before the first observation. Same length as `returns`.
pub fn equity_curve(returns: &[f64]) -> Vec<f64> {
    let mut curve = Vec::with_capacity(returns.len());
    let mut level = 1.0;
    for r in returns {
        level *= 1.0 + r;
        curve.push(level);
    }
    curve
}

/// `dd[t] = curve[t] / max(curve[0..=t]) - 1`, always <= 0 given the
/// 1.0 base.
pub fn drawdown(curve: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(curve.len());
    let mut peak = 1.0_f64;
    for &level in curve {
        if level > peak {
            peak = level;
        }
        out.push(if peak > 0.0 { level / peak - 1.0 } else { 0.0 });
    }
    out
}
