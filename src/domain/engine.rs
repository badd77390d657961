//! The allocation engine: a single-pass pipeline from price panel to
//! signals, weights, composed returns, out-of-sample statistics and the
//! forward-looking snapshot.
//!
//! The engine is a pure function of its inputs. Every invocation owns
//! private copies of all intermediate panels; nothing persists across
//! calls.

use chrono::NaiveDate;

use super::allocation::AllocationSnapshot;
use super::conviction::{rank_filter, ConvictionMode};
use super::error::TrendsuiteError;
use super::metrics::{drawdown, equity_curve, PerformanceStats, TRADING_DAYS_PER_YEAR};
use super::panel::{first_index_in_year, Panel, Series};
use super::signal::generate_signals;
use super::sizing::{cap_leverage, cash_weights, size_weights};
use super::volatility::realized_volatility;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub fast_window: usize,
    pub slow_window: usize,
    pub vol_window: usize,
    pub vol_target: f64,
    pub leverage_cap: f64,
    pub conviction: ConvictionMode,
    pub oos_start_year: i32,
}

/// Everything a caller needs from one engine invocation. Curves cover
/// the out-of-sample window only; the snapshot is the last computed
/// weight row regardless of the window.
#[derive(Debug, Clone)]
pub struct EngineResult {
    pub oos_dates: Vec<NaiveDate>,
    pub oos_returns: Vec<f64>,
    pub equity_curve: Vec<f64>,
    pub drawdown: Vec<f64>,
    pub benchmark_curve: Vec<f64>,
    pub stats: PerformanceStats,
    pub snapshot: AllocationSnapshot,
}

/// Run the full pipeline.
///
/// `benchmark` and `riskfree` must share the price panel's index; the
/// risk-free series is an annualized rate. Warm-up stretches produce
/// zero weights rather than errors. The only reportable fault besides
/// malformed inputs is an out-of-sample window with no observations.
pub fn run_engine(
    prices: &Panel,
    benchmark: &Series,
    riskfree: &Series,
    config: &EngineConfig,
) -> Result<EngineResult, TrendsuiteError> {
    benchmark.check_aligned(prices, "benchmark")?;
    riskfree.check_aligned(prices, "riskfree")?;

    let returns = prices.returns();

    let signals = generate_signals(prices, config.fast_window, config.slow_window);
    let filtered = rank_filter(&signals, prices.tickers(), config.conviction);

    let vol = realized_volatility(&returns, config.vol_window);
    let mut weights = size_weights(&filtered, &vol, config.vol_target);
    cap_leverage(&mut weights, config.leverage_cap);
    let cash = cash_weights(&weights);

    // Weights decided at t-1 earn the return realized at t; the cash
    // residual accrues the prior session's annualized rate at /252.
    let n_rows = prices.n_rows();
    let mut portfolio_returns = Vec::with_capacity(returns.len());
    for t in 1..n_rows {
        let position: f64 = (0..prices.n_assets())
            .map(|a| weights[t - 1][a] * returns[t - 1][a])
            .sum();
        let accrual = cash[t - 1] * riskfree.get(t - 1) / TRADING_DAYS_PER_YEAR;
        portfolio_returns.push(position + accrual);
    }

    let benchmark_returns = benchmark.returns();
    let return_dates = prices.dates().get(1..).unwrap_or_default();

    let start = first_index_in_year(return_dates, config.oos_start_year).ok_or(
        TrendsuiteError::EmptyOosWindow {
            start_year: config.oos_start_year,
        },
    )?;

    let oos_dates = return_dates[start..].to_vec();
    let oos_returns = portfolio_returns[start..].to_vec();
    let curve = equity_curve(&oos_returns);
    let dd = drawdown(&curve);
    let benchmark_curve = equity_curve(&benchmark_returns[start..]);

    let current_riskfree = riskfree.last().unwrap_or(0.0);
    let stats = PerformanceStats::compute(&oos_returns, current_riskfree);

    let snapshot = AllocationSnapshot::take(prices, &weights, &cash, riskfree).ok_or(
        TrendsuiteError::Panel {
            reason: "cannot snapshot an empty panel".to_string(),
        },
    )?;

    Ok(EngineResult {
        oos_dates,
        oos_returns,
        equity_curve: curve,
        drawdown: dd,
        benchmark_curve,
        stats,
        snapshot,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dates_from(start: NaiveDate, n: usize) -> Vec<NaiveDate> {
        (0..n)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect()
    }

    fn small_config() -> EngineConfig {
        EngineConfig {
            fast_window: 2,
            slow_window: 3,
            vol_window: 2,
            vol_target: 0.12,
            leverage_cap: 1.5,
            conviction: ConvictionMode::All,
            oos_start_year: 2024,
        }
    }

    fn flat_series(dates: &[NaiveDate], value: f64) -> Series {
        Series::new(dates.to_vec(), vec![value; dates.len()]).unwrap()
    }

    #[test]
    fn misaligned_benchmark_is_rejected() {
        let dates = dates_from(date(2024, 1, 1), 5);
        let panel = Panel::new(
            dates.clone(),
            vec!["SPY".into()],
            (0..5).map(|i| vec![100.0 + i as f64]).collect(),
        )
        .unwrap();
        let benchmark = flat_series(&dates[..4], 100.0);
        let riskfree = flat_series(&dates, 0.05);

        let err = run_engine(&panel, &benchmark, &riskfree, &small_config()).unwrap_err();
        assert!(matches!(err, TrendsuiteError::SeriesMisaligned { .. }));
    }

    #[test]
    fn empty_oos_window_is_reported() {
        let dates = dates_from(date(2023, 1, 2), 10);
        let panel = Panel::new(
            dates.clone(),
            vec!["SPY".into()],
            (0..10).map(|i| vec![100.0 + i as f64]).collect(),
        )
        .unwrap();
        let benchmark = flat_series(&dates, 100.0);
        let riskfree = flat_series(&dates, 0.05);

        let config = EngineConfig {
            oos_start_year: 2030,
            ..small_config()
        };
        let err = run_engine(&panel, &benchmark, &riskfree, &config).unwrap_err();
        assert!(matches!(
            err,
            TrendsuiteError::EmptyOosWindow { start_year: 2030 }
        ));
    }

    #[test]
    fn warmup_stretch_accrues_riskfree_only() {
        // windows are far longer than the panel: no asset ever sized
        let dates = dates_from(date(2024, 1, 1), 6);
        let panel = Panel::new(
            dates.clone(),
            vec!["SPY".into()],
            (0..6).map(|i| vec![100.0 + i as f64]).collect(),
        )
        .unwrap();
        let benchmark = flat_series(&dates, 100.0);
        let riskfree = flat_series(&dates, 0.0504);

        let config = EngineConfig {
            fast_window: 50,
            slow_window: 200,
            vol_window: 60,
            ..small_config()
        };
        let result = run_engine(&panel, &benchmark, &riskfree, &config).unwrap();

        let daily = 0.0504 / 252.0;
        for r in &result.oos_returns {
            assert!((r - daily).abs() < 1e-15);
        }
        // pure cash: the equity curve compounds geometrically
        let last = result.equity_curve.last().unwrap();
        assert!((last - (1.0 + daily).powi(5)).abs() < 1e-12);
    }

    #[test]
    fn no_look_ahead_in_return_composition() {
        let dates = dates_from(date(2024, 1, 1), 8);
        let prices: Vec<Vec<f64>> = [100.0, 101.0, 103.0, 102.0, 105.0, 108.0, 107.0, 111.0]
            .iter()
            .map(|&p| vec![p])
            .collect();
        let panel = Panel::new(dates.clone(), vec!["SPY".into()], prices).unwrap();
        let benchmark = flat_series(&dates, 100.0);
        let riskfree = flat_series(&dates, 0.0);

        let result = run_engine(&panel, &benchmark, &riskfree, &small_config()).unwrap();

        // rebuild expected returns by hand from the engine's own parts
        let returns = panel.returns();
        let signals = generate_signals(&panel, 2, 3);
        let vol = realized_volatility(&returns, 2);
        let mut weights = size_weights(&signals.eligible, &vol, 0.12);
        cap_leverage(&mut weights, 1.5);

        for t in 1..panel.n_rows() {
            let expected = weights[t - 1][0] * returns[t - 1][0];
            assert!(
                (result.oos_returns[t - 1] - expected).abs() < 1e-12,
                "look-ahead at row {}",
                t
            );
        }
    }

    #[test]
    fn oos_slice_drops_warmup_years() {
        let dates = dates_from(date(2023, 12, 25), 12);
        let panel = Panel::new(
            dates.clone(),
            vec!["SPY".into()],
            (0..12).map(|i| vec![100.0 + i as f64]).collect(),
        )
        .unwrap();
        let benchmark = flat_series(&dates, 100.0);
        let riskfree = flat_series(&dates, 0.05);

        let result = run_engine(&panel, &benchmark, &riskfree, &small_config()).unwrap();

        assert!(result.oos_dates.iter().all(|d| {
            use chrono::Datelike;
            d.year() >= 2024
        }));
        assert_eq!(result.oos_dates.len(), result.oos_returns.len());
        assert_eq!(result.oos_dates.len(), result.equity_curve.len());
        assert_eq!(result.oos_dates.len(), result.benchmark_curve.len());
    }

    #[test]
    fn benchmark_curve_rebases_independently() {
        let dates = dates_from(date(2024, 1, 1), 4);
        let panel = Panel::new(
            dates.clone(),
            vec!["SPY".into()],
            vec![vec![100.0], vec![101.0], vec![102.0], vec![103.0]],
        )
        .unwrap();
        let benchmark = Series::new(dates.clone(), vec![50.0, 55.0, 52.0, 54.0]).unwrap();
        let riskfree = flat_series(&dates, 0.0);

        let result = run_engine(&panel, &benchmark, &riskfree, &small_config()).unwrap();

        assert!((result.benchmark_curve[0] - 1.10).abs() < 1e-12);
        assert!((result.benchmark_curve[1] - 52.0 / 50.0).abs() < 1e-12);
        assert!((result.benchmark_curve[2] - 54.0 / 50.0).abs() < 1e-12);
    }

    #[test]
    fn snapshot_reflects_last_weight_row() {
        let dates = dates_from(date(2024, 1, 1), 10);
        let prices: Vec<Vec<f64>> = (0..10).map(|i| vec![100.0 * 1.01f64.powi(i)]).collect();
        let panel = Panel::new(dates.clone(), vec!["SPY".into()], prices).unwrap();
        let benchmark = flat_series(&dates, 100.0);
        let riskfree = flat_series(&dates, 0.05);

        let result = run_engine(&panel, &benchmark, &riskfree, &small_config()).unwrap();

        let snap = &result.snapshot;
        assert_eq!(snap.as_of, dates[9]);
        assert_eq!(snap.assets.len(), 1);
        assert!(snap.assets[0].long);
        assert!((snap.cash_weight - (1.0 - snap.assets[0].weight)).abs() < 1e-12);
        assert!((snap.riskfree - 0.05).abs() < 1e-12);
    }
}
