//! Plain-text report adapter.
//!
//! Writes a human-readable run summary plus a machine-readable CSV of
//! the out-of-sample equity, drawdown and benchmark curves next to it.

use crate::domain::engine::{EngineConfig, EngineResult};
use crate::domain::error::TrendsuiteError;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::Path;

pub struct TextReportAdapter {
    /// Display capital: the rebased curve is scaled by this for the
    /// closing-equity line. The curve artifact stays rebased to 1.0.
    pub initial_capital: f64,
}

impl TextReportAdapter {
    pub fn new(initial_capital: f64) -> Self {
        Self { initial_capital }
    }
}

pub fn render_summary(result: &EngineResult, config: &EngineConfig) -> String {
    let mut out = String::new();
    out.push_str("=== Trend Engine Run ===\n");
    out.push_str(&format!(
        "Strategy:         SMA {}/{} crossover, {} conviction\n",
        config.fast_window, config.slow_window, config.conviction
    ));
    out.push_str(&format!(
        "Sizing:           {:.1}% target vol, {:.2}x leverage cap, {}-day vol window\n",
        config.vol_target * 100.0,
        config.leverage_cap,
        config.vol_window
    ));

    match (result.oos_dates.first(), result.oos_dates.last()) {
        (Some(first), Some(last)) => {
            out.push_str(&format!(
                "OOS window:       {} to {} ({} sessions)\n",
                first,
                last,
                result.oos_dates.len()
            ));
        }
        _ => out.push_str("OOS window:       (empty)\n"),
    }

    out.push_str(&format!(
        "Annual Return:    {:.2}%\n",
        result.stats.ann_return * 100.0
    ));
    out.push_str(&format!(
        "Annual Vol:       {:.2}%\n",
        result.stats.ann_vol * 100.0
    ));
    out.push_str(&format!("Sharpe Ratio:     {:.2}\n", result.stats.sharpe));
    out.push_str(&format!(
        "Max Drawdown:     {:.2}%\n",
        result.stats.max_drawdown * 100.0
    ));
    out
}

pub fn render_allocation_table(result: &EngineResult) -> String {
    let snap = &result.snapshot;
    let mut out = String::new();
    out.push_str(&format!("=== Target Allocation (as of {}) ===\n", snap.as_of));
    out.push_str("Ticker    Signal  Weight\n");
    for asset in &snap.assets {
        out.push_str(&format!(
            "{:<8}  {:<6}  {:>6.2}%\n",
            asset.ticker,
            if asset.long { "LONG" } else { "CASH" },
            asset.weight * 100.0
        ));
    }
    out.push_str(&format!("{:<8}  {:<6}  {:>6.2}%\n", "Cash", "", snap.cash_weight * 100.0));
    out.push_str(&format!(
        "Risk-free rate:   {:.2}%\n",
        snap.riskfree * 100.0
    ));
    out
}

fn curves_path(output_path: &Path) -> std::path::PathBuf {
    let stem = output_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "report".to_string());
    output_path.with_file_name(format!("{}_curves.csv", stem))
}

fn write_curves_csv(result: &EngineResult, path: &Path) -> Result<(), TrendsuiteError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| TrendsuiteError::Data {
        reason: format!("failed to write {}: {}", path.display(), e),
    })?;

    wtr.write_record(["date", "equity", "drawdown", "benchmark"])
        .map_err(|e| TrendsuiteError::Data {
            reason: format!("CSV write error: {}", e),
        })?;

    for (i, date) in result.oos_dates.iter().enumerate() {
        wtr.write_record([
            date.to_string(),
            format!("{:.8}", result.equity_curve[i]),
            format!("{:.8}", result.drawdown[i]),
            format!("{:.8}", result.benchmark_curve[i]),
        ])
        .map_err(|e| TrendsuiteError::Data {
            reason: format!("CSV write error: {}", e),
        })?;
    }

    wtr.flush()?;
    Ok(())
}

impl ReportPort for TextReportAdapter {
    fn write(
        &self,
        result: &EngineResult,
        config: &EngineConfig,
        output_path: &Path,
    ) -> Result<(), TrendsuiteError> {
        let mut report = render_summary(result, config);

        let final_equity = result.equity_curve.last().copied().unwrap_or(1.0);
        report.push_str(&format!(
            "Closing Equity:   {:.2} (on {:.2} initial)\n\n",
            final_equity * self.initial_capital,
            self.initial_capital
        ));
        report.push_str(&render_allocation_table(result));

        fs::write(output_path, report)?;
        write_curves_csv(result, &curves_path(output_path))
    }
}
