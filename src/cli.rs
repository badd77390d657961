//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_data_adapter::{align_series, CsvDataAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::{self, TextReportAdapter};
use crate::adapters::weekday_calendar_adapter::WeekdayCalendarAdapter;
use crate::domain::config_validation::{validate_data_config, validate_engine_config};
use crate::domain::conviction::ConvictionMode;
use crate::domain::engine::{run_engine, EngineConfig, EngineResult};
use crate::domain::error::TrendsuiteError;
use crate::domain::panel::{Panel, Series};
use crate::ports::calendar_port::TradingCalendarPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "trendsuite", about = "ETF trend-following allocation engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the engine over the configured panel and write a report
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the target allocation for the next trading session
    Allocate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for ticker(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
    },
    /// List tickers available in the price file
    ListTickers {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            output,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config)
            } else {
                run_backtest(&config, output.as_ref())
            }
        }
        Command::Allocate { config } => run_allocate(&config),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, ticker } => run_info(&config, ticker.as_deref()),
        Command::ListTickers { config } => run_list_tickers(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TrendsuiteError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_engine_config(adapter: &dyn ConfigPort) -> Result<EngineConfig, TrendsuiteError> {
    let conviction_str = adapter
        .get_string("strategy", "conviction")
        .unwrap_or_else(|| "all".to_string());
    let conviction: ConvictionMode =
        conviction_str
            .parse()
            .map_err(|reason| TrendsuiteError::ConfigInvalid {
                section: "strategy".into(),
                key: "conviction".into(),
                reason,
            })?;

    let oos_str = adapter.get_string("backtest", "oos_start_year").ok_or_else(|| {
        TrendsuiteError::ConfigMissing {
            section: "backtest".into(),
            key: "oos_start_year".into(),
        }
    })?;
    let oos_start_year = oos_str
        .trim()
        .parse::<i32>()
        .map_err(|_| TrendsuiteError::ConfigInvalid {
            section: "backtest".into(),
            key: "oos_start_year".into(),
            reason: "oos_start_year must be a four-digit year".into(),
        })?;

    Ok(EngineConfig {
        fast_window: adapter.get_int("strategy", "fast_window", 50) as usize,
        slow_window: adapter.get_int("strategy", "slow_window", 200) as usize,
        vol_window: adapter.get_int("strategy", "vol_window", 60) as usize,
        vol_target: adapter.get_double("strategy", "vol_target", 0.12),
        leverage_cap: adapter.get_double("strategy", "leverage_cap", 1.5),
        conviction,
        oos_start_year,
    })
}

pub fn resolve_tickers(config: &dyn ConfigPort) -> Vec<String> {
    match config.get_string("data", "tickers") {
        Some(s) => s
            .split(',')
            .map(|t| t.trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .collect(),
        None => vec![],
    }
}

fn build_calendar(config: &dyn ConfigPort) -> Result<WeekdayCalendarAdapter, TrendsuiteError> {
    match config.get_string("data", "holidays") {
        Some(path) => WeekdayCalendarAdapter::from_holiday_file(std::path::Path::new(&path)),
        None => Ok(WeekdayCalendarAdapter::new()),
    }
}

/// Stages shared by `backtest` and `allocate`: fetch the panel, align
/// the companion series to its index, run the engine.
pub fn run_pipeline(
    adapter: &dyn ConfigPort,
    data_port: &dyn MarketDataPort,
    engine_config: &EngineConfig,
) -> Result<(Panel, Series, Series, EngineResult), TrendsuiteError> {
    let tickers = resolve_tickers(adapter);
    let prices = data_port.fetch_prices(&tickers)?;
    eprintln!(
        "Loaded {} sessions x {} tickers",
        prices.n_rows(),
        prices.n_assets()
    );

    let benchmark = align_series(&data_port.fetch_series("benchmark")?, prices.dates(), "benchmark")?;
    let riskfree = align_series(&data_port.fetch_series("riskfree")?, prices.dates(), "riskfree")?;

    let result = run_engine(&prices, &benchmark, &riskfree, engine_config)?;
    Ok((prices, benchmark, riskfree, result))
}

fn validated_setup(
    config_path: &PathBuf,
) -> Result<(FileConfigAdapter, EngineConfig), ExitCode> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;

    for check in [validate_engine_config(&adapter), validate_data_config(&adapter)] {
        if let Err(e) = check {
            eprintln!("error: {e}");
            return Err(ExitCode::from(&e));
        }
    }

    match build_engine_config(&adapter) {
        Ok(engine_config) => Ok((adapter, engine_config)),
        Err(e) => {
            eprintln!("error: {e}");
            Err(ExitCode::from(&e))
        }
    }
}

fn run_backtest(config_path: &PathBuf, output_path: Option<&PathBuf>) -> ExitCode {
    let (adapter, engine_config) = match validated_setup(config_path) {
        Ok(pair) => pair,
        Err(code) => return code,
    };

    let data_port = match CsvDataAdapter::from_config(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    eprintln!(
        "Running engine: SMA {}/{}, {} conviction, OOS from {}",
        engine_config.fast_window,
        engine_config.slow_window,
        engine_config.conviction,
        engine_config.oos_start_year
    );

    let result = match run_pipeline(&adapter, &data_port, &engine_config) {
        Ok((_, _, _, result)) => result,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    eprint!("\n{}", text_report_adapter::render_summary(&result, &engine_config));

    let output = output_path
        .cloned()
        .or_else(|| adapter.get_string("report", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("report.txt"));

    let initial_capital = adapter.get_double("backtest", "initial_capital", 100_000.0);
    let report_port = TextReportAdapter::new(initial_capital);

    match report_port.write(&result, &engine_config, &output) {
        Ok(()) => {
            eprintln!("\nReport written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write report: {e}");
            ExitCode::from(&e)
        }
    }
}

fn run_allocate(config_path: &PathBuf) -> ExitCode {
    let (adapter, engine_config) = match validated_setup(config_path) {
        Ok(pair) => pair,
        Err(code) => return code,
    };

    let data_port = match CsvDataAdapter::from_config(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    let result = match run_pipeline(&adapter, &data_port, &engine_config) {
        Ok((_, _, _, result)) => result,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    // the next session is the calendar collaborator's call, not ours
    let calendar = match build_calendar(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };
    let next_session = match calendar.next_session(result.snapshot.as_of) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    print!("{}", text_report_adapter::render_allocation_table(&result));
    println!("Next session:     {}", next_session);
    ExitCode::SUCCESS
}

pub fn run_dry_run(config_path: &PathBuf) -> ExitCode {
    let (adapter, engine_config) = match validated_setup(config_path) {
        Ok(pair) => pair,
        Err(code) => return code,
    };
    eprintln!("Config validated successfully");

    eprintln!("\nResolved strategy:");
    eprintln!("  fast_window:   {}", engine_config.fast_window);
    eprintln!("  slow_window:   {}", engine_config.slow_window);
    eprintln!("  vol_window:    {}", engine_config.vol_window);
    eprintln!("  vol_target:    {}", engine_config.vol_target);
    eprintln!("  leverage_cap:  {}", engine_config.leverage_cap);
    eprintln!("  conviction:    {}", engine_config.conviction);
    eprintln!("  oos_from:      {}", engine_config.oos_start_year);

    let tickers = resolve_tickers(&adapter);
    eprintln!("\nUniverse:");
    if tickers.is_empty() {
        eprintln!("  tickers: (all columns in the price file)");
    } else {
        eprintln!("  tickers: {}", tickers.join(", "));
    }

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    for check in [validate_engine_config(&adapter), validate_data_config(&adapter)] {
        if let Err(e) = check {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    }

    eprintln!("Configuration is valid.");
    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf, ticker: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_port = match CsvDataAdapter::from_config(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    let tickers = match ticker {
        Some(t) => vec![t.to_uppercase()],
        None => {
            let configured = resolve_tickers(&adapter);
            if configured.is_empty() {
                match data_port.list_tickers() {
                    Ok(all) => all,
                    Err(e) => {
                        eprintln!("error: {e}");
                        return ExitCode::from(&e);
                    }
                }
            } else {
                configured
            }
        }
    };

    for t in &tickers {
        match data_port.data_range(t) {
            Ok(Some((min_date, max_date, count))) => {
                println!("{}: {} sessions, {} to {}", t, count, min_date, max_date);
            }
            Ok(None) => {
                eprintln!("{}: no data found", t);
            }
            Err(e) => {
                eprintln!("error querying {}: {}", t, e);
            }
        }
    }
    ExitCode::SUCCESS
}

fn run_list_tickers(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_port = match CsvDataAdapter::from_config(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    match data_port.list_tickers() {
        Ok(tickers) => {
            for t in &tickers {
                println!("{}", t);
            }
            eprintln!("{} tickers found", tickers.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}
