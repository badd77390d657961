//! Configuration validation.
//!
//! Validates all config fields before the engine runs.

use crate::domain::conviction::ConvictionMode;
use crate::domain::error::TrendsuiteError;
use crate::ports::config_port::ConfigPort;

pub fn validate_engine_config(config: &dyn ConfigPort) -> Result<(), TrendsuiteError> {
    validate_vol_target(config)?;
    validate_leverage_cap(config)?;
    validate_windows(config)?;
    validate_conviction(config)?;
    validate_oos_start_year(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), TrendsuiteError> {
    for key in ["prices", "benchmark", "riskfree"] {
        match config.get_string("data", key) {
            Some(s) if !s.trim().is_empty() => {}
            _ => {
                return Err(TrendsuiteError::ConfigMissing {
                    section: "data".to_string(),
                    key: key.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn validate_vol_target(config: &dyn ConfigPort) -> Result<(), TrendsuiteError> {
    let value = config.get_double("strategy", "vol_target", 0.12);
    if value <= 0.0 || value > 1.0 {
        return Err(TrendsuiteError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "vol_target".to_string(),
            reason: "vol_target must be in (0, 1]".to_string(),
        });
    }
    Ok(())
}

fn validate_leverage_cap(config: &dyn ConfigPort) -> Result<(), TrendsuiteError> {
    let value = config.get_double("strategy", "leverage_cap", 1.5);
    if value <= 0.0 {
        return Err(TrendsuiteError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "leverage_cap".to_string(),
            reason: "leverage_cap must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), TrendsuiteError> {
    let fast = config.get_int("strategy", "fast_window", 50);
    let slow = config.get_int("strategy", "slow_window", 200);
    let vol = config.get_int("strategy", "vol_window", 60);

    if fast < 2 {
        return Err(TrendsuiteError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "fast_window".to_string(),
            reason: "fast_window must be at least 2".to_string(),
        });
    }
    if slow <= fast {
        return Err(TrendsuiteError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "slow_window".to_string(),
            reason: "slow_window must be greater than fast_window".to_string(),
        });
    }
    if vol < 2 {
        return Err(TrendsuiteError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "vol_window".to_string(),
            reason: "vol_window must be at least 2".to_string(),
        });
    }
    Ok(())
}

fn validate_conviction(config: &dyn ConfigPort) -> Result<(), TrendsuiteError> {
    let value = config
        .get_string("strategy", "conviction")
        .unwrap_or_else(|| "all".to_string());
    value
        .parse::<ConvictionMode>()
        .map(|_| ())
        .map_err(|reason| TrendsuiteError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "conviction".to_string(),
            reason,
        })
}

fn validate_oos_start_year(config: &dyn ConfigPort) -> Result<(), TrendsuiteError> {
    match config.get_string("backtest", "oos_start_year") {
        None => Err(TrendsuiteError::ConfigMissing {
            section: "backtest".to_string(),
            key: "oos_start_year".to_string(),
        }),
        Some(s) => match s.trim().parse::<i32>() {
            Ok(year) if (1900..=9999).contains(&year) => Ok(()),
            _ => Err(TrendsuiteError::ConfigInvalid {
                section: "backtest".to_string(),
                key: "oos_start_year".to_string(),
                reason: "oos_start_year must be a four-digit year".to_string(),
            }),
        },
    }
}
