//! INI file configuration adapter.

use configparser::ini::Ini;
use std::path::Path;
use std::str::FromStr;

use crate::domain::backtest::BalanceCheckPolicy;
use crate::domain::config::PipelineConfig;
use crate::domain::config_validation::validate_pipeline_config;
use crate::domain::error::SigtraderError;
use crate::domain::signal::SignalRule;
use crate::ports::config_port::{ConfigPort, get_list, get_parsed};

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SigtraderError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| SigtraderError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, SigtraderError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| SigtraderError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }
}

fn required<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<T, SigtraderError> {
    get_parsed(config, section, key)?.ok_or_else(|| SigtraderError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    })
}

fn override_with<T: FromStr>(
    target: &mut T,
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<(), SigtraderError> {
    if let Some(value) = get_parsed(config, section, key)? {
        *target = value;
    }
    Ok(())
}

/// Build and validate a [`PipelineConfig`] from `[indicators]`, `[signals]`,
/// `[backtest]` and `[metrics]`.
///
/// `[backtest] balance_check` and `[metrics] sharpe_annualization_factor`
/// must be present. Every other key falls back to the conventional default.
pub fn build_pipeline_config(config: &dyn ConfigPort) -> Result<PipelineConfig, SigtraderError> {
    let balance_check: BalanceCheckPolicy = required(config, "backtest", "balance_check")?;
    let factor: f64 = required(config, "metrics", "sharpe_annualization_factor")?;
    let mut pc = PipelineConfig::new(balance_check, factor);

    let ind = &mut pc.indicators;
    if let Some(periods) = get_list(config, "indicators", "sma_periods")? {
        ind.sma_periods = periods;
    }
    if let Some(periods) = get_list(config, "indicators", "ema_periods")? {
        ind.ema_periods = periods;
    }
    override_with(&mut ind.rsi_period, config, "indicators", "rsi_period")?;
    override_with(&mut ind.bollinger_period, config, "indicators", "bollinger_period")?;
    override_with(&mut ind.bollinger_stddev, config, "indicators", "bollinger_stddev")?;
    override_with(&mut ind.macd_fast, config, "indicators", "macd_fast")?;
    override_with(&mut ind.macd_slow, config, "indicators", "macd_slow")?;
    override_with(&mut ind.macd_signal, config, "indicators", "macd_signal")?;

    let sig = &mut pc.signals;
    if let Some(rules) = get_list::<SignalRule>(config, "signals", "active_rules")? {
        sig.active_rules = rules.into_iter().collect();
    }
    override_with(&mut sig.buy_threshold, config, "signals", "buy_threshold")?;
    override_with(&mut sig.sell_threshold, config, "signals", "sell_threshold")?;
    override_with(&mut sig.rsi_overbought, config, "signals", "rsi_overbought")?;
    override_with(&mut sig.rsi_oversold, config, "signals", "rsi_oversold")?;

    let bt = &mut pc.backtest;
    override_with(&mut bt.initial_balance, config, "backtest", "initial_balance")?;
    override_with(&mut bt.trade_size, config, "backtest", "trade_size")?;
    override_with(&mut bt.fee_rate, config, "backtest", "fee_rate")?;

    validate_pipeline_config(&pc)?;
    Ok(pc)
}
