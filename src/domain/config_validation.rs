//! Configuration validation.
//!
//! Runs before any computation; a config that fails here is never partially
//! executed.

use crate::domain::config::{IndicatorParams, PipelineConfig, SignalParams};
use crate::domain::error::SigtraderError;
use crate::domain::signal::SignalRule;

pub fn validate_pipeline_config(config: &PipelineConfig) -> Result<(), SigtraderError> {
    validate_indicator_params(&config.indicators)?;
    validate_signal_params(&config.signals, &config.indicators)?;
    validate_backtest_params(config)?;
    validate_annualization(config.sharpe_annualization_factor)?;
    Ok(())
}

fn validate_indicator_params(params: &IndicatorParams) -> Result<(), SigtraderError> {
    for &p in &params.sma_periods {
        positive_period("sma_periods", p)?;
    }
    for &p in &params.ema_periods {
        positive_period("ema_periods", p)?;
    }
    positive_period("rsi_period", params.rsi_period)?;
    if params.bollinger_period < 2 {
        return Err(SigtraderError::invalid_config(
            "bollinger_period",
            "bollinger_period must be at least 2",
        ));
    }
    if !params.bollinger_stddev.is_finite() || params.bollinger_stddev <= 0.0 {
        return Err(SigtraderError::invalid_config(
            "bollinger_stddev",
            "bollinger_stddev must be positive",
        ));
    }
    positive_period("macd_fast", params.macd_fast)?;
    positive_period("macd_slow", params.macd_slow)?;
    positive_period("macd_signal", params.macd_signal)?;
    if params.macd_fast >= params.macd_slow {
        return Err(SigtraderError::invalid_config(
            "macd_fast",
            "macd_fast must be shorter than macd_slow",
        ));
    }
    Ok(())
}

fn positive_period(key: &str, period: usize) -> Result<(), SigtraderError> {
    if period == 0 {
        return Err(SigtraderError::invalid_config(
            key,
            format!("{key} must be positive"),
        ));
    }
    Ok(())
}

fn validate_signal_params(
    params: &SignalParams,
    indicators: &IndicatorParams,
) -> Result<(), SigtraderError> {
    if params.active_rules.is_empty() {
        return Err(SigtraderError::invalid_config(
            "active_rules",
            "at least one signal rule must be active",
        ));
    }
    if params.active_rules.contains(&SignalRule::SmaCross) && indicators.sma_periods.len() < 2 {
        return Err(SigtraderError::invalid_config(
            "sma_periods",
            "sma_cross needs a short and a long period",
        ));
    }
    if params.active_rules.contains(&SignalRule::EmaCross) && indicators.ema_periods.len() < 2 {
        return Err(SigtraderError::invalid_config(
            "ema_periods",
            "ema_cross needs a short and a long period",
        ));
    }

    unit_range("buy_threshold", params.buy_threshold)?;
    unit_range("sell_threshold", params.sell_threshold)?;
    if params.sell_threshold >= params.buy_threshold {
        return Err(SigtraderError::invalid_config(
            "sell_threshold",
            "sell_threshold must be below buy_threshold",
        ));
    }

    percent_range("rsi_overbought", params.rsi_overbought)?;
    percent_range("rsi_oversold", params.rsi_oversold)?;
    if params.rsi_oversold >= params.rsi_overbought {
        return Err(SigtraderError::invalid_config(
            "rsi_oversold",
            "rsi_oversold must be below rsi_overbought",
        ));
    }
    Ok(())
}

fn unit_range(key: &str, value: f64) -> Result<(), SigtraderError> {
    if !(-1.0..=1.0).contains(&value) {
        return Err(SigtraderError::invalid_config(
            key,
            format!("{key} must be between -1 and 1"),
        ));
    }
    Ok(())
}

fn percent_range(key: &str, value: f64) -> Result<(), SigtraderError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(SigtraderError::invalid_config(
            key,
            format!("{key} must be between 0 and 100"),
        ));
    }
    Ok(())
}

fn validate_backtest_params(config: &PipelineConfig) -> Result<(), SigtraderError> {
    let bt = &config.backtest;
    if !bt.trade_size.is_finite() || bt.trade_size <= 0.0 {
        return Err(SigtraderError::invalid_config(
            "trade_size",
            "trade_size must be positive",
        ));
    }
    if !(0.0..1.0).contains(&bt.fee_rate) {
        return Err(SigtraderError::invalid_config(
            "fee_rate",
            "fee_rate must be in [0, 1)",
        ));
    }
    if !bt.initial_balance.is_finite() || bt.initial_balance <= 0.0 {
        return Err(SigtraderError::invalid_config(
            "initial_balance",
            "initial_balance must be positive",
        ));
    }
    Ok(())
}

fn validate_annualization(factor: f64) -> Result<(), SigtraderError> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(SigtraderError::invalid_config(
            "sharpe_annualization_factor",
            "sharpe_annualization_factor must be positive",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest::BalanceCheckPolicy;

    fn valid() -> PipelineConfig {
        PipelineConfig::new(BalanceCheckPolicy::Strict, 8760.0)
    }

    fn rejected_key(config: &PipelineConfig) -> String {
        match validate_pipeline_config(config) {
            Err(SigtraderError::InvalidConfiguration { key, .. }) => key,
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate_pipeline_config(&valid()).is_ok());
    }

    #[test]
    fn zero_sma_period_rejected() {
        let mut c = valid();
        c.indicators.sma_periods = vec![0, 50];
        assert_eq!(rejected_key(&c), "sma_periods");
    }

    #[test]
    fn zero_rsi_period_rejected() {
        let mut c = valid();
        c.indicators.rsi_period = 0;
        assert_eq!(rejected_key(&c), "rsi_period");
    }

    #[test]
    fn bollinger_period_one_rejected() {
        let mut c = valid();
        c.indicators.bollinger_period = 1;
        assert_eq!(rejected_key(&c), "bollinger_period");
    }

    #[test]
    fn macd_fast_not_below_slow_rejected() {
        let mut c = valid();
        c.indicators.macd_fast = 26;
        assert_eq!(rejected_key(&c), "macd_fast");
    }

    #[test]
    fn threshold_outside_unit_range_rejected() {
        let mut c = valid();
        c.signals.buy_threshold = 1.5;
        assert_eq!(rejected_key(&c), "buy_threshold");

        let mut c = valid();
        c.signals.sell_threshold = -1.01;
        assert_eq!(rejected_key(&c), "sell_threshold");
    }

    #[test]
    fn thresholds_at_unit_bounds_accepted() {
        let mut c = valid();
        c.signals.buy_threshold = 1.0;
        c.signals.sell_threshold = -1.0;
        assert!(validate_pipeline_config(&c).is_ok());
    }

    #[test]
    fn crossed_thresholds_rejected() {
        let mut c = valid();
        c.signals.buy_threshold = -0.5;
        c.signals.sell_threshold = 0.5;
        assert_eq!(rejected_key(&c), "sell_threshold");
    }

    #[test]
    fn rsi_bounds_rejected() {
        let mut c = valid();
        c.signals.rsi_overbought = 120.0;
        assert_eq!(rejected_key(&c), "rsi_overbought");

        let mut c = valid();
        c.signals.rsi_oversold = 80.0;
        assert_eq!(rejected_key(&c), "rsi_oversold");
    }

    #[test]
    fn no_active_rules_rejected() {
        let mut c = valid();
        c.signals.active_rules.clear();
        assert_eq!(rejected_key(&c), "active_rules");
    }

    #[test]
    fn sma_cross_without_two_periods_rejected() {
        let mut c = valid();
        c.indicators.sma_periods = vec![20];
        assert_eq!(rejected_key(&c), "sma_periods");
    }

    #[test]
    fn single_sma_period_fine_when_rule_inactive() {
        let mut c = valid();
        c.indicators.sma_periods = vec![20];
        c.signals.active_rules.remove(&SignalRule::SmaCross);
        assert!(validate_pipeline_config(&c).is_ok());
    }

    #[test]
    fn fee_rate_of_one_rejected() {
        let mut c = valid();
        c.backtest.fee_rate = 1.0;
        assert_eq!(rejected_key(&c), "fee_rate");
    }

    #[test]
    fn negative_fee_rate_rejected() {
        let mut c = valid();
        c.backtest.fee_rate = -0.01;
        assert_eq!(rejected_key(&c), "fee_rate");
    }

    #[test]
    fn non_positive_trade_size_rejected() {
        let mut c = valid();
        c.backtest.trade_size = 0.0;
        assert_eq!(rejected_key(&c), "trade_size");
    }

    #[test]
    fn non_positive_initial_balance_rejected() {
        let mut c = valid();
        c.backtest.initial_balance = -5.0;
        assert_eq!(rejected_key(&c), "initial_balance");
    }

    #[test]
    fn zero_annualization_rejected() {
        let mut c = valid();
        c.sharpe_annualization_factor = 0.0;
        assert_eq!(rejected_key(&c), "sharpe_annualization_factor");
    }
}
