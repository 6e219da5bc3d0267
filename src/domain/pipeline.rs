//! End-to-end run: indicators → signals → backtest → metrics.

use tracing::info;

use crate::domain::backtest::{BacktestResult, BacktestSimulator};
use crate::domain::config::PipelineConfig;
use crate::domain::config_validation::validate_pipeline_config;
use crate::domain::error::SigtraderError;
use crate::domain::indicator::{IndicatorEngine, IndicatorSet};
use crate::domain::metrics::{PerformanceAnalyzer, PerformanceReport, TradeStats};
use crate::domain::ohlcv::Series;
use crate::domain::signal::{SignalEngine, SignalSet};

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub indicators: IndicatorSet,
    pub signals: SignalSet,
    pub backtest: BacktestResult,
    pub report: PerformanceReport,
    pub trade_stats: TradeStats,
}

/// A validated configuration ready to run against any number of series.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, SigtraderError> {
        validate_pipeline_config(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run(&self, series: &Series) -> Result<PipelineOutput, SigtraderError> {
        info!(bars = series.len(), "pipeline started");

        let indicators = IndicatorEngine::new(self.config.indicators.clone()).compute(series);
        let signals = SignalEngine::new(self.config.signals.clone()).generate(series, &indicators);
        let backtest = BacktestSimulator::new(self.config.backtest.clone())
            .run(series, &signals.final_signal)?;
        let report = PerformanceAnalyzer::new(self.config.sharpe_annualization_factor)
            .analyze(&backtest.equity_curve);
        let trade_stats = TradeStats::compute(&backtest.trades);

        info!(
            total_return = report.total_return,
            max_drawdown = report.max_drawdown,
            sharpe_ratio = report.sharpe_ratio,
            "pipeline finished"
        );

        Ok(PipelineOutput {
            indicators,
            signals,
            backtest,
            report,
            trade_stats,
        })
    }
}
