#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use sigtrader::domain::backtest::BalanceCheckPolicy;
use sigtrader::domain::config::PipelineConfig;
use sigtrader::domain::error::SigtraderError;
pub use sigtrader::domain::ohlcv::{PriceBar, Series};
use sigtrader::domain::pipeline::PipelineOutput;
use sigtrader::ports::data_port::DataPort;
use sigtrader::ports::report_port::ReportPort;
use std::cell::RefCell;
use std::io::Write;
use tempfile::NamedTempFile;

pub const SAMPLE_INI: &str = r#"
[indicators]
sma_periods = 3,5
ema_periods = 3,5
rsi_period = 3
bollinger_period = 4
bollinger_stddev = 2.0
macd_fast = 3
macd_slow = 6
macd_signal = 3

[signals]
active_rules = sma_cross,ema_cross,rsi,bollinger
buy_threshold = 0.25
sell_threshold = -0.25
rsi_overbought = 70
rsi_oversold = 30

[backtest]
initial_balance = 10000
trade_size = 1
fee_rate = 0.001
balance_check = strict

[metrics]
sharpe_annualization_factor = 252
"#;

pub fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn make_bar(index: usize, close: f64) -> PriceBar {
    PriceBar {
        timestamp: start() + Duration::hours(index as i64),
        open: close,
        high: close * 1.01,
        low: close * 0.99,
        close,
        volume: 1_000.0,
    }
}

pub fn make_series(closes: &[f64]) -> Series {
    Series::new(
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| make_bar(i, c))
            .collect(),
    )
    .unwrap()
}

/// Deterministic oscillating price path with enough swings to trigger trades.
pub fn wave_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            100.0 + 10.0 * (t / 4.0).sin() + 0.05 * t
        })
        .collect()
}

/// Short periods so small fixtures produce defined indicators.
pub fn sample_config() -> PipelineConfig {
    let mut c = PipelineConfig::new(BalanceCheckPolicy::Strict, 252.0);
    c.indicators.sma_periods = vec![3, 5];
    c.indicators.ema_periods = vec![3, 5];
    c.indicators.rsi_period = 3;
    c.indicators.bollinger_period = 4;
    c.indicators.macd_fast = 3;
    c.indicators.macd_slow = 6;
    c.indicators.macd_signal = 3;
    c.backtest.trade_size = 1.0;
    c
}

pub fn bars_csv(series: &Series) -> String {
    let mut out = String::from("timestamp,open,high,low,close,volume\n");
    for b in series.bars() {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.timestamp.format("%Y-%m-%d %H:%M:%S"),
            b.open,
            b.high,
            b.low,
            b.close,
            b.volume
        ));
    }
    out
}

pub fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

pub struct MockDataPort {
    pub series: Option<Series>,
}

impl MockDataPort {
    pub fn with_series(series: Series) -> Self {
        Self {
            series: Some(series),
        }
    }

    pub fn failing() -> Self {
        Self { series: None }
    }
}

impl DataPort for MockDataPort {
    fn load_series(&self) -> Result<Series, SigtraderError> {
        self.series.clone().ok_or_else(|| SigtraderError::DataSource {
            reason: "mock source unavailable".into(),
        })
    }
}

/// Records what was handed to it instead of touching disk.
pub struct MockReportPort {
    pub written: RefCell<Vec<(usize, usize)>>,
}

impl MockReportPort {
    pub fn new() -> Self {
        Self {
            written: RefCell::new(Vec::new()),
        }
    }
}

impl ReportPort for MockReportPort {
    fn write(&self, series: &Series, output: &PipelineOutput) -> Result<(), SigtraderError> {
        self.written
            .borrow_mut()
            .push((series.len(), output.backtest.trades.len()));
        Ok(())
    }
}
