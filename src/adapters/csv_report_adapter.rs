//! File report adapter implementing ReportPort.
//!
//! Writes one directory per run:
//! `trades.csv`, `equity.csv`, `signals.csv`, `indicators.csv` and `report.json`.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::backtest::PositionState;
use crate::domain::error::SigtraderError;
use crate::domain::indicator::IndicatorValue;
use crate::domain::metrics::{PerformanceReport, TradeStats};
use crate::domain::ohlcv::Series;
use crate::domain::pipeline::PipelineOutput;
use crate::ports::report_port::ReportPort;

#[derive(Serialize)]
struct SignalRow {
    timestamp: NaiveDateTime,
    close: f64,
    sma_cross: i8,
    ema_cross: i8,
    rsi: i8,
    bollinger: i8,
    combined: f64,
    #[serde(rename = "final")]
    final_signal: i8,
}

#[derive(Serialize)]
struct RunSummary<'a> {
    bars: usize,
    first_timestamp: Option<NaiveDateTime>,
    last_timestamp: Option<NaiveDateTime>,
    trades: usize,
    rejected_buys: usize,
    final_state: PositionState,
    final_equity: Option<f64>,
    report: &'a PerformanceReport,
    trade_stats: &'a TradeStats,
}

pub struct CsvReportAdapter {
    dir: PathBuf,
}

impl CsvReportAdapter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

fn write_rows<T: Serialize>(
    path: &Path,
    rows: impl IntoIterator<Item = T>,
) -> Result<(), SigtraderError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn format_value(value: IndicatorValue) -> String {
    match value {
        IndicatorValue::Defined(v) => v.to_string(),
        IndicatorValue::Undefined => String::new(),
    }
}

fn write_indicators(
    path: &Path,
    series: &Series,
    output: &PipelineOutput,
) -> Result<(), SigtraderError> {
    let columns = output.indicators.columns();
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["timestamp".to_string()];
    header.extend(columns.iter().map(|(name, _)| name.clone()));
    wtr.write_record(&header)?;

    for (i, bar) in series.bars().iter().enumerate() {
        let mut record = Vec::with_capacity(columns.len() + 1);
        record.push(bar.timestamp.to_string());
        record.extend(columns.iter().map(|(_, values)| format_value(values[i])));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, series: &Series, output: &PipelineOutput) -> Result<(), SigtraderError> {
        fs::create_dir_all(&self.dir)?;

        write_rows(&self.path("trades.csv"), &output.backtest.trades)?;
        write_rows(&self.path("equity.csv"), &output.backtest.equity_curve)?;

        let signals = &output.signals;
        write_rows(
            &self.path("signals.csv"),
            series.bars().iter().enumerate().map(|(i, bar)| SignalRow {
                timestamp: bar.timestamp,
                close: bar.close,
                sma_cross: signals.sma_cross[i],
                ema_cross: signals.ema_cross[i],
                rsi: signals.rsi[i],
                bollinger: signals.bollinger[i],
                combined: signals.combined[i],
                final_signal: signals.final_signal[i],
            }),
        )?;

        write_indicators(&self.path("indicators.csv"), series, output)?;

        let summary = RunSummary {
            bars: series.len(),
            first_timestamp: series.bars().first().map(|b| b.timestamp),
            last_timestamp: series.last().map(|b| b.timestamp),
            trades: output.backtest.trades.len(),
            rejected_buys: output.backtest.rejected_buys,
            final_state: output.backtest.final_state,
            final_equity: output.backtest.equity_curve.last().map(|p| p.equity),
            report: &output.report,
            trade_stats: &output.trade_stats,
        };
        let file = BufWriter::new(File::create(self.path("report.json"))?);
        serde_json::to_writer_pretty(file, &summary)?;

        info!(dir = %self.dir.display(), "report written");
        Ok(())
    }
}
