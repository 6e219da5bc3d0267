//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::{FileConfigAdapter, build_pipeline_config};
use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::Series;
use crate::domain::pipeline::{Pipeline, PipelineOutput};
use crate::domain::signal::summary::{LatestSignal, SignalSummary};
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

/// Environment variable that overrides `--log-level`.
pub const LOG_ENV: &str = "SIGTRADER_LOG";

#[derive(Parser, Debug)]
#[command(name = "sigtrader", about = "Technical-indicator signal generator and backtester")]
pub struct Cli {
    /// Default tracing filter when SIGTRADER_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run indicators, signals, backtest and metrics over a bar file
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: PathBuf,
        /// Directory for trades.csv, equity.csv, signals.csv, indicators.csv and report.json
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the latest signal and the signal distribution
    Signals {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn init_tracing(level: &str) -> Result<(), String> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| format!("invalid log filter '{level}': {e}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| e.to_string())
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            config,
            data,
            output,
        } => run_backtest(&config, &data, output.as_deref()),
        Command::Signals { config, data } => run_signals(&config, &data),
        Command::Validate { config } => run_validate(&config),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Load, parse and validate the INI file into a ready-to-run pipeline.
pub fn load_pipeline(path: &Path) -> Result<Pipeline, SigtraderError> {
    let adapter = FileConfigAdapter::from_file(path)?;
    Pipeline::new(build_pipeline_config(&adapter)?)
}

/// Run the full pipeline and, if `output` is given, write the report files.
pub fn execute_backtest(
    config_path: &Path,
    data_path: &Path,
    output: Option<&Path>,
) -> Result<(Series, PipelineOutput), SigtraderError> {
    // Stage 1: Load config
    let pipeline = load_pipeline(config_path)?;

    // Stage 2: Load bars
    let series = CsvAdapter::new(data_path.to_path_buf()).load_series()?;

    // Stage 3: Run
    let out = pipeline.run(&series)?;

    // Stage 4: Reports
    if let Some(dir) = output {
        CsvReportAdapter::new(dir.to_path_buf()).write(&series, &out)?;
    }
    Ok((series, out))
}

fn run_backtest(
    config_path: &Path,
    data_path: &Path,
    output: Option<&Path>,
) -> Result<(), SigtraderError> {
    eprintln!("Loading config from {}", config_path.display());
    eprintln!("Loading bars from {}", data_path.display());
    let (series, out) = execute_backtest(config_path, data_path, output)?;
    print_backtest_summary(&series, &out);
    if let Some(dir) = output {
        eprintln!("Reports written to {}", dir.display());
    }
    Ok(())
}

fn print_backtest_summary(series: &Series, out: &PipelineOutput) {
    let bt = &out.backtest;
    let stats = &out.trade_stats;
    eprintln!();
    eprintln!("=== Backtest ===");
    eprintln!("Bars:            {}", series.len());
    eprintln!("Trades:          {}", bt.trades.len());
    eprintln!("Rejected buys:   {}", bt.rejected_buys);
    if let Some(last) = bt.equity_curve.last() {
        eprintln!("Final equity:    {:.2}", last.equity);
    }
    eprintln!("Position:        {:?}", bt.final_state);
    eprintln!();
    eprintln!("=== Performance ===");
    eprintln!("Total return:    {:.2}%", out.report.total_return * 100.0);
    eprintln!("Max drawdown:    {:.2}%", out.report.max_drawdown * 100.0);
    eprintln!("Sharpe ratio:    {:.3}", out.report.sharpe_ratio);
    eprintln!("Round trips:     {}", stats.round_trips);
    eprintln!("Win rate:        {:.1}%", stats.win_rate * 100.0);
    eprintln!("Realized PnL:    {:.2}", stats.realized_pnl);
    eprintln!("Fees paid:       {:.2}", stats.total_fees);
}

fn run_signals(config_path: &Path, data_path: &Path) -> Result<(), SigtraderError> {
    let (series, out) = execute_backtest(config_path, data_path, None)?;
    let summary = SignalSummary::from_final(&out.signals.final_signal);

    match LatestSignal::from_set(&series, &out.signals) {
        Some(latest) => {
            eprintln!("Latest bar:      {}", latest.timestamp);
            eprintln!("Close:           {:.4}", latest.price);
            eprintln!("  SMA_CROSS      {:+}", latest.sma_cross);
            eprintln!("  EMA_CROSS      {:+}", latest.ema_cross);
            eprintln!("  RSI            {:+}", latest.rsi);
            eprintln!("  BOLLINGER      {:+}", latest.bollinger);
            eprintln!("  COMBINED       {:+.3}", latest.combined);
            eprintln!("Recommendation:  {}", latest.recommendation);
        }
        None => eprintln!("No bars; no signal"),
    }
    eprintln!();
    eprintln!(
        "Periods {}: buy {} ({:.1}%), sell {} ({:.1}%), hold {} ({:.1}%)",
        summary.total_periods,
        summary.buy_signals,
        summary.buy_percentage,
        summary.sell_signals,
        summary.sell_percentage,
        summary.hold_signals,
        summary.hold_percentage
    );
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), SigtraderError> {
    let pipeline = load_pipeline(config_path)?;
    let cfg = pipeline.config();
    eprintln!("Configuration OK: {}", config_path.display());
    eprintln!(
        "  rules: {}",
        cfg.signals
            .active_rules
            .iter()
            .map(|r| r.kind().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    eprintln!(
        "  thresholds: buy >= {}, sell <= {}",
        cfg.signals.buy_threshold, cfg.signals.sell_threshold
    );
    eprintln!("  balance check: {:?}", cfg.backtest.balance_check);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backtest_command() {
        let cli = Cli::try_parse_from([
            "sigtrader",
            "backtest",
            "--config",
            "c.ini",
            "--data",
            "bars.csv",
            "--output",
            "out",
        ])
        .unwrap();
        assert_eq!(cli.log_level, "info");
        match cli.command {
            Command::Backtest {
                config,
                data,
                output,
            } => {
                assert_eq!(config, PathBuf::from("c.ini"));
                assert_eq!(data, PathBuf::from("bars.csv"));
                assert_eq!(output, Some(PathBuf::from("out")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn log_level_is_global() {
        let cli =
            Cli::try_parse_from(["sigtrader", "validate", "-c", "c.ini", "--log-level", "debug"])
                .unwrap();
        assert_eq!(cli.log_level, "debug");
        assert!(matches!(cli.command, Command::Validate { .. }));
    }

    #[test]
    fn backtest_requires_data() {
        assert!(Cli::try_parse_from(["sigtrader", "backtest", "-c", "c.ini"]).is_err());
    }

    #[test]
    fn missing_config_maps_to_config_error() {
        let err = load_pipeline(Path::new("/nonexistent/sigtrader.ini")).unwrap_err();
        assert!(matches!(err, SigtraderError::ConfigParse { .. }));
        let code: ExitCode = (&err).into();
        assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::from(2)));
    }
}
