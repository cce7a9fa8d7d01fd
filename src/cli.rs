//! CLI definition and dispatch.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_signal_writer::CsvSignalWriter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::allocation::allocate_weights;
use crate::domain::config_validation::{
    parse_carry_spans, parse_market_open, parse_start_date, validate_config,
};
use crate::domain::error::CarrytrendError;
use crate::domain::instrument::{Classification, ContractOffset, Instrument, InstrumentRegistry};
use crate::domain::replay::{replay, MarketHistory, ReplayOptions};
use crate::domain::signal::{PassReport, SignalEngine};
use crate::domain::strategy::StrategyConfig;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;
use crate::ports::signal_port::SignalSink;

#[derive(Parser, Debug)]
#[command(name = "carrytrend", about = "Futures carry and trend signal engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay market history and emit target position signals
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Overrides [universe] data_dir
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
        /// Signal CSV destination (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only emit the signals of the final pass
        #[arg(long)]
        latest: bool,
    },
    /// Validate a configuration and print the resolved parameters
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print classification-derived capital weights
    Weights {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "carrytrend=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Run {
            config,
            data_dir,
            output,
            latest,
        } => run_signals(&config, data_dir.as_deref(), output.as_deref(), latest),
        Command::Validate { config } => run_validate(&config),
        Command::Weights { config } => run_weights(&config),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, CarrytrendError> {
    tracing::info!(path = %path.display(), "loading config");
    let adapter = FileConfigAdapter::from_file(path)?;
    validate_config(&adapter)?;
    Ok(adapter)
}

pub fn build_strategy_config(config: &dyn ConfigPort) -> Result<StrategyConfig, CarrytrendError> {
    let defaults = StrategyConfig::default();
    Ok(StrategyConfig {
        emac_filters: non_negative(config, "emac_filters", defaults.emac_filters as i64)?,
        emac_min_exponent: non_negative(
            config,
            "emac_min_exponent",
            defaults.emac_min_exponent as i64,
        )?,
        carry_spans: parse_carry_spans(config)?,
        abs_forecast_cap: config.get_double(
            "strategy",
            "abs_forecast_cap",
            defaults.abs_forecast_cap,
        ),
        sigma_span: non_negative(config, "sigma_span", defaults.sigma_span as i64)?,
        blend_years: non_negative(config, "blend_years", defaults.blend_years as i64)?,
        long_run_vol_weight: config.get_double(
            "strategy",
            "long_run_vol_weight",
            defaults.long_run_vol_weight,
        ),
        target_risk: config.get_double("strategy", "target_risk", defaults.target_risk),
        idm: config.get_double("strategy", "idm", defaults.idm),
    })
}

fn non_negative<T: TryFrom<i64>>(
    config: &dyn ConfigPort,
    key: &str,
    default: i64,
) -> Result<T, CarrytrendError> {
    T::try_from(config.get_int("strategy", key, default)).map_err(|_| {
        CarrytrendError::ConfigInvalid {
            section: "strategy".into(),
            key: key.into(),
            reason: "value out of range".into(),
        }
    })
}

pub fn build_registry(config: &dyn ConfigPort) -> Result<InstrumentRegistry, CarrytrendError> {
    let symbols = config
        .get_list("universe", "instruments")
        .ok_or_else(|| CarrytrendError::ConfigMissing {
            section: "universe".into(),
            key: "instruments".into(),
        })?;

    symbols
        .into_iter()
        .map(|symbol| -> Result<Instrument, CarrytrendError> {
            let field = |key: &str| {
                config
                    .get_string(&symbol, key)
                    .map(|s| s.trim().to_string())
                    .ok_or_else(|| CarrytrendError::ConfigMissing {
                        section: symbol.clone(),
                        key: key.into(),
                    })
            };
            let classification = Classification::new(field("sector")?, field("group")?);
            let contract_offset = ContractOffset::from_index(config.get_int(
                &symbol,
                "contract_offset",
                0,
            ))
            .ok_or_else(|| CarrytrendError::ConfigInvalid {
                section: symbol.clone(),
                key: "contract_offset".into(),
                reason: "contract_offset must be 0 or 1".into(),
            })?;
            let multiplier = config.get_double(&symbol, "multiplier", 0.0);
            Ok(Instrument {
                symbol,
                classification,
                contract_offset,
                multiplier,
            })
        })
        .collect()
}

pub fn portfolio_value(config: &dyn ConfigPort) -> f64 {
    config.get_double("portfolio", "total_value", 0.0)
}

pub fn resolve_data_dir(
    data_dir_override: Option<&Path>,
    config: &dyn ConfigPort,
) -> Result<PathBuf, CarrytrendError> {
    match data_dir_override {
        Some(dir) => Ok(dir.to_path_buf()),
        None => config
            .get_string("universe", "data_dir")
            .map(PathBuf::from)
            .ok_or_else(|| CarrytrendError::ConfigMissing {
                section: "universe".into(),
                key: "data_dir".into(),
            }),
    }
}

/// Signal expiry: one second before the market opens on the next weekday.
pub fn valid_until(date: NaiveDate, market_open: NaiveTime) -> NaiveDateTime {
    let mut next = date + Duration::days(1);
    while matches!(next.weekday(), Weekday::Sat | Weekday::Sun) {
        next += Duration::days(1);
    }
    next.and_time(market_open) - Duration::seconds(1)
}

/// Fetch every registered instrument's bars. Instruments whose data cannot
/// be read are skipped with a warning.
pub fn load_market_history(
    data_port: &dyn MarketDataPort,
    registry: &InstrumentRegistry,
) -> Result<MarketHistory, CarrytrendError> {
    let mut history = MarketHistory::new();
    for symbol in registry.symbols() {
        match data_port.fetch_daily(&symbol, NaiveDate::MIN, NaiveDate::MAX) {
            Ok(bars) if bars.is_empty() => {
                tracing::warn!(%symbol, "no market data, skipping");
            }
            Ok(bars) => {
                tracing::info!(%symbol, bars = bars.len(), "loaded market data");
                history.insert(&symbol, bars);
            }
            Err(e) => {
                tracing::warn!(%symbol, error = %e, "skipping instrument");
            }
        }
    }

    if history.bar_count() == 0 {
        return Err(CarrytrendError::NoData {
            symbol: registry.symbols().join(","),
        });
    }
    Ok(history)
}

/// Registered instruments the data source has no series for.
pub fn missing_instruments(
    data_port: &dyn MarketDataPort,
    registry: &InstrumentRegistry,
) -> Result<Vec<String>, CarrytrendError> {
    let available = data_port.list_instruments()?;
    Ok(registry
        .symbols()
        .into_iter()
        .filter(|symbol| !available.contains(symbol))
        .collect())
}

/// Replay history through a fresh engine and write the resulting signals.
pub fn run_signal_pipeline(
    data_port: &dyn MarketDataPort,
    config: &dyn ConfigPort,
    sink: &mut dyn SignalSink,
    latest_only: bool,
) -> Result<Vec<PassReport>, CarrytrendError> {
    let strategy = build_strategy_config(config)?;
    let registry = build_registry(config)?;
    let options = ReplayOptions {
        portfolio_value: portfolio_value(config),
        start_date: parse_start_date(config)?,
    };
    let market_open = parse_market_open(config)?;

    let history = load_market_history(data_port, &registry)?;
    let mut engine = SignalEngine::new(strategy);
    let mut reports = replay(&mut engine, &registry, &history, &options, |date| {
        valid_until(date, market_open)
    })?;

    if latest_only && reports.len() > 1 {
        reports.drain(..reports.len() - 1);
    }

    sink.write_reports(&reports)?;

    let signal_count: usize = reports.iter().map(|r| r.signals.len()).sum();
    tracing::info!(passes = reports.len(), signals = signal_count, "replay complete");
    Ok(reports)
}

fn run_signals(
    config_path: &Path,
    data_dir: Option<&Path>,
    output_path: Option<&Path>,
    latest: bool,
) -> Result<(), CarrytrendError> {
    let adapter = load_config(config_path)?;
    let data_port = CsvAdapter::new(resolve_data_dir(data_dir, &adapter)?);

    match output_path {
        Some(path) => {
            let mut sink = CsvSignalWriter::new(BufWriter::new(File::create(path)?));
            run_signal_pipeline(&data_port, &adapter, &mut sink, latest)?;
            sink.into_inner()?.flush()?;
            tracing::info!(path = %path.display(), "signals written");
        }
        None => {
            let mut sink = CsvSignalWriter::new(io::stdout().lock());
            run_signal_pipeline(&data_port, &adapter, &mut sink, latest)?;
        }
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), CarrytrendError> {
    let adapter = load_config(config_path)?;
    let strategy = build_strategy_config(&adapter)?;
    let registry = build_registry(&adapter)?;

    println!("Configuration OK: {}", config_path.display());
    println!("  trend spans:        {:?}", strategy.fast_spans());
    println!("  carry spans:        {:?}", strategy.carry_spans);
    println!("  rule count:         {}", strategy.max_rule_count());
    println!("  forecast cap:       {}", strategy.abs_forecast_cap);
    println!("  sigma span:         {}", strategy.sigma_span);
    println!("  lookback days:      {}", strategy.lookback_days());
    println!("  long-run weight:    {}", strategy.long_run_vol_weight);
    println!("  target risk:        {}", strategy.target_risk);
    println!("  idm:                {}", strategy.idm);
    println!("  portfolio value:    {}", portfolio_value(&adapter));
    println!("  instruments:        {}", registry.symbols().join(","));

    if let Some(dir) = adapter.get_string("universe", "data_dir") {
        let missing = missing_instruments(&CsvAdapter::new(PathBuf::from(dir)), &registry)?;
        if missing.is_empty() {
            println!("  market data:        all instruments present");
        } else {
            println!("  missing data:       {}", missing.join(","));
        }
    }
    Ok(())
}

fn run_weights(config_path: &Path) -> Result<(), CarrytrendError> {
    let adapter = load_config(config_path)?;
    let registry = build_registry(&adapter)?;
    let weights = allocate_weights(
        registry
            .iter()
            .map(|i| (i.symbol.as_str(), &i.classification)),
    );

    println!("{:<10} {:<14} {:<14} {:>8}", "symbol", "sector", "group", "weight");
    for instrument in registry.iter() {
        let weight = weights.get(&instrument.symbol).copied().unwrap_or(0.0);
        println!(
            "{:<10} {:<14} {:<14} {:>8.4}",
            instrument.symbol,
            instrument.classification.sector,
            instrument.classification.group,
            weight
        );
    }
    Ok(())
}
