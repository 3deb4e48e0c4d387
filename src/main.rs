mod alerts;
mod api;
mod config;
mod error;
mod model;
mod monitor;
mod ui;

use alerts::AlertEngine;
use api::binance::BinanceTickerSource;
use config::Config;
use env_logger::Builder;
use log::{error, info, LevelFilter};
use monitor::MonitorLoop;
use std::error::Error;
use std::io::Write;
use ui::{StdinCommands, StdoutSink};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("pricewatch", LevelFilter::Debug)
        .parse_default_env()
        .format(|buf, record| {
            let ts = chrono::Local::now().format("%H:%M:%S%.3f");
            writeln!(
                buf,
                "[{} {:<5} {}] {}",
                ts,
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr) // Keep logs off the console output
        .init();

    let config_path = config::resolve_path(std::env::args().nth(1));
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Cannot start with {}: {}", config_path, e);
            return Err(e.into());
        }
    };

    info!(
        "Starting price monitor for {} (sell >= {}, buy <= {}, variation {}% over {} min)",
        config.default_currency,
        config.alert_strategies.threshold.sell_threshold,
        config.alert_strategies.threshold.buy_threshold,
        config.alert_strategies.variation.percentage_threshold,
        config.alert_strategies.variation.time_window_minutes
    );

    let engine = AlertEngine::from_config(&config.alert_strategies);
    info!("Registered {} alert rules", engine.len());

    let mut monitor = MonitorLoop::new(
        BinanceTickerSource::new(&config.source),
        StdinCommands::new(),
        StdoutSink,
        engine,
        &config.monitor,
        &config.default_currency,
    );

    tokio::select! {
        _ = monitor.run() => {},
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, stopping monitor");
        },
    };

    info!(
        "Shutdown complete (last symbol: {})",
        monitor.state().current_symbol
    );
    Ok(())
}
