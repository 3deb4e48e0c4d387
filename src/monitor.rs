use crate::alerts::AlertEngine;
use crate::api::PriceSource;
use crate::config::MonitorSettings;
use crate::model::PriceSample;
use crate::ui::format::{format_change, format_price};
use crate::ui::{CommandSource, OutputSink};
use chrono::Local;
use log::{debug, info, warn};
use std::time::Duration;

/// What a line of user input asks the monitor to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Keep,
    Switch(String),
}

impl Command {
    pub fn parse(line: &str, exit_keyword: &str) -> Self {
        let line = line.trim();
        if line.eq_ignore_ascii_case(exit_keyword.trim()) {
            Command::Exit
        } else if line.is_empty() {
            Command::Keep
        } else {
            Command::Switch(line.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingInput,
    Sampling,
    Terminated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorState {
    pub current_symbol: String,
    pub previous_sample: Option<PriceSample>,
}

/// Absolute and percentage change between two samples of the same asset.
pub fn price_change(previous: &PriceSample, current: &PriceSample) -> Option<(f64, f64)> {
    if previous.symbol() != current.symbol() {
        return None;
    }
    let change = current.price() - previous.price();
    Some((change, change / previous.price() * 100.0))
}

fn change_line(change: f64, percent: f64) -> String {
    let (color, arrow) = if change >= 0.0 { ("🟢", "📈") } else { ("🔴", "📉") };
    format!("{} {} Change: ${:.2} ({})", color, arrow, change, format_change(percent))
}

/// Prompts for a symbol, samples its price, runs the alert rules and waits,
/// until the exit keyword is entered or the input closes.
pub struct MonitorLoop<S, C, O> {
    source: S,
    commands: Option<C>,
    output: O,
    engine: AlertEngine,
    interval: Duration,
    backoff: Duration,
    exit_keyword: String,
    state: MonitorState,
    phase: Phase,
}

impl<S, C, O> MonitorLoop<S, C, O>
where
    S: PriceSource,
    C: CommandSource,
    O: OutputSink,
{
    pub fn new(
        source: S,
        commands: C,
        output: O,
        engine: AlertEngine,
        settings: &MonitorSettings,
        default_symbol: &str,
    ) -> Self {
        Self {
            source,
            commands: Some(commands),
            output,
            engine,
            interval: settings.interval(),
            backoff: settings.backoff(),
            exit_keyword: settings.exit_keyword.clone(),
            state: MonitorState {
                current_symbol: default_symbol.trim().to_string(),
                previous_sample: None,
            },
            phase: Phase::AwaitingInput,
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub async fn run(&mut self) {
        self.output.emit("🚀 Crypto Monitor Started");
        self.output.emit(&format!(
            "Type \"{}\" to exit, or press Enter to continue monitoring",
            self.exit_keyword
        ));

        loop {
            match self.phase {
                Phase::AwaitingInput => {
                    let command = self.next_command().await;
                    self.apply(command);
                }
                Phase::Sampling => {
                    let delay = self.sample_once().await;
                    self.phase = Phase::AwaitingInput;
                    tokio::time::sleep(delay).await;
                }
                Phase::Terminated => break,
            }
        }

        // Release stdin before reporting shutdown.
        self.commands.take();
        info!("Monitor stopped on {}", self.state.current_symbol);
        self.output.emit("👋 Crypto Monitor stopped");
    }

    async fn next_command(&mut self) -> Command {
        let commands = match self.commands.as_mut() {
            Some(commands) => commands,
            None => return Command::Exit,
        };

        let prompt = format!(
            "Enter cryptocurrency symbol (current: {}): ",
            self.state.current_symbol
        );
        match commands.next_line(&prompt).await {
            Ok(Some(line)) => Command::parse(&line, &self.exit_keyword),
            Ok(None) => {
                info!("Input closed");
                Command::Exit
            }
            Err(e) => {
                warn!("Failed to read input: {}", e);
                self.output.emit(&format!("❌ Error reading input: {}", e));
                Command::Exit
            }
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Exit => self.phase = Phase::Terminated,
            Command::Keep => self.phase = Phase::Sampling,
            Command::Switch(symbol) => {
                info!("Switching from {} to {}", self.state.current_symbol, symbol);
                self.state.current_symbol = symbol;
                self.state.previous_sample = None;
                self.phase = Phase::Sampling;
            }
        }
    }

    /// One fetch, display and alert pass. Returns how long to wait before
    /// prompting again.
    async fn sample_once(&mut self) -> Duration {
        let symbol = self.state.current_symbol.clone();
        debug!("Fetching price for {}", symbol);

        let sample = match self.source.fetch_price(&symbol).await {
            Ok(sample) => sample,
            Err(e) => {
                warn!("Fetch failed for {}: {}", symbol, e);
                self.output
                    .emit(&format!("❌ Failed to get price for {}: {}", symbol, e));
                return self.backoff;
            }
        };

        self.output.emit(&format!(
            "💰 {} ({}): {}",
            sample.display_name(),
            sample.symbol(),
            format_price(sample.price())
        ));
        self.output.emit(&format!(
            "⏰ {}",
            sample.observed_at().with_timezone(&Local).format("%H:%M:%S")
        ));

        if let Some((change, percent)) = self
            .state
            .previous_sample
            .as_ref()
            .and_then(|previous| price_change(previous, &sample))
        {
            self.output.emit(&change_line(change, percent));
        }

        let report = self.engine.check_all(&sample);
        for message in &report.alerts {
            self.output.emit(&format!("🚨 {}", message));
        }
        for failure in &report.failures {
            self.output.emit(&format!("⚠️ {}", failure));
        }

        self.state.previous_sample = Some(sample);
        self.interval
    }
}
