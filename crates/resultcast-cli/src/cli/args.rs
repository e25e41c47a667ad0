use clap::{Args, Parser, Subcommand, ValueEnum};
use resultcast_core::{ConfigError, SenderConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "resultcast",
    version,
    about = "Stream test-run results to a remote listener over TCP, and listen for them"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Accept result events and print one line per event
    Listen(ListenArgs),
    /// Check whether a listener is reachable
    Ping(PingArgs),
    /// Replay a recorded run (JSON list of test outcomes) to a listener
    Report(ReportArgs),
    Version,
}

#[derive(Args, Debug, Clone)]
pub struct ListenArgs {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1:7412")]
    pub bind: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Exit after this many events. If omitted, runs until killed.
    #[arg(long)]
    pub count: Option<usize>,

    /// Drop a connection that has not delivered its event within this time
    #[arg(long)]
    pub read_timeout: Option<humantime::Duration>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Destination flags shared by every sending command.
///
/// Precedence: defaults, then `--config`, then `RESULTCAST_*` env, then flags.
#[derive(Args, Debug, Clone, Default)]
pub struct SenderArgs {
    /// YAML file with `host`, `port` and `connect_timeout_ms`
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    /// Connect deadline per event (e.g. "5s", "250ms")
    #[arg(long)]
    pub timeout: Option<humantime::Duration>,
}

impl SenderArgs {
    pub fn resolve(&self) -> Result<SenderConfig, ConfigError> {
        let mut cfg = match &self.config {
            Some(path) => SenderConfig::load(path)?,
            None => SenderConfig::default(),
        };
        cfg.apply_env_overrides()?;
        if let Some(host) = &self.host {
            cfg.host = host.clone();
        }
        if let Some(port) = self.port {
            cfg.port = port;
        }
        if let Some(timeout) = self.timeout {
            cfg = cfg.with_timeout(timeout.into());
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Args, Debug, Clone)]
pub struct PingArgs {
    #[command(flatten)]
    pub sender: SenderArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// JSON file holding the finished test outcomes, in execution order
    #[arg(long)]
    pub results: PathBuf,

    /// Platform name announced in the run-started event
    #[arg(long, default_value = "cli")]
    pub platform: String,

    /// Stop after N tests and report the run as interrupted
    #[arg(long)]
    pub interrupt_after: Option<usize>,

    #[command(flatten)]
    pub sender: SenderArgs,
}
