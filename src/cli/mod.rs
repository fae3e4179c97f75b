//! # Command line
//!
//! Flags override values loaded from the config file.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{RunConfig, StrategyKind};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum StrategyArg {
    Sequential,
    Pool,
}

impl From<StrategyArg> for StrategyKind {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Sequential => StrategyKind::Sequential,
            StrategyArg::Pool => StrategyKind::Pool,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "contractman",
    version,
    about = "Run .http request definitions as contract tests against a live API"
)]
pub struct Cli {
    /// Config file (defaults to ./contractman.toml when present).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base API address.
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Request-definition file.
    #[arg(long, value_name = "PATH")]
    pub http_file: Option<PathBuf>,

    /// Report output directory.
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Per-request timeout in milliseconds.
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Worker count for the pool strategy.
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    #[arg(long)]
    pub no_color: bool,

    /// Debug logging.
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Warnings and errors only.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut RunConfig) {
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        if let Some(path) = &self.http_file {
            config.http_file = path.clone();
        }
        if let Some(dir) = &self.output {
            config.output_dir = dir.clone();
        }
        if let Some(ms) = self.timeout_ms {
            config.timeout_ms = ms;
        }
        if let Some(strategy) = self.strategy {
            config.execution.strategy = strategy.into();
        }
        if let Some(workers) = self.workers {
            config.execution.workers = workers;
        }
    }

    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "contractman=debug"
        } else if self.quiet {
            "contractman=warn"
        } else {
            "contractman=info"
        }
    }
}
