//! # Run configuration
//!
//! Loaded from TOML (`contractman.toml` in the working directory, or an
//! explicit `--config` path) and then overridden by command-line flags.
//!
//! ```toml
//! api_url = "http://localhost:5225"
//! http_file = "TestFiles/endpoints.http"
//! output_dir = "Reports"
//! timeout_ms = 100000
//!
//! [execution]
//! strategy = "sequential"
//! workers = 4
//!
//! [parser]
//! section_headers = ["SEGAPI", "Use REST"]
//!
//! [reports]
//! formats = ["html", "json", "text"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::RunError;
use crate::parser::ParserOptions;
use crate::report::ReportFormat;
use crate::testing::runner::ExecutionStrategy;

pub const DEFAULT_CONFIG_FILE: &str = "contractman.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_http_file")]
    pub http_file: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub reports: ReportsConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    Sequential,
    Pool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExecutionConfig {
    #[serde(default)]
    pub strategy: StrategyKind,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ParserConfig {
    #[serde(default = "default_section_headers")]
    pub section_headers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ReportsConfig {
    #[serde(default = "default_report_formats")]
    pub formats: Vec<ReportFormat>,
}

fn default_api_url() -> String {
    "http://localhost:5225".to_string()
}

fn default_http_file() -> PathBuf {
    PathBuf::from("TestFiles/endpoints.http")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("Reports")
}

fn default_timeout_ms() -> u64 {
    100_000
}

fn default_workers() -> usize {
    4
}

fn default_section_headers() -> Vec<String> {
    ParserOptions::default().section_headers
}

fn default_report_formats() -> Vec<ReportFormat> {
    vec![ReportFormat::Html, ReportFormat::Json, ReportFormat::Text]
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            workers: default_workers(),
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            section_headers: default_section_headers(),
        }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            formats: default_report_formats(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            http_file: default_http_file(),
            output_dir: default_output_dir(),
            timeout_ms: default_timeout_ms(),
            execution: ExecutionConfig::default(),
            parser: ParserConfig::default(),
            reports: ReportsConfig::default(),
        }
    }
}

impl RunConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, RunError> {
        let config: RunConfig = toml::from_str(raw).map_err(|err| RunError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit config file, or `contractman.toml` from the working
    /// directory when it exists, or fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, RunError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !candidate.exists() {
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let raw = fs::read_to_string(&path).map_err(|err| {
            RunError::Config(format!("failed to read `{}`: {err}", path.display()))
        })?;
        let config: RunConfig = toml::from_str(&raw)
            .map_err(|err| RunError::Config(format!("`{}`: {err}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RunError> {
        if self.api_url.trim().is_empty() {
            return Err(RunError::Config("api_url must not be empty".to_string()));
        }
        if self.timeout_ms == 0 {
            return Err(RunError::Config("timeout_ms must be greater than 0".to_string()));
        }
        if self.execution.workers == 0 {
            return Err(RunError::Config(
                "execution.workers must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            section_headers: self.parser.section_headers.clone(),
        }
    }

    pub fn strategy(&self) -> ExecutionStrategy {
        match self.execution.strategy {
            StrategyKind::Sequential => ExecutionStrategy::Sequential,
            StrategyKind::Pool => ExecutionStrategy::Pool {
                workers: self.execution.workers,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = RunConfig::from_toml_str("").unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.api_url, "http://localhost:5225");
        assert_eq!(config.timeout(), Duration::from_secs(100));
        assert_eq!(config.strategy(), ExecutionStrategy::Sequential);
        assert_eq!(config.reports.formats.len(), 3);
    }

    #[test]
    fn parses_full_file() {
        let config = RunConfig::from_toml_str(
            r#"
api_url = "https://staging.example.com"
http_file = "tests/api.http"
output_dir = "out"
timeout_ms = 2500

[execution]
strategy = "pool"
workers = 8

[parser]
section_headers = ["Billing API"]

[reports]
formats = ["json"]
"#,
        )
        .unwrap();

        assert_eq!(config.api_url, "https://staging.example.com");
        assert_eq!(config.http_file, PathBuf::from("tests/api.http"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.timeout(), Duration::from_millis(2500));
        assert_eq!(config.strategy(), ExecutionStrategy::Pool { workers: 8 });
        assert_eq!(config.parser_options().section_headers, vec!["Billing API"]);
        assert_eq!(config.reports.formats, vec![ReportFormat::Json]);
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = RunConfig::from_toml_str("retries = 3").unwrap_err();
        assert!(matches!(err, RunError::Config(_)));
    }

    #[test]
    fn rejects_zero_timeout_and_workers() {
        assert!(RunConfig::from_toml_str("timeout_ms = 0").is_err());
        assert!(RunConfig::from_toml_str("[execution]\nworkers = 0").is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RunConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, RunError::Config(_)));
    }

    #[test]
    fn loads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contractman.toml");
        fs::write(&path, "api_url = \"http://127.0.0.1:9000\"\n").unwrap();

        let config = RunConfig::load(Some(&path)).unwrap();
        assert_eq!(config.api_url, "http://127.0.0.1:9000");
    }
}
