use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use colored::control::set_override as set_color_override;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use contractman::cli::Cli;
use contractman::config::RunConfig;
use contractman::error::RunError;
use contractman::parser::load_file;
use contractman::report::render_console;
use contractman::storage::write_reports;
use contractman::testing::RunSummary;
use contractman::testing::runner::run;
use contractman::testing::validator::ContractValidator;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| cli.log_filter().to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        set_color_override(false);
    }

    match execute(&cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the run counts as a success.
async fn execute(cli: &Cli) -> Result<bool, RunError> {
    let mut config = RunConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;

    let document = load_file(&config.http_file, &config.parser_options())?;
    if document.cases.is_empty() {
        warn!(file = %config.http_file.display(), "no test cases found");
        println!("No tests found in {}", config.http_file.display());
        return Ok(false);
    }

    info!(
        api_url = %config.api_url,
        cases = document.cases.len(),
        strategy = ?config.strategy(),
        "starting contract tests"
    );
    let validator = Arc::new(ContractValidator::new(&config.api_url, config.timeout())?);
    let results = run(validator, Arc::new(document.cases), config.strategy()).await?;

    write_reports(&config.output_dir, &results, &config.reports.formats)?;
    print!("{}", render_console(&results));

    Ok(RunSummary::from_results(&results).all_passed())
}
