mod cli;

use std::io;
use std::process::ExitCode;

use archbench_core::config::{load_config, ReportConfig};
use archbench_core::generate::{generate, RunRequest};
use archbench_core::ReportError;
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the summary.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("archbench: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ReportError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path).await?,
        None => ReportConfig::default(),
    };
    cli.apply_to(&mut config);

    let request = RunRequest {
        results_dir: cli.results_dir,
        summary_a: cli.summary_a,
        summary_b: cli.summary_b,
    };
    let mut stdout = io::stdout().lock();
    generate(&request, &config, Local::now().naive_local(), &mut stdout).await?;
    Ok(())
}
