//! JobScout CLI
//!
//! Command-line front end for the JobScout API: upload a résumé, search
//! for jobs, generate an application kit and auto-fill application forms.
//!
//! State (uploaded résumé, last search, selected job, kit) is kept in a
//! JSON file between invocations.

mod commands;
mod config;
mod progress;
mod render;
mod store;
mod types;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use jobscout_client::Endpoints;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "jobscout")]
#[command(about = "JobScout job search and application CLI", long_about = None)]
struct Cli {
    /// API base URL
    #[arg(
        long,
        global = true,
        env = "JOBSCOUT_API_URL",
        default_value = "http://localhost:3000"
    )]
    api_url: String,

    /// File the client state is kept in between runs
    #[arg(
        long,
        global = true,
        env = "JOBSCOUT_STATE_FILE",
        default_value = ".jobscout/state.json"
    )]
    state_file: PathBuf,

    /// Delay between task status checks, in milliseconds
    #[arg(long, global = true, env = "JOBSCOUT_POLL_INTERVAL_MS", default_value_t = 3000)]
    poll_interval_ms: u64,

    /// Status checks before a task is reported as timed out
    #[arg(long, global = true, env = "JOBSCOUT_MAX_ATTEMPTS", default_value_t = 200)]
    max_attempts: u32,

    /// Timeout of a single HTTP request, in seconds
    #[arg(
        long,
        global = true,
        env = "JOBSCOUT_REQUEST_TIMEOUT_SECS",
        default_value_t = 30
    )]
    request_timeout_secs: u64,

    /// Log requests and status checks to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "jobscout_cli=debug,jobscout_client=debug"
    } else {
        "jobscout_cli=warn,jobscout_client=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config {
        api_url: cli.api_url,
        state_file: cli.state_file,
        poll_interval: Duration::from_millis(cli.poll_interval_ms),
        max_attempts: cli.max_attempts,
        request_timeout: Duration::from_secs(cli.request_timeout_secs),
        endpoints: Endpoints::from_env(),
    };
    config.validate()?;

    handle_command(cli.command, &config).await
}
