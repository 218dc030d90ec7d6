//! Job command handlers
//!
//! Handles searching, listing saved jobs, and selecting a job from the
//! last search.

use anyhow::{Result, anyhow};
use clap::Subcommand;
use colored::*;
use jobscout_client::{ClientState, Flow};
use jobscout_client::flows::search::{DEFAULT_MAX_RESULTS, SearchRequest, run_search};
use jobscout_core::dto::job::ListJobsQuery;

use super::{hint_resume, save_result};
use crate::config::Config;
use crate::progress::ProgressLine;
use crate::render::{print_job_card, print_search_results};
use crate::store;
use crate::types::JobRef;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobsCommands {
    /// Search for jobs and wait for the results
    Search {
        /// Search query, e.g. "backend engineer"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Location filter
        #[arg(short, long, default_value = "")]
        location: String,

        /// Maximum number of results
        #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_RESULTS)]
        max_results: u32,
    },
    /// Show the results of the last search
    Show,
    /// List saved jobs
    List {
        /// Maximum number of jobs
        #[arg(short, long)]
        limit: Option<u32>,

        /// Only jobs in this stage (e.g. found, kit_generated)
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Select a job from the last search
    Select {
        /// Position in the last results, job ID, or unambiguous ID prefix
        job: String,
    },
}

/// Handle job commands
///
/// # Arguments
/// * `command` - The job command to execute
/// * `config` - The CLI configuration
pub async fn handle_jobs_command(command: JobsCommands, config: &Config) -> Result<()> {
    let state = store::load(&config.state_file)?;

    match command {
        JobsCommands::Search {
            query,
            location,
            max_results,
        } => {
            let request = SearchRequest::new(query.join(" "))
                .with_location(location)
                .with_max_results(max_results);
            search(config, &state, request).await
        }
        JobsCommands::Show => show_results(&state),
        JobsCommands::List { limit, status } => list_saved(config, ListJobsQuery { limit, status }).await,
        JobsCommands::Select { job } => select(config, &state, &job),
    }
}

/// Run a search and display the results
async fn search(config: &Config, state: &ClientState, request: SearchRequest) -> Result<()> {
    let client = config.client()?;
    let progress = ProgressLine::new("Searching for");

    let claim = store::claim(&config.state_file, Flow::Search)?;
    let outcome = run_search(&client, &config.poll_config(), state, request, &progress).await;
    progress.finish();

    let results = outcome.inspect_err(|e| hint_resume(e, "search"))?;
    save_result(config, &claim, state)?;

    print_search_results(&results);
    if !results.is_empty() {
        println!(
            "{}",
            "Select a job with `jobscout jobs select <number>`.".dimmed()
        );
    }

    Ok(())
}

/// Show the last search results again
fn show_results(state: &ClientState) -> Result<()> {
    let results = state
        .search
        .current()
        .ok_or_else(|| anyhow!("No search results yet; run `jobscout jobs search <query>` first"))?;

    print_search_results(&results);
    Ok(())
}

/// List saved jobs
async fn list_saved(config: &Config, query: ListJobsQuery) -> Result<()> {
    let client = config.client()?;
    let list = client.list_jobs(&query).await?;

    if list.jobs.is_empty() {
        println!("{}", "No saved jobs found.".yellow());
        return Ok(());
    }

    let count = list.count.unwrap_or(list.jobs.len());
    println!("{}", format!("Found {} saved job(s):", count).bold());
    println!();
    for job in &list.jobs {
        print_job_card(None, job);
    }

    Ok(())
}

/// Select a job from the last search
fn select(config: &Config, state: &ClientState, job: &str) -> Result<()> {
    let results = state
        .search
        .current()
        .ok_or_else(|| anyhow!("No search results yet; run `jobscout jobs search <query>` first"))?;
    let job_ref = JobRef::parse(job);
    let job_id = job_ref.resolve(&results)?.job_id.clone();

    let selected = state
        .select_job(&job_id)
        .ok_or_else(|| anyhow!("Job {} is not in the last search results", job_ref))?;
    store::update(&config.state_file, |snapshot| snapshot.select_job(selected.clone()))?;

    println!("{}", "✓ Job selected".green());
    print_job_card(None, &selected);
    println!(
        "{}",
        "Generate an application kit with `jobscout kit generate`.".dimmed()
    );

    Ok(())
}
