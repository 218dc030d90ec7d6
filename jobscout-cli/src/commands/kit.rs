//! Kit command handlers

use anyhow::{Context, Result, anyhow};
use clap::Subcommand;
use colored::*;
use jobscout_client::{ClientState, Flow};
use jobscout_client::flows::kit::generate_kit;
use jobscout_core::dto::kit::KitQuery;
use std::path::PathBuf;

use super::save_result;
use crate::config::Config;
use crate::render::{cover_letter_filename, print_kit};
use crate::store;

/// Kit subcommands
#[derive(Subcommand)]
pub enum KitCommands {
    /// Generate a cover letter and résumé bullets for the selected job
    Generate {
        /// Extra context for the writer (e.g. "emphasize Rust experience")
        #[arg(short, long, default_value = "")]
        context: String,
    },
    /// Show the current kit
    Show,
    /// List saved kits for a job, or fetch one kit
    List {
        /// Kits generated for this job
        #[arg(long, conflicts_with = "kit_id", required_unless_present = "kit_id")]
        job_id: Option<String>,

        /// A single kit
        #[arg(long)]
        kit_id: Option<String>,
    },
    /// Save the current cover letter to a text file
    Download {
        /// Output file (default: cover_letter_<company>.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle kit commands
pub async fn handle_kit_command(command: KitCommands, config: &Config) -> Result<()> {
    let state = store::load(&config.state_file)?;

    match command {
        KitCommands::Generate { context } => generate(config, &state, &context).await,
        KitCommands::Show => {
            let kit = state
                .kit
                .current()
                .ok_or_else(|| anyhow!("No kit generated yet; run `jobscout kit generate` first"))?;
            print_kit(&kit);
            Ok(())
        }
        KitCommands::List { job_id, kit_id } => {
            let query = match (job_id, kit_id) {
                (Some(job_id), _) => KitQuery::ByJob(job_id),
                (None, Some(kit_id)) => KitQuery::ByKit(kit_id),
                (None, None) => anyhow::bail!("Pass --job-id or --kit-id"),
            };
            list(config, &query).await
        }
        KitCommands::Download { output } => download(&state, output),
    }
}

/// Generate a kit for the selected job
async fn generate(config: &Config, state: &ClientState, context: &str) -> Result<()> {
    let client = config.client()?;

    println!("{}", "Generating application kit...".dimmed());
    let claim = store::claim(&config.state_file, Flow::Kit)?;
    let kit = generate_kit(&client, state, context).await?;
    save_result(config, &claim, state)?;

    println!("{}", "✓ Kit generated".green());
    print_kit(&kit);
    println!(
        "\n{}",
        "Fill the application with `jobscout form fill`.".dimmed()
    );

    Ok(())
}

/// List saved kits
async fn list(config: &Config, query: &KitQuery) -> Result<()> {
    let client = config.client()?;
    let list = client.list_kits(query).await?;

    if list.kits.is_empty() {
        println!("{}", "No kits found.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} kit(s):", list.count.unwrap_or(list.kits.len())).bold()
    );
    for kit in &list.kits {
        println!();
        print_kit(kit);
    }

    Ok(())
}

/// Write the cover letter of the current kit to disk
fn download(state: &ClientState, output: Option<PathBuf>) -> Result<()> {
    let kit = state
        .kit
        .current()
        .ok_or_else(|| anyhow!("No kit generated yet; run `jobscout kit generate` first"))?;
    let letter = kit
        .cover_letter()
        .ok_or_else(|| anyhow!("The current kit has no cover letter"))?;

    let path = output.unwrap_or_else(|| {
        let company = state
            .selected_job()
            .filter(|job| kit.job_id.as_deref().is_none_or(|id| id == job.job_id))
            .and_then(|job| job.company);
        PathBuf::from(cover_letter_filename(company.as_deref()))
    });

    std::fs::write(&path, letter)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!(
        "{}",
        format!("✓ Cover letter saved to {}", path.display()).green()
    );

    Ok(())
}
