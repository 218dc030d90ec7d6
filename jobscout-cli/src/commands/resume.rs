//! Résumé command handlers

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use jobscout_client::ClientState;
use jobscout_client::flows::upload::upload_resume;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::render::print_resume;
use crate::store;

/// Résumé subcommands
#[derive(Subcommand)]
pub enum ResumeCommands {
    /// Upload a PDF résumé
    Upload {
        /// Path to the PDF file (at most 5MB)
        path: PathBuf,
    },
    /// Show the uploaded résumé
    Show,
}

/// Handle résumé commands
pub async fn handle_resume_command(command: ResumeCommands, config: &Config) -> Result<()> {
    let state = store::load(&config.state_file)?;

    match command {
        ResumeCommands::Upload { path } => upload(config, &state, &path).await,
        ResumeCommands::Show => {
            show(&state);
            Ok(())
        }
    }
}

/// Upload a résumé and remember it
async fn upload(config: &Config, state: &ClientState, path: &Path) -> Result<()> {
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} is not a file", path.display()))?;

    let client = config.client()?;
    let resume = upload_resume(&client, state, &filename, &content).await?;
    store::update(&config.state_file, |snapshot| snapshot.resume = Some(resume.clone()))?;

    println!("{}", "✓ Resume uploaded successfully".green());
    print_resume(&resume);

    Ok(())
}

fn show(state: &ClientState) {
    match state.resume() {
        Some(resume) => {
            println!("{}", "Résumé:".bold());
            print_resume(&resume);
        }
        None => println!(
            "{}",
            "No résumé uploaded. Run `jobscout resume upload <file.pdf>`.".yellow()
        ),
    }
}
