//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod form;
mod jobs;
mod kit;
mod resume;
mod status;
mod task;

pub use form::FormCommands;
pub use jobs::JobsCommands;
pub use kit::KitCommands;
pub use resume::ResumeCommands;
pub use task::TaskCommands;

use anyhow::{Result, bail};
use clap::Subcommand;
use colored::*;
use jobscout_client::{ClientState, FlowError};

use crate::config::Config;
use crate::store::{self, Claim};

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Résumé upload
    Resume {
        #[command(subcommand)]
        command: ResumeCommands,
    },
    /// Job search and selection
    Jobs {
        #[command(subcommand)]
        command: JobsCommands,
    },
    /// Application kit generation
    Kit {
        #[command(subcommand)]
        command: KitCommands,
    },
    /// Application form filling
    Form {
        #[command(subcommand)]
        command: FormCommands,
    },
    /// Background task inspection
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Show the current client state
    Status,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Resume { command } => resume::handle_resume_command(command, config).await,
        Commands::Jobs { command } => jobs::handle_jobs_command(command, config).await,
        Commands::Kit { command } => kit::handle_kit_command(command, config).await,
        Commands::Form { command } => form::handle_form_command(command, config).await,
        Commands::Task { command } => task::handle_task_command(command, config).await,
        Commands::Status => status::show_status(config),
    }
}

/// Saves the flow result of `claim`, failing when a newer run took over
fn save_result(config: &Config, claim: &Claim, state: &ClientState) -> Result<()> {
    if !store::commit(&config.state_file, claim, state)? {
        bail!(
            "A newer {} was started in another session; this result was not saved",
            claim.flow()
        );
    }
    Ok(())
}

/// Points at `jobscout task wait` when a task outlived the poll
fn hint_resume(err: &FlowError, kind: &str) {
    let Some(task_id) = err.resumable_task_id() else {
        return;
    };

    if let FlowError::TaskTimeout {
        last_error: Some(last_error),
        ..
    } = err
    {
        eprintln!("{}", format!("  Last error: {}", last_error).dimmed());
    }
    eprintln!(
        "{}",
        format!(
            "  The task may still finish; resume with `jobscout task wait {} --kind {}`",
            task_id, kind
        )
        .yellow()
    );
}
