//! Task command handlers
//!
//! Inspects background tasks and re-attaches to ones that outlived their
//! original poll.

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use colored::*;
use jobscout_client::Flow;
use jobscout_client::flows::form_fill::resume_form_fill;
use jobscout_client::flows::search::resume_search;

use super::{hint_resume, save_result};
use crate::config::Config;
use crate::progress::ProgressLine;
use crate::render::{print_form_fill, print_search_results, print_task};
use crate::store;

/// What a task computes, which decides how its result is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TaskKind {
    Search,
    Form,
}

/// Task subcommands
#[derive(Subcommand)]
pub enum TaskCommands {
    /// Show the raw status of a task
    Get {
        /// Task ID
        task_id: String,
    },
    /// Wait for a running task and record its result
    Wait {
        /// Task ID
        task_id: String,

        /// Kind of task
        #[arg(short, long, value_enum)]
        kind: TaskKind,
    },
}

/// Handle task commands
pub async fn handle_task_command(command: TaskCommands, config: &Config) -> Result<()> {
    let client = config.client()?;

    match command {
        TaskCommands::Get { task_id } => {
            let task = client.get_task(&task_id).await?;
            print_task(&task_id, &task);
            Ok(())
        }
        TaskCommands::Wait { task_id, kind } => {
            let state = store::load(&config.state_file)?;
            let poll = config.poll_config();
            let progress = ProgressLine::new("Waiting for");

            match kind {
                TaskKind::Search => {
                    let claim = store::claim(&config.state_file, Flow::Search)?;
                    let outcome = resume_search(&client, &poll, &state, &task_id, &progress).await;
                    progress.finish();
                    let results = outcome.inspect_err(|e| hint_resume(e, "search"))?;
                    save_result(config, &claim, &state)?;
                    print_search_results(&results);
                }
                TaskKind::Form => {
                    let claim = store::claim(&config.state_file, Flow::FormFill)?;
                    let outcome = resume_form_fill(&client, &poll, &state, &task_id, &progress).await;
                    progress.finish();
                    let outcome = outcome.inspect_err(|e| hint_resume(e, "form"))?;
                    save_result(config, &claim, &state)?;
                    print_form_fill(&outcome);
                }
            }

            println!("{}", format!("✓ Task {} finished", task_id).green());
            Ok(())
        }
    }
}
