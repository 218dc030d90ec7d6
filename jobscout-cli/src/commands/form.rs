//! Form command handlers

use anyhow::Result;
use clap::Subcommand;
use jobscout_client::Flow;
use jobscout_client::flows::form_fill::{FormFillRequest, run_form_fill};
use serde_json::{Map, Value};

use super::{hint_resume, save_result};
use crate::config::Config;
use crate::progress::ProgressLine;
use crate::render::print_form_fill;
use crate::store;

/// Form subcommands
#[derive(Subcommand)]
pub enum FormCommands {
    /// Auto-fill the application form of the selected job
    Fill {
        /// Application form URL (default: the selected job's URL)
        #[arg(long)]
        url: Option<String>,

        /// Job ID (default: the selected job)
        #[arg(long)]
        job_id: Option<String>,

        /// Applicant data as KEY=value (e.g. --data full_name="Ada Lovelace")
        #[arg(short, long, value_parser = parse_key_val)]
        data: Vec<(String, String)>,
    },
}

/// Parse a single key=value pair
fn parse_key_val(s: &str) -> Result<(String, String)> {
    let pos = s
        .find('=')
        .ok_or_else(|| anyhow::anyhow!("invalid KEY=value: no `=` found in `{}`", s))?;
    let key = s[..pos].trim();
    if key.is_empty() {
        anyhow::bail!("invalid KEY=value: empty key in `{}`", s);
    }
    Ok((key.to_string(), s[pos + 1..].to_string()))
}

/// Handle form commands
pub async fn handle_form_command(command: FormCommands, config: &Config) -> Result<()> {
    match command {
        FormCommands::Fill { url, job_id, data } => {
            let application_data: Map<String, Value> = data
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect();

            fill(
                config,
                FormFillRequest {
                    job_id,
                    application_url: url,
                    application_data,
                },
            )
            .await
        }
    }
}

/// Submit a form fill and wait for the outcome
async fn fill(config: &Config, request: FormFillRequest) -> Result<()> {
    let state = store::load(&config.state_file)?;
    let client = config.client()?;
    let progress = ProgressLine::new("Filling");

    let claim = store::claim(&config.state_file, Flow::FormFill)?;
    let outcome = run_form_fill(&client, &config.poll_config(), &state, request, &progress).await;
    progress.finish();

    let outcome = outcome.inspect_err(|e| hint_resume(e, "form"))?;
    save_result(config, &claim, &state)?;

    print_form_fill(&outcome);
    Ok(())
}
