//! Application form-fill flow

use jobscout_core::domain::form::FormFillOutcome;
use jobscout_core::dto::form::FillForm;
use serde_json::{Map, Value};
use tracing::info;

use super::{drive, task_id};
use crate::ApiClient;
use crate::error::{FlowError, FlowResult};
use crate::poller::{PollConfig, ProgressSink};
use crate::state::ClientState;

/// Key under which the kit's cover letter is sent
pub const COVER_LETTER_FIELD: &str = "cover_letter";

/// What to fill and with which applicant data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFillRequest {
    /// Job to fill for; defaults to the selected job
    pub job_id: Option<String>,
    /// Form to fill; defaults to the selected job's URL
    pub application_url: Option<String>,
    /// Applicant details (full_name, email, phone, ...)
    pub application_data: Map<String, Value>,
}

impl FormFillRequest {
    /// Builds the submission from the request and the client state
    ///
    /// With an explicit application URL only a job id is needed, taken from
    /// the request or the selected job. Otherwise the selected job must have
    /// a URL and a kit must have been generated.
    fn resolve(self, state: &ClientState) -> FlowResult<FillForm> {
        let selected = state.selected_job();
        let kit = state.kit.current();
        let explicit_url = non_blank(self.application_url);

        let (job_id, application_url) = match explicit_url {
            Some(url) => {
                let job_id = non_blank(self.job_id)
                    .or_else(|| selected.as_ref().map(|job| job.job_id.clone()))
                    .ok_or_else(|| {
                        FlowError::validation("Select a job or pass a job id to fill an application form")
                    })?;
                (job_id, url)
            }
            None => {
                let job = selected.ok_or_else(|| FlowError::validation("Please select a job first"))?;
                if kit.is_none() {
                    return Err(FlowError::validation("Please generate an application kit first"));
                }
                let url = job
                    .application_url()
                    .map(str::to_string)
                    .ok_or_else(|| FlowError::validation("The selected job has no application URL"))?;
                (non_blank(self.job_id).unwrap_or(job.job_id), url)
            }
        };

        let mut application_data = self.application_data;
        if let Some(letter) = kit.as_ref().and_then(|kit| kit.cover_letter()) {
            application_data
                .entry(COVER_LETTER_FIELD)
                .or_insert_with(|| Value::String(letter.to_string()));
        }

        Ok(FillForm {
            job_id,
            application_url,
            application_data,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Submits a form fill and polls it to completion
///
/// A fill that reports no fields and no screenshot is still a success.
pub async fn run_form_fill(
    client: &ApiClient,
    poll: &PollConfig,
    state: &ClientState,
    request: FormFillRequest,
    progress: &dyn ProgressSink,
) -> FlowResult<FormFillOutcome> {
    let dto = request.resolve(state)?;

    let ticket = state.form_fill.begin();
    let task_id = match client.fill_form(&dto).await.map_err(FlowError::from).and_then(task_id) {
        Ok(task_id) => task_id,
        Err(e) => {
            state.form_fill.finish(&ticket);
            return Err(e);
        }
    };

    info!(
        "Form fill for job {} at {} submitted as task {}",
        dto.job_id, dto.application_url, task_id
    );
    drive(
        client,
        poll,
        &state.form_fill,
        ticket,
        &task_id,
        &dto.application_url,
        progress,
    )
    .await
}

/// Re-attaches to a form-fill task that is already running
pub async fn resume_form_fill(
    client: &ApiClient,
    poll: &PollConfig,
    state: &ClientState,
    task_id: &str,
    progress: &dyn ProgressSink,
) -> FlowResult<FormFillOutcome> {
    let task_id = task_id.trim();
    if task_id.is_empty() {
        return Err(FlowError::validation("task id is required"));
    }

    let ticket = state.form_fill.begin();
    info!("Resuming form fill task {}", task_id);
    drive(client, poll, &state.form_fill, ticket, task_id, task_id, progress).await
}
