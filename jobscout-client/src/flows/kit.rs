//! Application kit flow

use jobscout_core::domain::kit::ApplicationKit;
use jobscout_core::dto::kit::GenerateKit;
use tracing::info;

use crate::ApiClient;
use crate::error::{FlowError, FlowResult};
use crate::state::ClientState;

/// Generates a cover letter and résumé bullets for the selected job
///
/// Kit generation is a single call; the result is committed to the kit slot
/// unless another generation started meanwhile or a different job was
/// selected.
pub async fn generate_kit(
    client: &ApiClient,
    state: &ClientState,
    user_context: &str,
) -> FlowResult<ApplicationKit> {
    let job = state
        .selected_job()
        .ok_or_else(|| FlowError::validation("Please select a job first"))?;
    let resume = state
        .resume()
        .ok_or_else(|| FlowError::validation("Please upload your resume first"))?;

    let ticket = state.kit.begin();
    let req = GenerateKit {
        job_id: job.job_id.clone(),
        resume_s3_key: resume.s3_key,
        user_context: user_context.trim().to_string(),
    };

    let mut kit = match client.generate_kit(&req).await {
        Ok(kit) => kit,
        Err(e) => {
            state.kit.finish(&ticket);
            return Err(e.into());
        }
    };
    kit.job_id.get_or_insert_with(|| job.job_id.clone());

    if !state.kit.commit(&ticket, kit.clone()) {
        return Err(FlowError::KitSuperseded { job_id: job.job_id });
    }

    info!(
        "Generated kit {} for job {}",
        kit.kit_id.as_deref().unwrap_or("-"),
        job.job_id
    );
    Ok(kit)
}
