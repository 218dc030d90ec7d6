//! Résumé upload flow

use jobscout_core::domain::resume::{MAX_RESUME_BYTES, ResumeRef};
use std::path::Path;
use tracing::info;

use crate::ApiClient;
use crate::error::{FlowError, FlowResult};
use crate::state::ClientState;

/// Checks a résumé before it is sent
///
/// The file must be a non-empty PDF of at most 5 MiB.
pub fn validate_resume(filename: &str, content: &[u8]) -> FlowResult<()> {
    let is_pdf = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return Err(FlowError::validation("Please upload a PDF file"));
    }

    if content.is_empty() {
        return Err(FlowError::validation("The selected file is empty"));
    }

    if content.len() > MAX_RESUME_BYTES {
        return Err(FlowError::validation("File size must be less than 5MB"));
    }

    Ok(())
}

/// Uploads a résumé and remembers its storage reference
///
/// # Arguments
/// * `client` - API client
/// * `state` - Client state; receives the reference on success
/// * `filename` - Local file name, used when the API does not echo one
/// * `content` - Raw file bytes
pub async fn upload_resume(
    client: &ApiClient,
    state: &ClientState,
    filename: &str,
    content: &[u8],
) -> FlowResult<ResumeRef> {
    validate_resume(filename, content)?;

    let mut resume = client.upload_resume(filename, content).await?;
    let has_name = resume
        .filename
        .as_deref()
        .is_some_and(|name| !name.trim().is_empty());
    if !has_name {
        resume.filename = Some(filename.to_string());
    }

    info!("Uploaded résumé {} as {}", filename, resume.s3_key);
    state.set_resume(resume.clone());
    Ok(resume)
}
