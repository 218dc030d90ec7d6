//! Résumé-related API endpoints

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use jobscout_core::domain::resume::ResumeRef;
use jobscout_core::dto::resume::UploadResume;

use crate::error::Result;
use crate::{ApiClient, Method, to_body};

impl ApiClient {
    // =============================================================================
    // Résumé Upload
    // =============================================================================

    /// Upload a résumé file
    ///
    /// The bytes are base64 encoded into the JSON body. No local validation
    /// happens here; see [`crate::flows::upload`] for that.
    ///
    /// # Arguments
    /// * `filename` - Name to store the file under
    /// * `content` - Raw file bytes
    ///
    /// # Returns
    /// The storage reference of the uploaded file
    pub async fn upload_resume(&self, filename: &str, content: &[u8]) -> Result<ResumeRef> {
        let body = to_body(&UploadResume {
            filename: filename.to_string(),
            content: STANDARD.encode(content),
        })?;

        self.request(Method::POST, &self.endpoints.upload_resume, Some(&body))
            .await
    }
}
