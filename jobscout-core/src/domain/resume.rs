//! Résumé domain types

use serde::{Deserialize, Serialize};

/// Largest résumé the backend accepts, in bytes
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

/// Storage reference returned by a résumé upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRef {
    pub s3_key: String,
    #[serde(default)]
    pub filename: Option<String>,
    /// Presigned URL of the stored file
    #[serde(default)]
    pub url: Option<String>,
}
