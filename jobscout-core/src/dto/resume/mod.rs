//! Résumé DTOs

use serde::{Deserialize, Serialize};

/// Request to upload a résumé
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResume {
    pub filename: String,
    /// File bytes, base64 encoded
    pub content: String,
}
