//! Application kit domain types

use serde::{Deserialize, Serialize};

/// Cover letter and résumé bullet points generated for one job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationKit {
    #[serde(default)]
    pub kit_id: Option<String>,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub resume_bullets: Vec<String>,
    /// Presigned download link for the stored cover letter
    #[serde(default)]
    pub cover_letter_url: Option<String>,
}

impl ApplicationKit {
    /// Cover letter text, if the backend produced a non-blank one
    pub fn cover_letter(&self) -> Option<&str> {
        self.cover_letter
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}
