//! Form-fill DTOs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request to auto-fill a job application form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillForm {
    pub job_id: String,
    pub application_url: String,
    /// Applicant details (full_name, email, phone, cover_letter, ...)
    pub application_data: Map<String, Value>,
}
