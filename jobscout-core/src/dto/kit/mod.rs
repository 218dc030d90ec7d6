//! Kit DTOs

use serde::{Deserialize, Serialize};

use crate::domain::kit::ApplicationKit;

/// Request to generate an application kit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateKit {
    pub job_id: String,
    pub resume_s3_key: String,
    pub user_context: String,
}

/// Saved kits as listed by the API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KitList {
    #[serde(default)]
    pub kits: Vec<ApplicationKit>,
    #[serde(default)]
    pub count: Option<usize>,
}

/// Which saved kits to fetch; the API requires exactly one filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KitQuery {
    ByJob(String),
    ByKit(String),
}

impl KitQuery {
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            KitQuery::ByJob(job_id) => vec![("job_id", job_id.clone())],
            KitQuery::ByKit(kit_id) => vec![("kit_id", kit_id.clone())],
        }
    }
}
