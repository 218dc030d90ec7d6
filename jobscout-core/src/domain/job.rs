//! Job listing domain types

use serde::{Deserialize, Serialize};

use crate::domain::task::{FromCompletedTask, Task};

/// A job posting found by a search or saved by the backend
///
/// Only `job_id` is guaranteed; every descriptive field may be missing and
/// has to be displayed with a fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub job_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Where the backend found the posting (e.g. "yutori_research")
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub posted_date: Option<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
    /// Saved-job stage such as `found`, `kit_generated` or `ready_to_submit`
    #[serde(default)]
    pub status: Option<String>,
}

impl JobListing {
    /// Application URL, if the posting has a non-blank one
    pub fn application_url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}

/// Terminal result of a job search task
///
/// An empty `jobs` list is a valid outcome ("no jobs found"); a missing one
/// is not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub jobs: Vec<JobListing>,
    #[serde(default)]
    pub count: Option<usize>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn find(&self, job_id: &str) -> Option<&JobListing> {
        self.jobs.iter().find(|job| job.job_id == job_id)
    }
}

impl FromCompletedTask for SearchResults {
    fn from_completed_task(mut task: Task) -> Result<Self, String> {
        let value = task.take_result()?;
        serde_json::from_value(value).map_err(|e| format!("unexpected search result: {}", e))
    }
}
