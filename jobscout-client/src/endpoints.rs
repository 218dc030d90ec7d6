//! API route table
//!
//! Endpoint paths are plain configuration: changing them never requires a
//! change in the transport, the poller or the flows.

/// Paths of the API endpoints, relative to the base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub upload_resume: String,
    pub search_jobs: String,
    pub list_jobs: String,
    pub generate_kit: String,
    pub list_kits: String,
    pub fill_form: String,
    /// Prefix of the task status route; the task id is appended as a segment
    pub tasks: String,
}

impl Endpoints {
    /// Creates the route table from environment variables
    ///
    /// Every variable is optional and falls back to the default path:
    /// - JOBSCOUT_ENDPOINT_UPLOAD_RESUME (default: /resume/upload)
    /// - JOBSCOUT_ENDPOINT_SEARCH_JOBS (default: /jobs/search)
    /// - JOBSCOUT_ENDPOINT_LIST_JOBS (default: /jobs)
    /// - JOBSCOUT_ENDPOINT_GENERATE_KIT (default: /kits/generate)
    /// - JOBSCOUT_ENDPOINT_LIST_KITS (default: /kits)
    /// - JOBSCOUT_ENDPOINT_FILL_FORM (default: /forms/fill)
    /// - JOBSCOUT_ENDPOINT_TASKS (default: /tasks)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let var = |name: &str, fallback: String| {
            std::env::var(name)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(|value| normalize(&value))
                .unwrap_or(fallback)
        };

        Self {
            upload_resume: var("JOBSCOUT_ENDPOINT_UPLOAD_RESUME", defaults.upload_resume),
            search_jobs: var("JOBSCOUT_ENDPOINT_SEARCH_JOBS", defaults.search_jobs),
            list_jobs: var("JOBSCOUT_ENDPOINT_LIST_JOBS", defaults.list_jobs),
            generate_kit: var("JOBSCOUT_ENDPOINT_GENERATE_KIT", defaults.generate_kit),
            list_kits: var("JOBSCOUT_ENDPOINT_LIST_KITS", defaults.list_kits),
            fill_form: var("JOBSCOUT_ENDPOINT_FILL_FORM", defaults.fill_form),
            tasks: var("JOBSCOUT_ENDPOINT_TASKS", defaults.tasks),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            upload_resume: "/resume/upload".to_string(),
            search_jobs: "/jobs/search".to_string(),
            list_jobs: "/jobs".to_string(),
            generate_kit: "/kits/generate".to_string(),
            list_kits: "/kits".to_string(),
            fill_form: "/forms/fill".to_string(),
            tasks: "/tasks".to_string(),
        }
    }
}

/// Ensures a leading slash
fn normalize(path: &str) -> String {
    let path = path.trim();
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
