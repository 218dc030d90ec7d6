//! Job-related API endpoints

use jobscout_core::dto::job::{JobList, ListJobsQuery, SearchJobs};
use jobscout_core::dto::task::TaskHandle;

use crate::error::Result;
use crate::{ApiClient, Method, to_body};

impl ApiClient {
    // =============================================================================
    // Job Search
    // =============================================================================

    /// Submit a job search
    ///
    /// The search runs in the background; poll the returned task for the
    /// results.
    ///
    /// # Example
    /// ```no_run
    /// # use jobscout_client::ApiClient;
    /// # use jobscout_core::dto::job::SearchJobs;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = ApiClient::new("http://localhost:3000");
    /// let handle = client.search_jobs(&SearchJobs {
    ///     query: "backend engineer".to_string(),
    ///     location: "remote".to_string(),
    ///     max_results: 10,
    /// }).await?;
    /// println!("Search task: {}", handle.task_id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search_jobs(&self, req: &SearchJobs) -> Result<TaskHandle> {
        let body = to_body(req)?;
        self.request(Method::POST, &self.endpoints.search_jobs, Some(&body))
            .await
    }

    // =============================================================================
    // Saved Jobs
    // =============================================================================

    /// List jobs saved by previous searches
    ///
    /// # Arguments
    /// * `query` - Optional limit and stage filter
    pub async fn list_jobs(&self, query: &ListJobsQuery) -> Result<JobList> {
        self.send(
            Method::GET,
            &self.endpoints.list_jobs,
            &query.to_query_pairs(),
            None,
        )
        .await
    }
}
