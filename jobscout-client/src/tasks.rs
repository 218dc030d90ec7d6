//! Task status endpoint

use async_trait::async_trait;
use jobscout_core::domain::task::Task;
use reqwest::Url;

use crate::error::{ClientError, Result};
use crate::poller::TaskSource;
use crate::{ApiClient, Method};

impl ApiClient {
    /// Get the current status of a task
    ///
    /// # Arguments
    /// * `task_id` - The id returned by a submission
    pub async fn get_task(&self, task_id: &str) -> Result<Task> {
        let url = self.task_url(task_id)?;
        self.send_to(Method::GET, url, &[], None).await
    }

    /// Status URL of one task
    ///
    /// The id becomes a single percent-encoded path segment after the
    /// tasks route.
    pub fn task_url(&self, task_id: &str) -> Result<Url> {
        let task_id = task_id.trim();
        if task_id.is_empty() || task_id.contains('/') {
            return Err(ClientError::InvalidRequest(format!(
                "'{}' is not a valid task id",
                task_id
            )));
        }

        let mut url = self.url(&self.endpoints.tasks)?;
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::InvalidRequest(format!("{} cannot carry a task id", self.base_url))
            })?
            .pop_if_empty()
            .push(task_id);
        Ok(url)
    }
}

#[async_trait]
impl TaskSource for ApiClient {
    async fn fetch_task(&self, task_id: &str) -> Result<Task> {
        self.get_task(task_id).await
    }
}
