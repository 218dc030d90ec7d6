//! Job search flow

use jobscout_core::domain::job::SearchResults;
use jobscout_core::dto::job::SearchJobs;
use tracing::info;

use super::{drive, task_id};
use crate::ApiClient;
use crate::error::{FlowError, FlowResult};
use crate::poller::{PollConfig, ProgressSink};
use crate::state::ClientState;

/// Number of results asked for when the caller does not say
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// What to search for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub location: String,
    pub max_results: u32,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            location: String::new(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    fn validate(&self) -> FlowResult<()> {
        if self.query.trim().is_empty() {
            return Err(FlowError::validation("Please enter a search query"));
        }
        if self.max_results == 0 {
            return Err(FlowError::validation("max results must be greater than 0"));
        }
        Ok(())
    }

    fn to_dto(&self) -> SearchJobs {
        SearchJobs {
            query: self.query.trim().to_string(),
            location: self.location.trim().to_string(),
            max_results: self.max_results,
        }
    }
}

/// Submits a search and polls it to completion
///
/// Starting a search abandons any search still in progress. An empty job
/// list is a successful outcome.
///
/// # Arguments
/// * `client` - API client
/// * `poll` - Polling parameters
/// * `state` - Client state; the results are committed to its search slot
/// * `request` - Query, location and result limit
/// * `progress` - Notified before every status check, labelled with the query
///
/// # Errors
/// Returns [`FlowError::Validation`] before anything is sent when the query
/// is blank, [`FlowError::Client`] when the submission fails, and the task
/// outcomes ([`FlowError::TaskFailed`], [`FlowError::TaskTimeout`],
/// [`FlowError::MalformedResult`], [`FlowError::Superseded`]) otherwise.
pub async fn run_search(
    client: &ApiClient,
    poll: &PollConfig,
    state: &ClientState,
    request: SearchRequest,
    progress: &dyn ProgressSink,
) -> FlowResult<SearchResults> {
    request.validate()?;

    let ticket = state.search.begin();
    let dto = request.to_dto();
    let task_id = match client.search_jobs(&dto).await.map_err(FlowError::from).and_then(task_id) {
        Ok(task_id) => task_id,
        Err(e) => {
            state.search.finish(&ticket);
            return Err(e);
        }
    };

    info!("Search for '{}' submitted as task {}", dto.query, task_id);
    drive(client, poll, &state.search, ticket, &task_id, &dto.query, progress).await
}

/// Re-attaches to a search task that is already running
///
/// Used after a [`FlowError::TaskTimeout`]: the task id from the error picks
/// up where the previous poll gave up.
pub async fn resume_search(
    client: &ApiClient,
    poll: &PollConfig,
    state: &ClientState,
    task_id: &str,
    progress: &dyn ProgressSink,
) -> FlowResult<SearchResults> {
    let task_id = task_id.trim();
    if task_id.is_empty() {
        return Err(FlowError::validation("task id is required"));
    }

    let ticket = state.search.begin();
    info!("Resuming search task {}", task_id);
    drive(client, poll, &state.search, ticket, task_id, task_id, progress).await
}
