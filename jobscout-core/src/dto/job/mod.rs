//! Job DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::JobListing;

/// Request to start a job search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchJobs {
    pub query: String,
    pub location: String,
    pub max_results: u32,
}

/// Saved jobs as listed by the API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobList {
    #[serde(default)]
    pub jobs: Vec<JobListing>,
    #[serde(default)]
    pub count: Option<usize>,
}

/// Filters for listing saved jobs
#[derive(Debug, Clone, Default)]
pub struct ListJobsQuery {
    pub limit: Option<u32>,
    pub status: Option<String>,
}

impl ListJobsQuery {
    /// Query-string pairs for the filters that are set
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_skip_unset_filters() {
        assert!(ListJobsQuery::default().to_query_pairs().is_empty());

        let query = ListJobsQuery {
            limit: Some(25),
            status: Some("kit_generated".to_string()),
        };
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("limit", "25".to_string()),
                ("status", "kit_generated".to_string())
            ]
        );
    }
}
