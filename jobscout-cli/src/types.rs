//! Common types used across CLI modules

use anyhow::{Result, anyhow};
use jobscout_core::domain::job::{JobListing, SearchResults};

/// Reference to a job of the last search
///
/// Either the 1-based position shown in the listing, a full job id, or an
/// unambiguous job id prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobRef {
    /// Position in the last search results, starting at 1
    Index(usize),
    /// Full job id or a prefix of one
    Id(String),
}

impl JobRef {
    /// Parse a string into a JobRef
    ///
    /// Small positive numbers are positions; anything else is an id.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match input.parse::<usize>() {
            Ok(index) if (1..=999).contains(&index) => JobRef::Index(index),
            _ => JobRef::Id(input.to_string()),
        }
    }

    /// Finds the referenced job in `results`
    ///
    /// An exact id match wins over prefix matches.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The position is out of range
    /// - No job id matches
    /// - Multiple job ids start with the prefix (ambiguous)
    pub fn resolve<'a>(&self, results: &'a SearchResults) -> Result<&'a JobListing> {
        match self {
            JobRef::Index(index) => index
                .checked_sub(1)
                .and_then(|position| results.jobs.get(position))
                .ok_or_else(|| {
                    anyhow!(
                        "No job #{} in the last search ({} result(s))",
                        index,
                        results.len()
                    )
                }),
            JobRef::Id(id) => {
                if let Some(job) = results.find(id) {
                    return Ok(job);
                }

                let prefix = id.to_lowercase();
                let matches: Vec<_> = results
                    .jobs
                    .iter()
                    .filter(|job| job.job_id.to_lowercase().starts_with(&prefix))
                    .collect();

                match matches.len() {
                    0 => Err(anyhow!("No job found with ID starting with '{}'", id)),
                    1 => Ok(matches[0]),
                    _ => {
                        let ids: Vec<&str> = matches.iter().map(|job| job.job_id.as_str()).collect();
                        Err(anyhow!(
                            "Ambiguous prefix '{}' matches multiple jobs: {}",
                            id,
                            ids.join(", ")
                        ))
                    }
                }
            }
        }
    }
}

impl std::fmt::Display for JobRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobRef::Index(index) => write!(f, "#{}", index),
            JobRef::Id(id) => write!(f, "{}", id),
        }
    }
}
