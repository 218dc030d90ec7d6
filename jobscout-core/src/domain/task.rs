//! Task domain types
//!
//! A task is a unit of asynchronous backend work (a job search or a form
//! fill) identified by an opaque id and observed through the task status
//! endpoint.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Task status as reported by the backend
///
/// The known set is closed, but the backend is free to report anything
/// (for example `in_progress`). Unrecognized values are kept verbatim in
/// [`TaskStatus::Unknown`] and are never terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Unknown(String),
}

impl TaskStatus {
    /// Whether no further transition can occur
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Processing => "processing",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Unknown(raw) => raw,
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Unknown(String::new())
    }
}

impl From<String> for TaskStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => TaskStatus::Pending,
            "processing" => TaskStatus::Processing,
            "completed" => TaskStatus::Completed,
            "failed" => TaskStatus::Failed,
            _ => TaskStatus::Unknown(raw),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Unknown(raw) if raw.is_empty() => write!(f, "unknown"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// Task record returned by the task status endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    /// Present only once the task has completed; shape depends on the task kind
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    /// Present only once the task has failed
    #[serde(default)]
    pub error_message: Option<String>,
    /// Form-fill tasks also store their filled fields at the top level
    #[serde(default)]
    pub filled_fields: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Takes the result payload, failing if the backend sent none
    pub fn take_result(&mut self) -> Result<serde_json::Value, String> {
        match self.result.take() {
            Some(serde_json::Value::Null) | None => {
                Err("task completed without a result".to_string())
            }
            Some(value) => Ok(value),
        }
    }
}

/// Decodes the result of a completed task into a kind-specific value
///
/// Implementations must never panic on unexpected payloads; they return a
/// human-readable reason instead, which the poller reports as a malformed
/// result.
pub trait FromCompletedTask: Sized {
    fn from_completed_task(task: Task) -> Result<Self, String>;
}

impl FromCompletedTask for serde_json::Value {
    fn from_completed_task(mut task: Task) -> Result<Self, String> {
        task.take_result()
    }
}

/// Accepts unix seconds as an integer or a float; anything else becomes `None`
///
/// Timestamps are informational only, so a surprising value must not make
/// the whole task record undecodable.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let seconds = match value {
        Some(serde_json::Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        _ => None,
    };
    Ok(seconds.and_then(|s| Utc.timestamp_opt(s, 0).single()))
}
