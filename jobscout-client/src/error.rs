//! Error types for the JobScout client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Message used when a failed response carries neither `error` nor `message`
pub const GENERIC_API_FAILURE: &str = "API request failed";

/// Errors that can occur when talking to the API
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response reached the client (connect, DNS, timeout, broken body)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// API answered with a non-success status code
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// A success response whose body could not be decoded
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Check if no response was received at all
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Result type alias for flow operations
pub type FlowResult<T> = std::result::Result<T, FlowError>;

/// Errors surfaced by a user-facing flow
///
/// Transient failures while polling never show up here on their own; they
/// are absorbed by the poller and only reported through [`FlowError::TaskTimeout`].
#[derive(Debug, Error)]
pub enum FlowError {
    /// A local precondition was not met; nothing was sent
    #[error("{0}")]
    Validation(String),

    /// A one-shot call (upload, submit, kit) failed
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The backend reported the task as failed
    #[error("Task {task_id} failed: {message}")]
    TaskFailed { task_id: String, message: String },

    /// The attempt budget ran out before the task reached a terminal state
    #[error("Task {task_id} did not finish after {attempts} status checks")]
    TaskTimeout {
        task_id: String,
        attempts: u32,
        /// Last transient error seen while polling, if any
        last_error: Option<String>,
    },

    /// The task completed but its result was missing or unusable
    #[error("Task {task_id} completed but returned no usable result ({reason})")]
    MalformedResult { task_id: String, reason: String },

    /// A newer request of the same kind replaced this one
    #[error("Task {task_id} was superseded by a newer request")]
    Superseded { task_id: String },

    /// Another kit generation or job selection replaced this one
    #[error("Kit for job {job_id} was superseded by a newer request")]
    KitSuperseded { job_id: String },
}

impl FlowError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Task id to resume from, for outcomes that leave a task running
    pub fn resumable_task_id(&self) -> Option<&str> {
        match self {
            Self::TaskTimeout { task_id, .. } => Some(task_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_helpers() {
        let err = ClientError::api_error(404, "Task not found");
        assert!(err.is_not_found());
        assert!(!err.is_transport());
        assert_eq!(err.to_string(), "API error (status 404): Task not found");
    }

    #[test]
    fn test_timeout_is_resumable() {
        let err = FlowError::TaskTimeout {
            task_id: "t1".to_string(),
            attempts: 200,
            last_error: None,
        };
        assert_eq!(err.resumable_task_id(), Some("t1"));
        assert_eq!(err.to_string(), "Task t1 did not finish after 200 status checks");

        let err = FlowError::TaskFailed {
            task_id: "t1".to_string(),
            message: "boom".to_string(),
        };
        assert!(err.resumable_task_id().is_none());
    }

    #[test]
    fn test_superseded_messages_name_what_was_replaced() {
        let err = FlowError::Superseded {
            task_id: "t1".to_string(),
        };
        assert_eq!(err.to_string(), "Task t1 was superseded by a newer request");

        let err = FlowError::KitSuperseded {
            job_id: "j1".to_string(),
        };
        assert_eq!(err.to_string(), "Kit for job j1 was superseded by a newer request");
        assert!(err.resumable_task_id().is_none());
    }
}
