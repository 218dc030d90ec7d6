//! Task DTOs

use serde::{Deserialize, Serialize};

/// Response to a submission that was turned into a background task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHandle {
    pub task_id: String,
}
