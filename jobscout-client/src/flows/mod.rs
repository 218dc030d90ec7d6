//! User-facing flows
//!
//! One async function per user action. A flow validates its local
//! preconditions, performs the one-shot call or submits the task, and for
//! task-backed work drives the poller under a session ticket so that a
//! superseded run can never overwrite a newer result.

pub mod form_fill;
pub mod kit;
pub mod search;
pub mod upload;

use jobscout_core::domain::task::FromCompletedTask;
use jobscout_core::dto::task::TaskHandle;

use crate::ApiClient;
use crate::error::{ClientError, FlowError, FlowResult};
use crate::poller::{PollConfig, PollOutcome, ProgressSink, TaskPoller};
use crate::state::{FlowSlot, SessionTicket};

/// Extracts the task id from a submission response
fn task_id(handle: TaskHandle) -> FlowResult<String> {
    let task_id = handle.task_id.trim().to_string();
    if task_id.is_empty() {
        return Err(ClientError::Parse("submission response carried an empty task_id".to_string()).into());
    }
    Ok(task_id)
}

/// Polls `task_id` and commits the result to `slot` if `ticket` is still active
async fn drive<T>(
    client: &ApiClient,
    poll: &PollConfig,
    slot: &FlowSlot<T>,
    ticket: SessionTicket,
    task_id: &str,
    label: &str,
    progress: &dyn ProgressSink,
) -> FlowResult<T>
where
    T: FromCompletedTask + Clone,
{
    let outcome = TaskPoller::new(client, *poll)
        .with_cancellation(ticket.token())
        .poll::<T>(task_id, label, progress)
        .await;

    match outcome {
        PollOutcome::Completed(value) => {
            if slot.commit(&ticket, value.clone()) {
                Ok(value)
            } else {
                Err(FlowError::Superseded {
                    task_id: task_id.to_string(),
                })
            }
        }
        other => {
            slot.finish(&ticket);
            other.into_flow_result(task_id)
        }
    }
}
