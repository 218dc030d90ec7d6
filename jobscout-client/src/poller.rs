//! Task poller
//!
//! Drives the status checks of one background task until it reaches a
//! terminal state, the attempt budget runs out, or its owner abandons it.
//!
//! Checks are strictly sequential: check N+1 is only issued after check N
//! has been answered (or has failed) and the fixed interval has elapsed.
//! Transient failures (transport errors, error statuses, undecodable
//! bodies) count against the budget but never end the session on their own.

use async_trait::async_trait;
use jobscout_core::domain::task::{FromCompletedTask, Task, TaskStatus};
use tokio::time::{self, Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{FlowError, FlowResult, Result};

/// Default delay between two status checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Default number of status checks before giving up (10 minutes at 3s)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 200;

/// Reported when a failed task carries no error message
pub const DEFAULT_FAILURE_MESSAGE: &str = "Task failed";

/// Polling parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Fixed delay between successive checks
    pub interval: Duration,
    /// Upper bound on checks before declaring a timeout
    pub max_attempts: u32,
}

impl PollConfig {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Longest time a poll can wait between the first and the last check
    pub fn ceiling(&self) -> Duration {
        self.nominal_elapsed(self.max_attempts)
    }

    /// Scheduled wait up to `attempt`, saturating at [`Duration::MAX`]
    fn nominal_elapsed(&self, attempt: u32) -> Duration {
        self.interval.saturating_mul(attempt)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.interval.is_zero() {
            anyhow::bail!("poll interval must be greater than 0");
        }

        if self.max_attempts == 0 {
            anyhow::bail!("max attempts must be greater than 0");
        }

        Ok(())
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_ATTEMPTS)
    }
}

/// Where task status comes from
///
/// [`crate::ApiClient`] implements this over `GET /tasks/{task_id}`.
#[async_trait]
pub trait TaskSource: Send + Sync {
    async fn fetch_task(&self, task_id: &str) -> Result<Task>;
}

/// Progress of a poll, emitted right before each status check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollProgress<'a> {
    pub task_id: &'a str,
    /// Caller-supplied description, e.g. the search query
    pub label: &'a str,
    /// 1-based number of the check about to be issued
    pub attempt: u32,
    pub max_attempts: u32,
    /// Nominal elapsed time, `attempt × interval`
    pub elapsed: Duration,
}

/// Receives progress notifications
///
/// Notifications are purely informational; a sink cannot influence the
/// poll.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, progress: &PollProgress<'_>);
}

/// Discards progress notifications
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _progress: &PollProgress<'_>) {}
}

/// How a poll ended
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome<T> {
    /// The task completed and its result decoded
    Completed(T),
    /// The task completed but its result was missing or unusable
    Malformed { reason: String },
    /// The backend reported the task as failed
    Failed { message: String },
    /// The attempt budget ran out
    TimedOut {
        attempts: u32,
        last_error: Option<String>,
    },
    /// The owner of the poll cancelled it
    Abandoned { attempts: u32 },
}

impl<T> PollOutcome<T> {
    /// Converts the outcome into what a flow surfaces
    pub fn into_flow_result(self, task_id: &str) -> FlowResult<T> {
        let task_id = task_id.to_string();
        match self {
            PollOutcome::Completed(value) => Ok(value),
            PollOutcome::Malformed { reason } => Err(FlowError::MalformedResult { task_id, reason }),
            PollOutcome::Failed { message } => Err(FlowError::TaskFailed { task_id, message }),
            PollOutcome::TimedOut {
                attempts,
                last_error,
            } => Err(FlowError::TaskTimeout {
                task_id,
                attempts,
                last_error,
            }),
            PollOutcome::Abandoned { .. } => Err(FlowError::Superseded { task_id }),
        }
    }
}

/// Bookkeeping for one poll of one task
#[derive(Debug, Clone)]
pub struct PollSession {
    task_id: String,
    attempt: u32,
    started_at: Instant,
}

impl PollSession {
    fn new(task_id: &str) -> Self {
        Self {
            task_id: task_id.to_string(),
            attempt: 0,
            started_at: Instant::now(),
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Number of checks issued so far
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Wall-clock time since the session started
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    fn next_attempt(&mut self) -> u32 {
        self.attempt += 1;
        self.attempt
    }
}

/// Polls a [`TaskSource`] until the task settles
pub struct TaskPoller<'a, S: TaskSource + ?Sized> {
    source: &'a S,
    config: PollConfig,
    cancel: Option<CancellationToken>,
}

impl<'a, S: TaskSource + ?Sized> TaskPoller<'a, S> {
    /// Creates a new poller
    pub fn new(source: &'a S, config: PollConfig) -> Self {
        Self {
            source,
            config,
            cancel: None,
        }
    }

    /// Stops the poll as soon as `token` is cancelled
    ///
    /// A check that is in flight when the token fires is discarded.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Polls `task_id` until it completes, fails, times out or is abandoned
    ///
    /// # Arguments
    /// * `task_id` - The id returned by the submission
    /// * `label` - Description passed through to progress notifications
    /// * `progress` - Notified before every check
    pub async fn poll<T: FromCompletedTask>(
        &self,
        task_id: &str,
        label: &str,
        progress: &dyn ProgressSink,
    ) -> PollOutcome<T> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut session = PollSession::new(task_id);
        let mut last_error = None;

        debug!(
            "Polling task {} every {:?}, at most {} checks",
            task_id, self.config.interval, max_attempts
        );

        loop {
            if self.is_cancelled() {
                debug!("Task {} abandoned before check {}", task_id, session.attempt() + 1);
                return PollOutcome::Abandoned {
                    attempts: session.attempt(),
                };
            }

            let attempt = session.next_attempt();
            progress.on_progress(&PollProgress {
                task_id,
                label,
                attempt,
                max_attempts,
                elapsed: self.config.nominal_elapsed(attempt),
            });

            let Some(checked) = self.check(task_id).await else {
                debug!("Task {} abandoned during check {}", task_id, attempt);
                return PollOutcome::Abandoned { attempts: attempt };
            };

            match checked {
                Err(e) => {
                    warn!(
                        "Status check {}/{} for task {} failed: {}",
                        attempt, max_attempts, task_id, e
                    );
                    last_error = Some(e.to_string());
                }
                Ok(task) => {
                    let status = task.status.clone();
                    match status {
                        TaskStatus::Completed => {
                            info!(
                                "Task {} completed after {} check(s) in {:?}",
                                task_id,
                                attempt,
                                session.elapsed()
                            );
                            return match T::from_completed_task(task) {
                                Ok(value) => PollOutcome::Completed(value),
                                Err(reason) => {
                                    warn!("Task {} completed with an unusable result: {}", task_id, reason);
                                    PollOutcome::Malformed { reason }
                                }
                            };
                        }
                        TaskStatus::Failed => {
                            let message = task
                                .error_message
                                .filter(|message| !message.trim().is_empty())
                                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
                            info!("Task {} failed after {} check(s): {}", task_id, attempt, message);
                            return PollOutcome::Failed { message };
                        }
                        other => {
                            debug!(
                                "Task {} is {} (check {}/{})",
                                task_id, other, attempt, max_attempts
                            );
                        }
                    }
                }
            }

            if attempt >= max_attempts {
                warn!(
                    "Task {} did not settle after {} checks ({:?})",
                    task_id,
                    attempt,
                    session.elapsed()
                );
                return PollOutcome::TimedOut {
                    attempts: attempt,
                    last_error,
                };
            }

            if !self.wait().await {
                debug!("Task {} abandoned while waiting after check {}", task_id, attempt);
                return PollOutcome::Abandoned { attempts: attempt };
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Issues one status check; `None` when cancelled while in flight
    async fn check(&self, task_id: &str) -> Option<Result<Task>> {
        match &self.cancel {
            None => Some(self.source.fetch_task(task_id).await),
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => None,
                checked = self.source.fetch_task(task_id) => Some(checked),
            },
        }
    }

    /// Sleeps for one interval; `false` when cancelled meanwhile
    async fn wait(&self) -> bool {
        match &self.cancel {
            None => {
                time::sleep(self.config.interval).await;
                true
            }
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => false,
                _ = time::sleep(self.config.interval) => true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use jobscout_core::domain::job::SearchResults;
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// One scripted answer of the fake status endpoint
    #[derive(Clone)]
    enum Step {
        Status(&'static str),
        Completed(Option<Value>),
        Failed(Option<&'static str>),
        Unavailable,
        Garbled,
    }

    /// Replays a script; the last step repeats forever
    struct ScriptedSource {
        steps: Mutex<VecDeque<Step>>,
        calls: AtomicU32,
        cancel_after: Option<(u32, CancellationToken)>,
    }

    impl ScriptedSource {
        fn new(steps: Vec<Step>) -> Self {
            Self {
                steps: Mutex::new(steps.into()),
                calls: AtomicU32::new(0),
                cancel_after: None,
            }
        }

        fn cancelling_after(mut self, calls: u32, token: CancellationToken) -> Self {
            self.cancel_after = Some((calls, token));
            self
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TaskSource for ScriptedSource {
        async fn fetch_task(&self, task_id: &str) -> Result<Task> {
            let calls = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some((after, token)) = &self.cancel_after {
                if calls >= *after {
                    token.cancel();
                }
            }

            let step = {
                let mut steps = self.steps.lock().unwrap();
                if steps.len() > 1 {
                    steps.pop_front().unwrap()
                } else {
                    steps.front().cloned().unwrap()
                }
            };

            let task = |status: &str| Task {
                task_id: Some(task_id.to_string()),
                status: TaskStatus::from(status.to_string()),
                ..Default::default()
            };

            match step {
                Step::Status(status) => Ok(task(status)),
                Step::Completed(result) => Ok(Task {
                    result,
                    ..task("completed")
                }),
                Step::Failed(message) => Ok(Task {
                    error_message: message.map(str::to_string),
                    ..task("failed")
                }),
                Step::Unavailable => Err(ClientError::api_error(503, "Service Unavailable")),
                Step::Garbled => Err(ClientError::Parse("expected value at line 1".to_string())),
            }
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<(u32, Duration, String)>>,
    }

    impl ProgressSink for RecordingProgress {
        fn on_progress(&self, progress: &PollProgress<'_>) {
            self.events.lock().unwrap().push((
                progress.attempt,
                progress.elapsed,
                progress.label.to_string(),
            ));
        }
    }

    fn config(max_attempts: u32) -> PollConfig {
        PollConfig::new(Duration::from_millis(3000), max_attempts)
    }

    fn one_job() -> Value {
        json!({ "jobs": [{ "job_id": "j1", "title": "Backend Engineer" }], "count": 1 })
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_errors_then_completed() {
        let source = ScriptedSource::new(vec![
            Step::Unavailable,
            Step::Garbled,
            Step::Status("processing"),
            Step::Unavailable,
            Step::Completed(Some(one_job())),
        ]);

        let outcome: PollOutcome<SearchResults> = TaskPoller::new(&source, config(10))
            .poll("t1", "backend engineer", &NoProgress)
            .await;

        match outcome {
            PollOutcome::Completed(results) => assert_eq!(results.jobs[0].job_id, "j1"),
            other => panic!("expected completion, got {:?}", other),
        }
        assert_eq!(source.calls(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completes_on_last_allowed_attempt() {
        let mut steps = vec![Step::Status("pending"); 4];
        steps.push(Step::Completed(Some(one_job())));
        let source = ScriptedSource::new(steps);

        let outcome: PollOutcome<SearchResults> = TaskPoller::new(&source, config(5))
            .poll("t1", "q", &NoProgress)
            .await;

        assert!(matches!(outcome, PollOutcome::Completed(_)));
        assert_eq!(source.calls(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_leaves_pending_times_out_after_exactly_max_attempts() {
        let source = ScriptedSource::new(vec![Step::Status("pending")]);
        let started = Instant::now();

        let outcome: PollOutcome<Value> = TaskPoller::new(&source, config(200))
            .poll("t1", "q", &NoProgress)
            .await;

        assert_eq!(
            outcome,
            PollOutcome::TimedOut {
                attempts: 200,
                last_error: None
            }
        );
        assert_eq!(source.calls(), 200);
        // No wait after the final check
        assert_eq!(started.elapsed(), Duration::from_millis(3000) * 199);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_surfaces_last_error() {
        let source = ScriptedSource::new(vec![Step::Status("processing"), Step::Unavailable]);

        let outcome: PollOutcome<Value> = TaskPoller::new(&source, config(3))
            .poll("t1", "q", &NoProgress)
            .await;

        match outcome {
            PollOutcome::TimedOut {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 3);
                assert!(last_error.unwrap().contains("Service Unavailable"));
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_stops_immediately_with_message_verbatim() {
        let source = ScriptedSource::new(vec![
            Step::Status("processing"),
            Step::Failed(Some("Yutori quota exceeded: retry in 1h")),
            Step::Completed(Some(one_job())),
        ]);

        let outcome: PollOutcome<SearchResults> = TaskPoller::new(&source, config(10))
            .poll("t1", "q", &NoProgress)
            .await;

        assert_eq!(
            outcome,
            PollOutcome::Failed {
                message: "Yutori quota exceeded: retry in 1h".to_string()
            }
        );
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_without_message_uses_generic_text() {
        let source = ScriptedSource::new(vec![Step::Failed(None)]);

        let outcome: PollOutcome<Value> = TaskPoller::new(&source, config(10))
            .poll("t1", "q", &NoProgress)
            .await;

        assert_eq!(
            outcome,
            PollOutcome::Failed {
                message: DEFAULT_FAILURE_MESSAGE.to_string()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_statuses_are_retried() {
        let source = ScriptedSource::new(vec![
            Step::Status("in_progress"),
            Step::Status("queued"),
            Step::Status(""),
            Step::Completed(Some(json!({ "ok": true }))),
        ]);

        let outcome: PollOutcome<Value> = TaskPoller::new(&source, config(10))
            .poll("t1", "q", &NoProgress)
            .await;

        assert_eq!(outcome, PollOutcome::Completed(json!({ "ok": true })));
        assert_eq!(source.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_without_result_is_malformed() {
        let source = ScriptedSource::new(vec![Step::Completed(None)]);

        let outcome: PollOutcome<SearchResults> = TaskPoller::new(&source, config(10))
            .poll("t1", "q", &NoProgress)
            .await;

        assert!(matches!(outcome, PollOutcome::Malformed { .. }));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_with_wrong_shape_is_malformed() {
        let source = ScriptedSource::new(vec![Step::Completed(Some(json!({ "count": 2 })))]);

        let outcome: PollOutcome<SearchResults> = TaskPoller::new(&source, config(10))
            .poll("t1", "q", &NoProgress)
            .await;

        match outcome {
            PollOutcome::Malformed { reason } => assert!(reason.contains("unexpected search result")),
            other => panic!("expected malformed, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_is_emitted_before_each_check() {
        let source = ScriptedSource::new(vec![
            Step::Status("pending"),
            Step::Status("processing"),
            Step::Completed(Some(one_job())),
        ]);
        let progress = RecordingProgress::default();

        let _: PollOutcome<SearchResults> = TaskPoller::new(&source, config(10))
            .poll("t1", "backend engineer", &progress)
            .await;

        let events = progress.events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                (1, Duration::from_millis(3000), "backend engineer".to_string()),
                (2, Duration::from_millis(6000), "backend engineer".to_string()),
                (3, Duration::from_millis(9000), "backend engineer".to_string()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_checks_are_spaced_by_the_interval() {
        let source = ScriptedSource::new(vec![
            Step::Status("pending"),
            Step::Unavailable,
            Step::Completed(Some(json!({}))),
        ]);
        let started = Instant::now();

        let _: PollOutcome<Value> = TaskPoller::new(&source, config(10))
            .poll("t1", "q", &NoProgress)
            .await;

        assert_eq!(started.elapsed(), Duration::from_millis(6000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_abandons_the_poll() {
        let token = CancellationToken::new();
        let source = ScriptedSource::new(vec![Step::Status("processing")])
            .cancelling_after(2, token.clone());

        let outcome: PollOutcome<Value> = TaskPoller::new(&source, config(10))
            .with_cancellation(token)
            .poll("t1", "q", &NoProgress)
            .await;

        assert_eq!(outcome, PollOutcome::Abandoned { attempts: 2 });
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_cancelled_issues_no_check() {
        let token = CancellationToken::new();
        token.cancel();
        let source = ScriptedSource::new(vec![Step::Completed(Some(json!({})))]);

        let outcome: PollOutcome<Value> = TaskPoller::new(&source, config(10))
            .with_cancellation(token)
            .poll("t1", "q", &NoProgress)
            .await;

        assert_eq!(outcome, PollOutcome::Abandoned { attempts: 0 });
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_max_attempts_still_checks_once() {
        let source = ScriptedSource::new(vec![Step::Status("pending")]);

        let outcome: PollOutcome<Value> = TaskPoller::new(&source, config(0))
            .poll("t1", "q", &NoProgress)
            .await;

        assert!(matches!(outcome, PollOutcome::TimedOut { attempts: 1, .. }));
    }

    #[test]
    fn test_default_config() {
        let config = PollConfig::default();
        assert_eq!(config.interval, Duration::from_millis(3000));
        assert_eq!(config.max_attempts, 200);
        assert_eq!(config.ceiling(), Duration::from_secs(600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_huge_config_saturates() {
        let config = PollConfig::new(Duration::MAX, u32::MAX);
        assert_eq!(config.ceiling(), Duration::MAX);
        assert_eq!(config.nominal_elapsed(2), Duration::MAX);
        assert_eq!(config.nominal_elapsed(0), Duration::ZERO);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(PollConfig::new(Duration::ZERO, 10).validate().is_err());
        assert!(PollConfig::new(Duration::from_millis(10), 0).validate().is_err());
        assert!(PollConfig::new(Duration::from_millis(10), 1).validate().is_ok());
    }

    #[test]
    fn test_outcome_into_flow_result() {
        let timeout: PollOutcome<()> = PollOutcome::TimedOut {
            attempts: 3,
            last_error: Some("boom".to_string()),
        };
        match timeout.into_flow_result("t9") {
            Err(FlowError::TaskTimeout { task_id, attempts, last_error }) => {
                assert_eq!(task_id, "t9");
                assert_eq!(attempts, 3);
                assert_eq!(last_error.as_deref(), Some("boom"));
            }
            other => panic!("unexpected {:?}", other),
        }

        let abandoned: PollOutcome<()> = PollOutcome::Abandoned { attempts: 1 };
        assert!(matches!(
            abandoned.into_flow_result("t9"),
            Err(FlowError::Superseded { .. })
        ));
    }
}
