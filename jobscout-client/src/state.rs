//! Client-side state
//!
//! Holds what the user has done so far (uploaded résumé, last search,
//! selected job, generated kit, last form fill) and guards every
//! task-backed flow against stale results.
//!
//! Each flow owns a [`FlowSlot`]. Starting a run takes a [`SessionTicket`]
//! from the slot, which abandons whatever run held the slot before. A run
//! may only write its result while its ticket is still the active one.
//!
//! The same rule holds across processes sharing one saved snapshot: the
//! snapshot records, per flow, the session that last claimed it in
//! [`SessionIds`], and only that session may write the flow's value.

use jobscout_core::domain::form::FormFillOutcome;
use jobscout_core::domain::job::{JobListing, SearchResults};
use jobscout_core::domain::kit::ApplicationKit;
use jobscout_core::domain::resume::ResumeRef;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

/// Identity of one flow run
#[derive(Debug, Clone)]
pub struct SessionTicket {
    id: Uuid,
    cancel: CancellationToken,
}

impl SessionTicket {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Token that fires when the run is abandoned
    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[derive(Debug)]
struct SlotInner<T> {
    active: Option<SessionTicket>,
    value: Option<T>,
}

/// Latest value of one flow plus the ticket of its running session
#[derive(Debug)]
pub struct FlowSlot<T> {
    inner: Mutex<SlotInner<T>>,
}

impl<T> Default for FlowSlot<T> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(SlotInner {
                active: None,
                value: None,
            }),
        }
    }
}

impl<T: Clone> FlowSlot<T> {
    /// Starts a new run, abandoning the one in progress
    pub fn begin(&self) -> SessionTicket {
        let ticket = SessionTicket::new();
        let mut inner = lock(&self.inner);
        if let Some(previous) = inner.active.replace(ticket.clone()) {
            debug!("Session {} superseded by {}", previous.id, ticket.id);
            previous.cancel.cancel();
        }
        ticket
    }

    /// Stores `value` if `ticket` is still the active run, then retires it
    ///
    /// Returns `false` (and stores nothing) for a superseded run.
    pub fn commit(&self, ticket: &SessionTicket, value: T) -> bool {
        let mut inner = lock(&self.inner);
        if !is_current(&inner, ticket) {
            debug!("Dropping result of stale session {}", ticket.id);
            return false;
        }
        inner.value = Some(value);
        inner.active = None;
        true
    }

    /// Retires `ticket` without storing anything
    pub fn finish(&self, ticket: &SessionTicket) {
        let mut inner = lock(&self.inner);
        if is_current(&inner, ticket) {
            inner.active = None;
        }
    }

    /// Whether `ticket` is still the active run of this slot
    pub fn is_active(&self, ticket: &SessionTicket) -> bool {
        is_current(&lock(&self.inner), ticket)
    }

    /// Whether some run currently holds this slot
    pub fn is_busy(&self) -> bool {
        lock(&self.inner).active.is_some()
    }

    /// Last committed value
    pub fn current(&self) -> Option<T> {
        lock(&self.inner).value.clone()
    }

    /// Replaces the value without a session, e.g. when loading saved state
    pub fn restore(&self, value: Option<T>) {
        lock(&self.inner).value = value;
    }

    /// Abandons the running session and drops the value
    pub fn clear(&self) {
        let mut inner = lock(&self.inner);
        if let Some(previous) = inner.active.take() {
            previous.cancel.cancel();
        }
        inner.value = None;
    }
}

fn is_current<T>(inner: &SlotInner<T>, ticket: &SessionTicket) -> bool {
    inner
        .active
        .as_ref()
        .is_some_and(|active| active.id == ticket.id)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Everything the user has done so far
#[derive(Debug, Default)]
pub struct ClientState {
    resume: Mutex<Option<ResumeRef>>,
    selected_job: Mutex<Option<JobListing>>,
    pub search: FlowSlot<SearchResults>,
    pub kit: FlowSlot<ApplicationKit>,
    pub form_fill: FlowSlot<FormFillOutcome>,
}

impl ClientState {
    pub fn resume(&self) -> Option<ResumeRef> {
        lock(&self.resume).clone()
    }

    pub fn set_resume(&self, resume: ResumeRef) {
        *lock(&self.resume) = Some(resume);
    }

    pub fn selected_job(&self) -> Option<JobListing> {
        lock(&self.selected_job).clone()
    }

    /// Selects a job from the last search results
    ///
    /// Switching to a different job drops the kit, which belonged to the
    /// previous job. Returns `None` when the id is not in the results.
    pub fn select_job(&self, job_id: &str) -> Option<JobListing> {
        let job = self.search.current()?.find(job_id).cloned()?;
        self.set_selected_job(job.clone());
        Some(job)
    }

    /// Selects a job that did not come from the last search
    pub fn set_selected_job(&self, job: JobListing) {
        let mut selected = lock(&self.selected_job);
        let changed = selected
            .as_ref()
            .is_none_or(|current| current.job_id != job.job_id);
        *selected = Some(job);
        drop(selected);

        if changed {
            self.kit.clear();
        }
    }

    /// Copies the persistable part of the state
    ///
    /// The copy carries no session claims.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            resume: self.resume(),
            selected_job: self.selected_job(),
            search_results: self.search.current(),
            kit: self.kit.current(),
            form_fill: self.form_fill.current(),
            sessions: SessionIds::default(),
        }
    }

    /// Rebuilds the state from a snapshot; no session is active afterwards
    pub fn from_snapshot(snapshot: StateSnapshot) -> Self {
        let state = Self {
            resume: Mutex::new(snapshot.resume),
            selected_job: Mutex::new(snapshot.selected_job),
            ..Default::default()
        };
        state.search.restore(snapshot.search_results);
        state.kit.restore(snapshot.kit);
        state.form_fill.restore(snapshot.form_fill);
        state
    }
}

/// Serializable copy of [`ClientState`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    #[serde(default)]
    pub resume: Option<ResumeRef>,
    #[serde(default)]
    pub selected_job: Option<JobListing>,
    #[serde(default)]
    pub search_results: Option<SearchResults>,
    #[serde(default)]
    pub kit: Option<ApplicationKit>,
    #[serde(default)]
    pub form_fill: Option<FormFillOutcome>,
    #[serde(default)]
    pub sessions: SessionIds,
}

impl StateSnapshot {
    /// Records `session` as the only run allowed to write `flow`
    pub fn claim(&mut self, flow: Flow, session: Uuid) {
        if let Some(previous) = self.sessions.slot_mut(flow).replace(session) {
            debug!("Saved {} session {} superseded by {}", flow, previous, session);
        }
    }

    /// Copies the value of `flow` from `source` if `session` still owns it
    ///
    /// The claim is retired on success. Returns `false` and changes nothing
    /// when another session claimed the flow in the meantime.
    pub fn commit(&mut self, flow: Flow, session: Uuid, source: &StateSnapshot) -> bool {
        let claim = self.sessions.slot_mut(flow);
        if *claim != Some(session) {
            debug!("Dropping {} result of stale session {}", flow, session);
            return false;
        }
        *claim = None;

        match flow {
            Flow::Search => self.search_results = source.search_results.clone(),
            Flow::Kit => self.kit = source.kit.clone(),
            Flow::FormFill => self.form_fill = source.form_fill.clone(),
        }
        true
    }

    /// Selects `job`, dropping the kit and any kit claim when the job changes
    pub fn select_job(&mut self, job: JobListing) {
        let changed = self
            .selected_job
            .as_ref()
            .is_none_or(|current| current.job_id != job.job_id);
        self.selected_job = Some(job);

        if changed {
            self.kit = None;
            self.sessions.kit = None;
        }
    }
}

/// Task-backed flows whose values are guarded by sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Search,
    Kit,
    FormFill,
}

impl std::fmt::Display for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Flow::Search => write!(f, "search"),
            Flow::Kit => write!(f, "kit"),
            Flow::FormFill => write!(f, "form fill"),
        }
    }
}

/// Session that currently owns each flow of a saved snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIds {
    #[serde(default)]
    pub search: Option<Uuid>,
    #[serde(default)]
    pub kit: Option<Uuid>,
    #[serde(default)]
    pub form_fill: Option<Uuid>,
}

impl SessionIds {
    fn slot_mut(&mut self, flow: Flow) -> &mut Option<Uuid> {
        match flow {
            Flow::Search => &mut self.search,
            Flow::Kit => &mut self.kit,
            Flow::FormFill => &mut self.form_fill,
        }
    }
}
