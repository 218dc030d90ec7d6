//! In-process stub of the JobScout API
//!
//! Submissions hand out sequential task ids (`t1`, `t2`, ...). Each task
//! replays the script registered under its key (the search query or the
//! form-fill job id); the last reply of a script repeats forever. Any
//! reply can be held back with [`Reply::delayed`] to model a slow backend.

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use jobscout_client::ApiClient;
use jobscout_client::poller::{PollConfig, PollProgress, ProgressSink};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// One canned HTTP answer
#[derive(Debug, Clone)]
pub enum Reply {
    Json(StatusCode, Value),
    Text(StatusCode, &'static str),
    Delayed(Duration, Box<Reply>),
}

impl Reply {
    pub fn status(status: &str) -> Self {
        Reply::Json(StatusCode::OK, json!({ "status": status }))
    }

    pub fn completed(result: Value) -> Self {
        Reply::Json(StatusCode::OK, json!({ "status": "completed", "result": result }))
    }

    pub fn failed(message: &str) -> Self {
        Reply::Json(
            StatusCode::OK,
            json!({ "status": "failed", "error_message": message }),
        )
    }

    pub fn error(status: u16, body: Value) -> Self {
        Reply::Json(StatusCode::from_u16(status).unwrap(), body)
    }

    /// Answers with `self` only after `delay`
    pub fn delayed(self, delay: Duration) -> Self {
        Reply::Delayed(delay, Box::new(self))
    }

    async fn send(self) -> Response {
        let mut reply = self;
        while let Reply::Delayed(delay, inner) = reply {
            tokio::time::sleep(delay).await;
            reply = *inner;
        }
        reply.into_response()
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Json(status, body) => (status, Json(body)).into_response(),
            Reply::Text(status, body) => (status, body).into_response(),
            Reply::Delayed(_, reply) => (*reply).into_response(),
        }
    }
}

/// A request as the stub saw it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub body: Value,
}

#[derive(Default)]
struct StubState {
    scripts: Mutex<HashMap<String, Vec<Reply>>>,
    tasks: Mutex<HashMap<String, VecDeque<Reply>>>,
    checks: Mutex<HashMap<String, u32>>,
    next_task: AtomicU32,
    overrides: Mutex<HashMap<String, Reply>>,
    overrides_once: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<Recorded>>,
}

impl StubState {
    fn record(&self, method: Method, uri: &Uri, query: HashMap<String, String>, body: Value) -> Option<Reply> {
        let path = uri.path().to_string();
        self.requests.lock().unwrap().push(Recorded {
            method,
            path: path.clone(),
            query,
            body,
        });
        let once = self
            .overrides_once
            .lock()
            .unwrap()
            .get_mut(&path)
            .and_then(VecDeque::pop_front);
        once.or_else(|| self.overrides.lock().unwrap().get(&path).cloned())
    }

    fn submit(&self, key: &str) -> Response {
        let task_id = format!("t{}", self.next_task.fetch_add(1, Ordering::SeqCst) + 1);
        let script = self
            .scripts
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or_else(|| vec![Reply::completed(json!({}))]);
        self.tasks
            .lock()
            .unwrap()
            .insert(task_id.clone(), script.into());

        Json(json!({ "task_id": task_id, "status": "pending" })).into_response()
    }
}

type Shared = Arc<StubState>;

/// Running stub server; shut down on drop
pub struct StubBackend {
    pub url: String,
    state: Shared,
    handle: JoinHandle<()>,
}

impl StubBackend {
    pub async fn start() -> Self {
        let state = Shared::default();
        let app = Router::new()
            .route("/resume/upload", post(upload_resume))
            .route("/jobs/search", post(search_jobs))
            .route("/jobs", get(list_jobs))
            .route("/kits/generate", post(generate_kit))
            .route("/kits", get(list_kits))
            .route("/forms/fill", post(fill_form))
            .route("/tasks/{task_id}", get(task_status))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { url, state, handle }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.url)
    }

    /// Registers the status replies for tasks submitted under `key`
    pub fn script(&self, key: &str, replies: Vec<Reply>) {
        self.state
            .scripts
            .lock()
            .unwrap()
            .insert(key.to_string(), replies);
    }

    /// Replaces the remaining status replies of an existing task
    pub fn set_task(&self, task_id: &str, replies: Vec<Reply>) {
        self.state
            .tasks
            .lock()
            .unwrap()
            .insert(task_id.to_string(), replies.into());
    }

    /// Answers every request to `path` with `reply`
    pub fn respond(&self, path: &str, reply: Reply) {
        self.state
            .overrides
            .lock()
            .unwrap()
            .insert(path.to_string(), reply);
    }

    /// Answers the next request to `path` with `reply`, before any other override
    pub fn respond_once(&self, path: &str, reply: Reply) {
        self.state
            .overrides_once
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Number of status checks `task_id` received
    pub fn checks(&self, task_id: &str) -> u32 {
        self.state
            .checks
            .lock()
            .unwrap()
            .get(task_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.state
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.path == path)
            .cloned()
            .collect()
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Fast polling for tests
pub fn fast_poll(max_attempts: u32) -> PollConfig {
    PollConfig::new(Duration::from_millis(5), max_attempts)
}

/// Records the attempt numbers of progress notifications
#[derive(Default)]
pub struct RecordingProgress {
    pub attempts: Mutex<Vec<u32>>,
    pub labels: Mutex<Vec<String>>,
}

impl ProgressSink for RecordingProgress {
    fn on_progress(&self, progress: &PollProgress<'_>) {
        self.attempts.lock().unwrap().push(progress.attempt);
        self.labels.lock().unwrap().push(progress.label.to_string());
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn upload_resume(State(state): State<Shared>, uri: Uri, Json(body): Json<Value>) -> Response {
    if let Some(reply) = state.record(Method::POST, &uri, HashMap::new(), body.clone()) {
        return reply.send().await;
    }
    let filename = body["filename"].as_str().unwrap_or_default();
    Json(json!({ "s3_key": format!("resumes/{}", filename) })).into_response()
}

async fn search_jobs(State(state): State<Shared>, uri: Uri, Json(body): Json<Value>) -> Response {
    if let Some(reply) = state.record(Method::POST, &uri, HashMap::new(), body.clone()) {
        return reply.send().await;
    }
    state.submit(body["query"].as_str().unwrap_or_default())
}

async fn list_jobs(
    State(state): State<Shared>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(reply) = state.record(Method::GET, &uri, query, Value::Null) {
        return reply.send().await;
    }
    Json(json!({
        "jobs": [{ "job_id": "saved-1", "title": "Platform Engineer", "status": "found" }],
        "count": 1
    }))
    .into_response()
}

async fn generate_kit(State(state): State<Shared>, uri: Uri, Json(body): Json<Value>) -> Response {
    if let Some(reply) = state.record(Method::POST, &uri, HashMap::new(), body.clone()) {
        return reply.send().await;
    }
    Json(json!({
        "kit_id": "k1",
        "cover_letter": "Dear hiring team",
        "resume_bullets": ["Built a task poller", "Shipped a CLI"]
    }))
    .into_response()
}

async fn list_kits(
    State(state): State<Shared>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(reply) = state.record(Method::GET, &uri, query.clone(), Value::Null) {
        return reply.send().await;
    }
    Json(json!({
        "kits": [{ "kit_id": "k1", "job_id": query.get("job_id"), "cover_letter": "Dear hiring team" }],
        "count": 1
    }))
    .into_response()
}

async fn fill_form(State(state): State<Shared>, uri: Uri, Json(body): Json<Value>) -> Response {
    if let Some(reply) = state.record(Method::POST, &uri, HashMap::new(), body.clone()) {
        return reply.send().await;
    }
    state.submit(body["job_id"].as_str().unwrap_or_default())
}

async fn task_status(State(state): State<Shared>, uri: Uri, Path(task_id): Path<String>) -> Response {
    if let Some(reply) = state.record(Method::GET, &uri, HashMap::new(), Value::Null) {
        return reply.send().await;
    }
    *state.checks.lock().unwrap().entry(task_id.clone()).or_default() += 1;

    let reply = {
        let mut tasks = state.tasks.lock().unwrap();
        match tasks.get_mut(&task_id) {
            Some(replies) if replies.len() > 1 => replies.pop_front(),
            Some(replies) => replies.front().cloned(),
            None => Some(Reply::error(404, json!({ "error": "Task not found" }))),
        }
    };
    reply.unwrap_or_else(|| Reply::status("pending")).send().await
}
