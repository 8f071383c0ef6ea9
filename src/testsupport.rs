//! Shared test fixtures for planner, controller, and transcript test modules.
//!
//! Keeping tiny reusable helpers here prevents each test module from
//! rebuilding temp dirs, raw HTTP servers, and scripted collaborators.

use crate::error::PlannerError;
use crate::exec::{CommandRunner, ExecutionResult, OutputEvent, OutputSink, OutputStream};
use crate::planner::Planner;
use crate::types::{
    AgentResponse, ChatRequest, CommandProposal, HealthStatus, IterateRequest, LoopStatus,
    Severity,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!("pcdoctor-{prefix}-{millis}-{suffix}"));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.child(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

// ---------------------------------------------------------------------------
// Raw HTTP
// ---------------------------------------------------------------------------

/// One canned HTTP reply.
pub struct CannedReply {
    pub status: &'static str,
    pub body: String,
}

impl CannedReply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: "200 OK",
            body: body.into(),
        }
    }

    pub fn status(status: &'static str, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Serve `replies` one connection at a time on a throwaway listener.
///
/// Returns the base URL and a handle resolving to the raw text of every
/// request received (head plus body).
pub async fn serve_http(replies: Vec<CannedReply>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        let mut seen = Vec::new();
        for reply in replies {
            let (mut stream, _) = listener.accept().await.expect("accept");
            seen.push(read_request(&mut stream).await);
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                reply.status,
                reply.body.len(),
                reply.body
            );
            let _ = stream.write_all(response.as_bytes()).await;
        }
        seen
    });
    (format!("http://{addr}"), handle)
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = stream.read(&mut buf).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&raw);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if raw.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&raw).into_owned()
}

// ---------------------------------------------------------------------------
// Scripted collaborators
// ---------------------------------------------------------------------------

/// Build a planner reply.
pub fn reply(
    message: &str,
    status: LoopStatus,
    iteration: u32,
    proposal: Option<CommandProposal>,
) -> AgentResponse {
    AgentResponse {
        message: message.to_string(),
        proposal,
        session_id: Some("sess-1".to_string()),
        loop_status: status,
        iteration_count: iteration,
        blocker_reason: None,
    }
}

pub fn proposal(command: &str, severity: Severity, timeout: Option<u64>) -> CommandProposal {
    CommandProposal {
        command: command.to_string(),
        severity,
        reason: format!("check {command}"),
        timeout,
    }
}

/// Planner call observed by [`ScriptedPlanner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerCall {
    Chat(ChatRequest),
    Iterate(IterateRequest),
}

/// Planner that replays queued results in order and records every call.
#[derive(Default)]
pub struct ScriptedPlanner {
    replies: StdMutex<VecDeque<Result<AgentResponse, PlannerError>>>,
    calls: StdMutex<Vec<PlannerCall>>,
}

impl ScriptedPlanner {
    pub fn new(replies: Vec<Result<AgentResponse, PlannerError>>) -> Self {
        Self {
            replies: StdMutex::new(replies.into()),
            calls: StdMutex::new(Vec::new()),
        }
    }

    pub fn push(&self, reply: Result<AgentResponse, PlannerError>) {
        self.replies.lock().expect("replies lock").push_back(reply);
    }

    pub fn calls(&self) -> Vec<PlannerCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn next(&self, call: PlannerCall) -> Result<AgentResponse, PlannerError> {
        self.calls.lock().expect("calls lock").push(call);
        self.replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or_else(|| Err(PlannerError::InvalidResponse("script exhausted".into())))
    }
}

#[async_trait]
impl Planner for ScriptedPlanner {
    async fn chat(&self, request: &ChatRequest) -> Result<AgentResponse, PlannerError> {
        self.next(PlannerCall::Chat(request.clone()))
    }

    async fn iterate(&self, request: &IterateRequest) -> Result<AgentResponse, PlannerError> {
        self.next(PlannerCall::Iterate(request.clone()))
    }

    async fn health(&self) -> Result<HealthStatus, PlannerError> {
        Ok(HealthStatus {
            status: "online".into(),
            service: "scripted".into(),
        })
    }
}

/// Runner that never spawns anything: records commands and replays a fixed
/// stdout, emitting one chunk plus the final event.
///
/// Clones share the command record, so a test can keep one handle while the
/// controller owns another.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    commands: Arc<StdMutex<Vec<(String, Duration)>>>,
    output: String,
    launch_failure: bool,
}

impl RecordingRunner {
    pub fn with_output(output: &str) -> Self {
        Self {
            output: output.to_string(),
            ..Self::default()
        }
    }

    /// Every run resolves as a launch failure.
    pub fn failing_launch() -> Self {
        Self {
            launch_failure: true,
            ..Self::default()
        }
    }

    pub fn commands(&self) -> Vec<(String, Duration)> {
        self.commands.lock().expect("commands lock").clone()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(
        &mut self,
        command: &str,
        timeout: Duration,
        sink: &dyn OutputSink,
    ) -> ExecutionResult {
        let run_id = {
            let mut commands = self.commands.lock().expect("commands lock");
            commands.push((command.to_string(), timeout));
            commands.len() as u64
        };
        if self.launch_failure {
            sink.emit(OutputEvent::final_event(run_id));
            return ExecutionResult::launch_failed(run_id, "no shell".into(), Duration::ZERO);
        }
        if !self.output.is_empty() {
            sink.emit(OutputEvent::chunk(
                run_id,
                OutputStream::Stdout,
                self.output.clone(),
            ));
        }
        sink.emit(OutputEvent::final_event(run_id));
        ExecutionResult::succeeded(run_id, self.output.clone(), String::new(), Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dir_fixture_writes_and_resolves_paths() {
        let fixture = TestTempDir::new("fixture");
        let file = fixture.write_text("nested/file.txt", "hello");
        assert_eq!(fs::read_to_string(file).unwrap(), "hello");
    }

    #[tokio::test]
    async fn scripted_planner_reports_exhaustion() {
        let planner = ScriptedPlanner::default();
        let err = planner
            .chat(&ChatRequest {
                message: "hi".into(),
                session_id: None,
            })
            .await
            .expect_err("empty script");
        assert!(matches!(err, PlannerError::InvalidResponse(_)));
        assert_eq!(planner.calls().len(), 1);
    }
}
