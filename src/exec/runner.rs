//! Single-run process runner with live streaming and a wall-clock deadline.

use std::io;
use std::process::ExitStatus;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::decode::Utf8ChunkDecoder;
use super::events::{OutputEvent, OutputSink, OutputStream};
#[cfg(unix)]
use super::process::signal_group_of;
use super::process::{exit_description, pump_stream, spawn_shell, terminate_in_background, ShellSpec};
use super::result::ExecutionResult;
use super::CommandRunner;

/// Time a timed-out process gets between SIGTERM and SIGKILL.
const DEFAULT_KILL_GRACE: Duration = Duration::from_secs(2);

/// Runs one shell command at a time.
///
/// `run` takes `&mut self`, so a second run on the same instance cannot start
/// while one is outstanding. Every call ends with exactly one final
/// [`OutputEvent`] and an [`ExecutionResult`] carrying the same `run_id`.
#[derive(Debug)]
pub struct ProcessRunner {
    shell: ShellSpec,
    kill_grace: Duration,
    last_run_id: u64,
}

/// Text captured so far, split per stream.
#[derive(Default)]
struct Capture {
    stdout: String,
    stderr: String,
    stdout_decoder: Utf8ChunkDecoder,
    stderr_decoder: Utf8ChunkDecoder,
}

impl Capture {
    fn push(&mut self, stream: OutputStream, bytes: &[u8]) -> String {
        let (decoder, buffer) = self.parts(stream);
        let text = decoder.push(bytes);
        buffer.push_str(&text);
        text
    }

    fn finish(&mut self, stream: OutputStream) -> String {
        let (decoder, buffer) = self.parts(stream);
        let text = decoder.finish();
        buffer.push_str(&text);
        text
    }

    fn parts(&mut self, stream: OutputStream) -> (&mut Utf8ChunkDecoder, &mut String) {
        match stream {
            OutputStream::Stdout => (&mut self.stdout_decoder, &mut self.stdout),
            OutputStream::Stderr => (&mut self.stderr_decoder, &mut self.stderr),
        }
    }
}

/// Receiver end of the pipe readers' shared channel.
type ChunkReceiver = mpsc::UnboundedReceiver<(OutputStream, Vec<u8>)>;

/// Fold chunks the readers already delivered into `capture` without
/// emitting them. Used once the deadline has closed the stream to observers.
fn absorb_pending(capture: &mut Capture, chunk_rx: &mut ChunkReceiver) {
    while let Ok((stream, bytes)) = chunk_rx.try_recv() {
        capture.push(stream, &bytes);
    }
    for stream in [OutputStream::Stdout, OutputStream::Stderr] {
        capture.finish(stream);
    }
}

/// Armed for the lifetime of a spawned run. If the run future is dropped
/// before it resolves, kills the whole process group and emits the run's
/// final event so observers still see exactly one.
struct AbandonGuard<'a> {
    run_id: u64,
    pid: Option<u32>,
    sink: &'a dyn OutputSink,
    armed: bool,
}

impl AbandonGuard<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for AbandonGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        tracing::warn!(run_id = self.run_id, "run abandoned before completion; killing it");
        #[cfg(unix)]
        if let Some(pid) = self.pid {
            signal_group_of(pid, libc::SIGKILL);
        }
        self.sink.emit(OutputEvent::final_event(self.run_id));
    }
}

enum Step {
    Chunk(Option<(OutputStream, Vec<u8>)>),
    Exited(io::Result<ExitStatus>),
    Deadline,
}

impl ProcessRunner {
    pub fn new(shell: ShellSpec) -> Self {
        Self {
            shell,
            kill_grace: DEFAULT_KILL_GRACE,
            last_run_id: 0,
        }
    }

    /// Override the SIGTERM-to-SIGKILL grace period.
    pub fn with_kill_grace(mut self, grace: Duration) -> Self {
        self.kill_grace = grace;
        self
    }

    /// Id of the most recent run (0 before the first run).
    pub fn last_run_id(&self) -> u64 {
        self.last_run_id
    }

    /// Run `command` under the configured shell.
    ///
    /// Output chunks go to `sink` as they arrive. The deadline wins any tie
    /// with a natural exit; once it fires no further chunks are emitted.
    pub async fn run(
        &mut self,
        command: &str,
        timeout: Duration,
        sink: &dyn OutputSink,
    ) -> ExecutionResult {
        self.last_run_id += 1;
        let run_id = self.last_run_id;
        let started = Instant::now();
        tracing::debug!(
            run_id,
            command,
            timeout_ms = timeout.as_millis() as u64,
            shell = %self.shell.display(),
            "starting command"
        );

        let mut child = match spawn_shell(&self.shell, command) {
            Ok(child) => child,
            Err(err) => {
                let message = format!("failed to launch `{}`: {err}", self.shell.program);
                tracing::warn!(run_id, error = %err, "command launch failed");
                sink.emit(OutputEvent::final_event(run_id));
                return ExecutionResult::launch_failed(run_id, message, started.elapsed());
            }
        };

        let mut guard = AbandonGuard {
            run_id,
            pid: child.id(),
            sink,
            armed: true,
        };
        let (chunk_tx, mut chunk_rx) = mpsc::unbounded_channel();
        let mut readers: Vec<JoinHandle<()>> = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(tokio::spawn(pump_stream(
                stdout,
                OutputStream::Stdout,
                chunk_tx.clone(),
            )));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(tokio::spawn(pump_stream(
                stderr,
                OutputStream::Stderr,
                chunk_tx.clone(),
            )));
        }
        drop(chunk_tx);

        let mut capture = Capture::default();
        let mut exit: Option<io::Result<ExitStatus>> = None;
        let mut streams_open = true;
        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);

        // Finish only when the process has exited and both pipes are drained.
        while exit.is_none() || streams_open {
            let step = tokio::select! {
                biased;
                _ = &mut deadline => Step::Deadline,
                chunk = chunk_rx.recv(), if streams_open => Step::Chunk(chunk),
                status = child.wait(), if exit.is_none() => Step::Exited(status),
            };

            match step {
                Step::Deadline => {
                    for reader in &readers {
                        reader.abort();
                    }
                    tracing::warn!(run_id, command, "command timed out; terminating");
                    terminate_in_background(child, self.kill_grace);
                    absorb_pending(&mut capture, &mut chunk_rx);
                    guard.disarm();
                    sink.emit(OutputEvent::final_event(run_id));
                    return ExecutionResult::timed_out(
                        run_id,
                        capture.stdout,
                        timeout,
                        started.elapsed(),
                    );
                }
                Step::Chunk(Some((stream, bytes))) => {
                    let text = capture.push(stream, &bytes);
                    if !text.is_empty() {
                        sink.emit(OutputEvent::chunk(run_id, stream, text));
                    }
                }
                Step::Chunk(None) => {
                    streams_open = false;
                    for stream in [OutputStream::Stdout, OutputStream::Stderr] {
                        let tail = capture.finish(stream);
                        if !tail.is_empty() {
                            sink.emit(OutputEvent::chunk(run_id, stream, tail));
                        }
                    }
                }
                Step::Exited(status) => exit = Some(status),
            }
        }

        guard.disarm();
        sink.emit(OutputEvent::final_event(run_id));
        let elapsed = started.elapsed();
        let Capture { stdout, stderr, .. } = capture;
        let exit = exit.unwrap_or_else(|| Err(io::Error::other("process status unavailable")));
        match exit {
            Ok(status) if status.success() => {
                tracing::debug!(run_id, elapsed_ms = elapsed.as_millis() as u64, "command succeeded");
                ExecutionResult::succeeded(run_id, stdout, stderr, elapsed)
            }
            Ok(status) => {
                tracing::debug!(run_id, code = ?status.code(), "command failed");
                ExecutionResult::failed(
                    run_id,
                    stdout,
                    stderr,
                    status.code(),
                    exit_description(&status),
                    elapsed,
                )
            }
            Err(err) => {
                tracing::warn!(run_id, error = %err, "waiting on command failed");
                ExecutionResult::failed(
                    run_id,
                    stdout,
                    stderr,
                    None,
                    format!("failed to wait for command: {err}"),
                    elapsed,
                )
            }
        }
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &mut self,
        command: &str,
        timeout: Duration,
        sink: &dyn OutputSink,
    ) -> ExecutionResult {
        ProcessRunner::run(self, command, timeout, sink).await
    }
}
