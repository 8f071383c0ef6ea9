//! Subprocess spawning and termination helpers.

use std::io;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;

use super::events::OutputStream;

/// Size of each pipe read; chunks are forwarded as soon as they arrive.
const READ_CHUNK_BYTES: usize = 4096;

/// Shell interpreter used to run proposal command lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSpec {
    pub program: String,
    /// Arguments placed before the command line (e.g. `-c`).
    pub args: Vec<String>,
}

impl ShellSpec {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Platform default: `sh -c` on Unix, PowerShell elsewhere.
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            Self::new(
                "powershell.exe",
                vec!["-NoProfile".into(), "-Command".into()],
            )
        } else {
            Self::new("sh", vec!["-c".into()])
        }
    }

    /// Human-readable form used in messages, e.g. `sh -c`.
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            return self.program.clone();
        }
        format!("{} {}", self.program, self.args.join(" "))
    }
}

impl Default for ShellSpec {
    fn default() -> Self {
        Self::platform_default()
    }
}

/// Start `command` as a single command line under `shell`, with piped output.
pub(super) fn spawn_shell(shell: &ShellSpec, command: &str) -> io::Result<Child> {
    let mut cmd = Command::new(&shell.program);
    cmd.args(&shell.args)
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    // An abandoned run must not leave its process behind.
    cmd.kill_on_drop(true);
    #[cfg(unix)]
    cmd.process_group(0);
    cmd.spawn()
}

/// Forward raw reads from one pipe into the shared arrival-ordered channel.
pub(super) async fn pump_stream<R: AsyncRead + Unpin>(
    mut reader: R,
    stream: OutputStream,
    tx: mpsc::UnboundedSender<(OutputStream, Vec<u8>)>,
) {
    let mut chunk = [0u8; READ_CHUNK_BYTES];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                if tx.send((stream, chunk[..n].to_vec())).is_err() {
                    break;
                }
            }
            Err(err) => {
                tracing::debug!(?stream, error = %err, "output pipe read failed");
                break;
            }
        }
    }
}

#[cfg(unix)]
fn signal_group(child: &Child, signal: i32) {
    if let Some(pid) = child.id() {
        signal_group_of(pid, signal);
    }
}

/// Signal the process group led by `pid`.
#[cfg(unix)]
pub(super) fn signal_group_of(pid: u32, signal: i32) {
    // The child leads its own process group, so this reaches every
    // process the shell started.
    unsafe {
        libc::kill(-(pid as i32), signal);
    }
}

/// Ask the process (group) to stop now and escalate to a hard kill after
/// `grace` in the background. Returns immediately.
pub(super) fn terminate_in_background(mut child: Child, grace: Duration) {
    #[cfg(unix)]
    signal_group(&child, libc::SIGTERM);
    #[cfg(not(unix))]
    let _ = child.start_kill();

    tokio::spawn(async move {
        if tokio::time::timeout(grace, child.wait()).await.is_ok() {
            return;
        }
        #[cfg(unix)]
        signal_group(&child, libc::SIGKILL);
        let _ = child.kill().await;
        tracing::debug!("timed-out command ignored SIGTERM; killed");
    });
}

/// Message used when a process ends with a non-zero status.
pub(super) fn exit_description(status: &std::process::ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("Command exited with code {code}");
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("Command terminated by signal {signal}");
        }
    }
    "Command exited abnormally".to_string()
}
