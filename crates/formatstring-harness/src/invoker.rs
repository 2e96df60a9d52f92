//! Subject process invocation.
//!
//! Each case runs `subject <format> <type-tag> <literal>` as a fresh
//! process. Stdout is decoded as Latin-1 so every byte maps to exactly one
//! character; stderr is decoded as lossy UTF-8 for diagnostics.
//!
//! With a timeout set, the whole invocation is bounded: a subject that
//! forks leaves its pipes open in the orphaned process, so the reader
//! threads are abandoned rather than joined once the deadline passes.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::canonical::literal_arg;
use crate::error::HarnessError;

/// How long readers may keep draining after the subject was killed.
const READER_GRACE: Duration = Duration::from_millis(50);

type ReadResult = std::io::Result<Vec<u8>>;

/// How the subject process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectStatus {
    Exited(i32),
    /// Terminated by a signal (no exit code).
    Signaled,
    /// Killed after exceeding the configured wait.
    TimedOut,
}

/// Captured result of one subject run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectOutput {
    pub status: SubjectStatus,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl SubjectOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == SubjectStatus::Exited(0)
    }

    /// Diagnostic text for a failed run.
    #[must_use]
    pub fn diagnostics(&self) -> String {
        match self.status {
            SubjectStatus::TimedOut => {
                format!("timed out after {}ms", self.duration.as_millis())
            }
            SubjectStatus::Signaled if self.stderr.is_empty() => {
                String::from("terminated by signal")
            }
            _ => self.stderr.clone(),
        }
    }

    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self.status {
            SubjectStatus::Exited(code) => Some(code),
            _ => None,
        }
    }
}

/// Launches the subject executable.
#[derive(Debug, Clone)]
pub struct SubjectInvoker {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl SubjectInvoker {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Bound the wait for each process.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run one case and wait for it.
    pub fn invoke(
        &self,
        format: &str,
        tag: &str,
        literal: &[u8],
    ) -> Result<SubjectOutput, HarnessError> {
        let started = Instant::now();
        let mut command = Command::new(&self.program);
        command
            .arg(format)
            .arg(tag)
            .arg(literal_arg(literal))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        let mut child = command.spawn().map_err(|source| HarnessError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let stdout = match child.stdout.take() {
            Some(stdout) => stdout,
            None => {
                terminate_and_reap(&mut child);
                return Err(HarnessError::StreamUnavailable("stdout"));
            }
        };
        let stderr = match child.stderr.take() {
            Some(stderr) => stderr,
            None => {
                terminate_and_reap(&mut child);
                return Err(HarnessError::StreamUnavailable("stderr"));
            }
        };
        let stdout_reader = spawn_reader(stdout);
        let stderr_reader = spawn_reader(stderr);

        let waited = match self.timeout {
            Some(limit) => wait_bounded(&mut child, limit),
            None => child.wait().map(Some),
        };
        let deadline = match (&waited, self.timeout) {
            (Ok(Some(_)), Some(limit)) => {
                Some((started + limit).max(Instant::now() + READER_GRACE))
            }
            (_, Some(_)) | (Err(_), None) => Some(Instant::now() + READER_GRACE),
            (Ok(_), None) => None,
        };
        let stdout = collect_reader(&stdout_reader, deadline, "stdout")?;
        let stderr = collect_reader(&stderr_reader, deadline, "stderr")?;

        let status = match (waited?, &stdout, &stderr) {
            (Some(status), Some(_), Some(_)) => exit_status(status),
            // Killed, or exited while something it spawned holds the pipes.
            _ => SubjectStatus::TimedOut,
        };
        let stdout = stdout.unwrap_or_default();
        let stderr = stderr.unwrap_or_default();
        let stderr = if status == SubjectStatus::Exited(0) {
            String::new()
        } else {
            String::from_utf8_lossy(&stderr).into_owned()
        };

        Ok(SubjectOutput {
            status,
            stdout: latin1(&stdout),
            stderr,
            duration: started.elapsed(),
        })
    }
}

/// Decode bytes so each byte is the code point of the same value.
#[must_use]
pub fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn spawn_reader<R: Read + Send + 'static>(mut stream: R) -> Receiver<ReadResult> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let result = stream.read_to_end(&mut buf).map(|_| buf);
        let _ = tx.send(result);
    });
    rx
}

/// Wait for a reader until `deadline`; `Ok(None)` means it was abandoned.
fn collect_reader(
    reader: &Receiver<ReadResult>,
    deadline: Option<Instant>,
    name: &'static str,
) -> Result<Option<Vec<u8>>, HarnessError> {
    let received = match deadline {
        Some(deadline) => {
            reader.recv_timeout(deadline.saturating_duration_since(Instant::now()))
        }
        None => reader.recv().map_err(|_| RecvTimeoutError::Disconnected),
    };
    match received {
        Ok(bytes) => Ok(Some(bytes?)),
        Err(RecvTimeoutError::Timeout) => Ok(None),
        Err(RecvTimeoutError::Disconnected) => Err(HarnessError::ReaderPanicked(name)),
    }
}

/// Poll until exit or `limit`; `Ok(None)` means the child was killed.
fn wait_bounded(child: &mut Child, limit: Duration) -> std::io::Result<Option<ExitStatus>> {
    let started = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status)),
            Ok(None) => {}
            Err(err) => {
                terminate_and_reap(child);
                return Err(err);
            }
        }
        if started.elapsed() >= limit {
            terminate_and_reap(child);
            return Ok(None);
        }
        std::thread::sleep(Duration::from_millis(1));
    }
}

fn terminate_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn exit_status(status: ExitStatus) -> SubjectStatus {
    status
        .code()
        .map_or(SubjectStatus::Signaled, SubjectStatus::Exited)
}
