//! Running generated scripts under a deadline.
//!
//! `OsascriptRunner` spawns the interpreter with the script as an inline
//! argument, drains stdout/stderr on helper threads, and polls the child until
//! it exits or the deadline passes. On expiry the child is killed and reaped.
//!
//! CHANGELOG:
//! - 02/13/2026 - Real timeout: poll + kill instead of trusting osascript
//! - 02/12/2026 - Initial implementation

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{ImsgError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Phrases osascript prints when the buddy or chat doesn't resolve.
pub const RECIPIENT_NOT_FOUND_MARKERS: &[&str] =
    &["Can't get buddy", "Can't get participant", "Can't get chat"];

/// Executes a script and reports its combined output.
pub trait ScriptRunner {
    /// Run `script`, giving up after `timeout`. Returns trimmed combined output.
    ///
    /// Combined output is stdout followed by stderr, not interleaved in the
    /// order the interpreter wrote them.
    fn run(&self, script: &str, timeout: Duration) -> Result<String>;

    /// Whether this runner can work on the current OS.
    fn platform_supported(&self) -> bool {
        cfg!(target_os = "macos")
    }
}

/// Runs scripts through `osascript -e <script>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsascriptRunner {
    program: String,
    inline_flag: String,
}

impl Default for OsascriptRunner {
    fn default() -> Self {
        Self::new("osascript", "-e")
    }
}

impl OsascriptRunner {
    /// Use a different interpreter, e.g. a wrapper script around osascript.
    pub fn new(program: impl Into<String>, inline_flag: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            inline_flag: inline_flag.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl ScriptRunner for OsascriptRunner {
    fn run(&self, script: &str, timeout: Duration) -> Result<String> {
        let mut child = Command::new(&self.program)
            .arg(&self.inline_flag)
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ImsgError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        // Readers are left detached on timeout: a grandchild may still hold the pipes.
        let Some(status) = wait_with_deadline(&mut child, timeout, &self.program)? else {
            warn!(program = %self.program, ?timeout, "imsg: killed script after deadline");
            return Err(ImsgError::ScriptTimeout { timeout });
        };

        let output = combine(join(stdout), join(stderr));
        if status.success() {
            Ok(output)
        } else {
            Err(classify_failure(status, output))
        }
    }
}

/// `Ok(None)` means the deadline passed and the child was killed.
fn wait_with_deadline(
    child: &mut Child,
    timeout: Duration,
    program: &str,
) -> Result<Option<ExitStatus>> {
    let started = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status)),
            Ok(None) if started.elapsed() >= timeout => {
                let _ = child.kill();
                let _ = child.wait();
                return Ok(None);
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(source) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ImsgError::Spawn {
                    program: program.to_string(),
                    source,
                });
            }
        }
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn join(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

fn combine(stdout: String, stderr: String) -> String {
    let stdout = stdout.trim();
    let stderr = stderr.trim();
    match (stdout.is_empty(), stderr.is_empty()) {
        (true, _) => stderr.to_string(),
        (_, true) => stdout.to_string(),
        _ => format!("{}\n{}", stdout, stderr),
    }
}

fn classify_failure(status: ExitStatus, output: String) -> ImsgError {
    debug!(%status, output = %output, "imsg: script failed");
    let status = status.to_string();
    if is_recipient_not_found(&output) {
        ImsgError::RecipientNotFound { status, output }
    } else {
        ImsgError::ScriptFailed { status, output }
    }
}

/// True when interpreter output says the buddy or chat couldn't be resolved.
pub fn is_recipient_not_found(output: &str) -> bool {
    RECIPIENT_NOT_FOUND_MARKERS
        .iter()
        .any(|marker| output.contains(marker))
}
