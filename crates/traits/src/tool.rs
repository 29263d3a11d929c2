//! ToolRunner trait for abstracting external script invocations.
//!
//! Every external collaborator (the chart XML filler, the preview renderer,
//! page scripts, validation scripts) is reached through this trait, so the
//! orchestration logic never talks to `std::process` directly.

use std::ffi::{OsStr, OsString};
use std::fmt::{self, Debug};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Error type for tool invocations that could not produce an exit status.
#[derive(Error, Debug, Clone)]
pub enum ToolError {
    #[error("Failed to launch '{program}': {message}")]
    Launch { program: String, message: String },

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::Io(err.to_string())
    }
}

/// A single script invocation: the script path, its arguments, and the
/// process environment it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub script: PathBuf,
    pub args: Vec<OsString>,
    pub current_dir: Option<PathBuf>,
    pub envs: Vec<(String, String)>,
}

impl ToolInvocation {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
            args: Vec::new(),
            current_dir: None,
            envs: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Looks up the value passed for `--flag`, if any.
    pub fn flag_value(&self, flag: &str) -> Option<&OsStr> {
        let pos = self.args.iter().position(|a| a == flag)?;
        self.args.get(pos + 1).map(|v| v.as_os_str())
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.script.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Captured result of a finished tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code; `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// Trimmed stdout if non-empty, else trimmed stderr.
    pub fn reason(&self) -> &str {
        let out = self.stdout.trim();
        if out.is_empty() { self.stderr.trim() } else { out }
    }
}

/// A trait for running external scripts to completion.
///
/// # Implementations
///
/// - `ProcessToolRunner` (chartkit-executor): spawns a real interpreter process
/// - [`ScriptedToolRunner`]: records invocations and answers from a closure
pub trait ToolRunner: Debug {
    /// Run the invocation and block until it exits.
    ///
    /// A non-zero exit is *not* an error at this level; it is reported in
    /// [`ToolOutput::code`]. `Err` means no exit status could be obtained.
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError>;

    /// Returns a human-readable name for this runner (for logging/debugging).
    fn name(&self) -> &'static str;
}

type Responder = Box<dyn Fn(&ToolInvocation) -> Result<ToolOutput, ToolError> + Send + Sync>;

/// A tool runner that never spawns a process.
///
/// Every invocation is recorded, and the result comes from the responder
/// closure. Used by tests to stand in for the Python tooling.
pub struct ScriptedToolRunner {
    responder: Responder,
    calls: Mutex<Vec<ToolInvocation>>,
}

impl ScriptedToolRunner {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&ToolInvocation) -> Result<ToolOutput, ToolError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A runner whose every invocation exits 0 with empty output.
    pub fn succeeding() -> Self {
        Self::new(|_| Ok(ToolOutput::success("")))
    }

    /// All invocations seen so far, in call order.
    ///
    /// Returns an empty list if the lock is poisoned.
    pub fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl Debug for ScriptedToolRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedToolRunner")
            .field("calls", &self.call_count())
            .finish()
    }
}

impl ToolRunner for ScriptedToolRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(invocation.clone());
        }
        (self.responder)(invocation)
    }

    fn name(&self) -> &'static str {
        "ScriptedToolRunner"
    }
}
