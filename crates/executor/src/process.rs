//! Process-backed tool runner for native platforms.

use chartkit_traits::{ToolError, ToolInvocation, ToolOutput, ToolRunner};
use std::ffi::OsString;
use std::process::Command;

/// Environment variable that overrides the interpreter.
pub const PYTHON_ENV_VAR: &str = "CHARTKIT_PYTHON";
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Runs each invocation as `<interpreter> <script> <args...>` and waits for it.
///
/// There is no timeout: a hung script blocks the caller.
#[derive(Debug, Clone)]
pub struct ProcessToolRunner {
    interpreter: OsString,
}

impl ProcessToolRunner {
    pub fn new(interpreter: impl Into<OsString>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    /// Uses `CHARTKIT_PYTHON` if set, else `python3`.
    pub fn from_env() -> Self {
        let interpreter = std::env::var_os(PYTHON_ENV_VAR)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_INTERPRETER.into());
        Self::new(interpreter)
    }
}

impl Default for ProcessToolRunner {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ToolRunner for ProcessToolRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError> {
        let mut command = Command::new(&self.interpreter);
        command.arg(&invocation.script).args(&invocation.args);
        if let Some(dir) = &invocation.current_dir {
            command.current_dir(dir);
        }
        for (key, value) in &invocation.envs {
            command.env(key, value);
        }

        log::debug!(
            "Running {} {}",
            self.interpreter.to_string_lossy(),
            invocation
        );

        let output = command.output().map_err(|e| ToolError::Launch {
            program: format!("{} {}", self.interpreter.to_string_lossy(), invocation.script.display()),
            message: e.to_string(),
        })?;

        Ok(ToolOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn name(&self) -> &'static str {
        "ProcessToolRunner"
    }
}
