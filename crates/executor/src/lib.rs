//! Tool runner implementations for chartkit.
//!
//! ## Available Runners
//!
//! - [`ProcessToolRunner`]: spawns the configured interpreter per invocation
//! - [`ScriptedToolRunner`]: in-memory runner (re-exported from chartkit-traits)
//!
//! ## Usage
//!
//! ```ignore
//! use chartkit_executor::ProcessToolRunner;
//! use chartkit_traits::{ToolInvocation, ToolRunner};
//!
//! let runner = ProcessToolRunner::from_env();
//! let output = runner.run(&ToolInvocation::new("tools/fill_chart_xml.py").arg("--help"))?;
//! ```

mod process;

pub use process::{DEFAULT_INTERPRETER, PYTHON_ENV_VAR, ProcessToolRunner};

// Re-export from chartkit-traits
pub use chartkit_traits::{ScriptedToolRunner, ToolRunner};
