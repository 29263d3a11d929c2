// src/error.rs
//! Error types shared by every chartkit operation.

use chartkit_traits::ToolError;
use chartkit_types::PageId;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The main error enum for all high-level operations.
#[derive(Error, Debug)]
pub enum ChartkitError {
    #[error("Required input not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Page directory not found: {0}")]
    PageNotFound(PageId),

    #[error("Tool '{tool}' failed (exit code {}): {stderr}", .code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    ToolFailed {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Template rendering error: {0}")]
    Template(String),

    #[error("No validate.py scripts found")]
    NoValidationScripts,

    #[error("{failed} of {total} validation scripts failed")]
    ValidationFailed { failed: usize, total: usize },
}

impl ChartkitError {
    /// Adapter for `map_err` that attaches the path an I/O call was made on.
    pub fn io(path: &Path) -> impl FnOnce(io::Error) -> ChartkitError + '_ {
        move |source| ChartkitError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<handlebars::RenderError> for ChartkitError {
    fn from(e: handlebars::RenderError) -> Self {
        ChartkitError::Template(e.to_string())
    }
}
