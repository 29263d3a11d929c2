//! PreviewRenderer trait for the chart preview image step.

use crate::tool::ToolError;
use std::fmt::Debug;
use std::path::Path;
use thiserror::Error;

/// File name of the cached render inside a chart directory.
pub const PREVIEW_FILE_NAME: &str = "preview_original.png";

#[derive(Error, Debug, Clone)]
pub enum PreviewError {
    #[error("Preview tool could not run: {0}")]
    Tool(#[from] ToolError),

    #[error("Preview rendering failed for '{chart}': {message}")]
    Failed { chart: String, message: String },
}

/// Renders the preview image(s) for one chart directory.
///
/// Implementations write their output into the chart directory; the caller
/// only looks at the result.
pub trait PreviewRenderer: Debug {
    fn render(&self, chart_dir: &Path) -> Result<(), PreviewError>;
}
