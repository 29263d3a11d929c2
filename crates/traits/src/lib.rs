pub mod preview;
pub mod tool;

pub use preview::{PREVIEW_FILE_NAME, PreviewError, PreviewRenderer};
pub use tool::{ScriptedToolRunner, ToolError, ToolInvocation, ToolOutput, ToolRunner};
