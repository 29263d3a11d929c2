//! # chartkit
//!
//! Maintenance utilities for the chart data of an unpacked presentation
//! template. The operations live in `chartkit-core`; this crate bundles them
//! with the process-backed tool runner and the `chartkit` binary.

pub use chartkit_core::*;
pub use chartkit_executor::{DEFAULT_INTERPRETER, PYTHON_ENV_VAR, ProcessToolRunner};
pub use chartkit_source as source;
pub use chartkit_traits::ScriptedToolRunner;
pub use chartkit_types as types;
