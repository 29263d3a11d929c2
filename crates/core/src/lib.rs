//! # chartkit-core
//!
//! Maintenance operations over the chart data of an unpacked presentation
//! template.
//!
//! - **workspace**: repository layout, config lookup, the chart-XML resolver
//! - **discovery**: `p<N>` / `chart<N>` directory scanning
//! - **filler**: per-page chart fills through `tools/fill_chart_xml.py`
//! - **preview**: chart previews, page-scoped or tree-scoped
//! - **build**: `make_data.py` then every chart's `fill.py`, per page
//! - **patch**: textual fixes to companion scripts
//! - **sync**: `original/` snapshot backfill
//! - **scaffold**: new page directories from the index manifest
//! - **validate**: the `validate.py` batch gate
//!
//! Every external program is reached through [`ToolRunner`], so this crate
//! never spawns a process itself.

pub mod build;
pub mod discovery;
pub mod error;
pub mod filler;
pub mod patch;
pub mod preview;
pub mod scaffold;
pub mod sync;
pub mod validate;
pub mod workspace;

pub use chartkit_traits::{PreviewRenderer, ToolInvocation, ToolOutput, ToolRunner};
pub use chartkit_types::{BuildMode, ChartId, PageId, ProjectConfig};

pub use build::{BuildReport, PageBuild, StepOutcome, build_all, build_page};
pub use discovery::{ChartDir, PageDir};
pub use error::ChartkitError;
pub use filler::{FillReport, FillTarget, fill_page, plan_targets};
pub use patch::{PatchOutcome, PatchReport, PatchRule, ScriptPatcher};
pub use preview::{PreviewReport, ToolPreviewRenderer, generate_page_previews, generate_tree_previews};
pub use scaffold::{ScaffoldOutcome, ScaffoldReport, scaffold_pages};
pub use sync::{SyncReport, sync_originals};
pub use validate::{ValidationReport, ValidationResult, run_validations};
pub use workspace::{Workspace, resolve_charts_dir};
