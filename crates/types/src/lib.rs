pub mod config;
pub mod ids;
pub mod manifest;

pub use config::{
    BuildMode, DataSourcesSection, FillPolicy, OutputSection, PageConfig, ProjectConfig,
    ProjectSection,
};
pub use ids::{ChartId, InvalidName, PageId};
pub use manifest::{ChartRef, IndexManifest, SlideEntry};
