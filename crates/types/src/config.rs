//! Configuration data for the repository and for individual pages.
//!
//! Every section is `#[serde(default)]`: a partial `config.yaml` fills the
//! rest from the built-in defaults, and unknown keys are ignored.

use crate::ids::PageId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_TEMPLATE_ROOT: &str = "input/LRTBH-unzip";
pub const DEFAULT_PAGES_ROOT: &str = "charts";

/// Top-level `config.yaml` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub project: ProjectSection,
    pub data_sources: DataSourcesSection,
    pub output: OutputSection,
    pub fill_policy: FillPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSection {
    /// Root of the unpacked document package.
    pub template_root: String,
    /// Directory holding the `p<N>` page directories.
    pub pages_root: String,
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            template_root: DEFAULT_TEMPLATE_ROOT.to_string(),
            pages_root: DEFAULT_PAGES_ROOT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSourcesSection {
    pub metrics_db: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Chart directory names whose XML is replaced by a fill.
    pub replace_charts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_mode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillPolicy {
    pub keep_original_for_missing: bool,
    pub axis_day_base: i64,
}

impl Default for FillPolicy {
    fn default() -> Self {
        Self {
            keep_original_for_missing: true,
            axis_day_base: 1,
        }
    }
}

/// Joins `value` onto `root` unless it is already absolute.
pub fn resolve_against(root: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

impl ProjectConfig {
    pub fn template_root(&self, repo_root: &Path) -> PathBuf {
        resolve_against(repo_root, &self.project.template_root)
    }

    pub fn pages_root(&self, repo_root: &Path) -> PathBuf {
        resolve_against(repo_root, &self.project.pages_root)
    }

    pub fn metrics_db_path(&self, repo_root: &Path) -> Option<PathBuf> {
        self.data_sources
            .metrics_db
            .as_deref()
            .map(|db| resolve_against(repo_root, db))
    }

    /// The configured final mode, if it names a valid [`BuildMode`].
    pub fn final_mode(&self) -> Option<BuildMode> {
        self.output.final_mode.as_deref()?.parse().ok()
    }
}

/// The `config.yaml` written into a freshly scaffolded page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub page: PageId,
    pub output: OutputSection,
}

/// Which data set downstream scripts should render.
///
/// The orchestrator forwards this to page scripts and never interprets it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Modified,
    Original,
    #[default]
    Both,
}

impl BuildMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildMode::Modified => "modified",
            BuildMode::Original => "original",
            BuildMode::Both => "both",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBuildMode(pub String);

impl fmt::Display for InvalidBuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid mode '{}' (expected modified, original or both)",
            self.0
        )
    }
}

impl std::error::Error for InvalidBuildMode {}

impl FromStr for BuildMode {
    type Err = InvalidBuildMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "modified" => Ok(BuildMode::Modified),
            "original" => Ok(BuildMode::Original),
            "both" => Ok(BuildMode::Both),
            _ => Err(InvalidBuildMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: ProjectConfig = serde_yaml::from_str(
            "output:\n  replace_charts: [chart8]\nunknown_section: 3\n",
        )
        .unwrap();

        assert_eq!(config.project.template_root, DEFAULT_TEMPLATE_ROOT);
        assert_eq!(config.project.pages_root, DEFAULT_PAGES_ROOT);
        assert_eq!(config.output.replace_charts, vec!["chart8".to_string()]);
        assert!(config.fill_policy.keep_original_for_missing);
        assert_eq!(config.fill_policy.axis_day_base, 1);
    }

    #[test]
    fn test_paths_resolve_against_root() {
        let mut config = ProjectConfig::default();
        config.data_sources.metrics_db = Some("data/metrics.db".into());
        let root = Path::new("/repo");

        assert_eq!(
            config.template_root(root),
            PathBuf::from("/repo/input/LRTBH-unzip")
        );
        assert_eq!(
            config.metrics_db_path(root),
            Some(PathBuf::from("/repo/data/metrics.db"))
        );

        config.project.template_root = "/abs/template".into();
        assert_eq!(config.template_root(root), PathBuf::from("/abs/template"));
    }

    #[test]
    fn test_build_mode_parsing() {
        assert_eq!("modified".parse::<BuildMode>().unwrap(), BuildMode::Modified);
        assert_eq!("BOTH".parse::<BuildMode>().unwrap(), BuildMode::Both);
        assert!("final".parse::<BuildMode>().is_err());
        assert_eq!(BuildMode::default(), BuildMode::Both);

        let mut config = ProjectConfig::default();
        config.output.final_mode = Some("original".into());
        assert_eq!(config.final_mode(), Some(BuildMode::Original));
        config.output.final_mode = Some("nonsense".into());
        assert_eq!(config.final_mode(), None);
    }

    #[test]
    fn test_page_config_yaml_shape() {
        let config = PageConfig {
            page: PageId::new(12),
            output: OutputSection {
                replace_charts: vec!["chart3".into()],
                final_mode: None,
            },
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("page: p12"));
        assert!(yaml.contains("- chart3"));
        assert!(!yaml.contains("final_mode"));
    }
}
