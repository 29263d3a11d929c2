//! Repository layout and the chart-XML path resolver.

use crate::discovery::{self, PageDir};
use crate::error::ChartkitError;
use chartkit_source::{load_config_or_default, load_merged_config};
use chartkit_types::{PageId, ProjectConfig};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.yaml";
pub const TOOLS_DIR: &str = "tools";

/// Resolves the directory holding the template's chart XML parts.
///
/// Prefers `<template_root>/ppt/charts` and falls back to
/// `<template_root>/charts`. Never fails: whether the returned directory
/// exists is the caller's concern.
pub fn resolve_charts_dir(repo_root: &Path, config: &ProjectConfig) -> PathBuf {
    let template_root = config.template_root(repo_root);
    let primary = template_root.join("ppt").join("charts");
    if primary.is_dir() {
        primary
    } else {
        template_root.join("charts")
    }
}

/// An opened repository: its absolute root and its repository-level config.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    config: ProjectConfig,
}

impl Workspace {
    /// Opens `root`, loading `config.yaml` softly (missing or broken → defaults).
    pub fn open(root: impl AsRef<Path>) -> Self {
        let root = absolute(root.as_ref());
        let config = load_config_or_default(&root.join(CONFIG_FILE));
        Self { root, config }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn pages_root(&self) -> PathBuf {
        self.config.pages_root(&self.root)
    }

    pub fn charts_dir(&self) -> PathBuf {
        resolve_charts_dir(&self.root, &self.config)
    }

    pub fn tool(&self, name: &str) -> PathBuf {
        self.root.join(TOOLS_DIR).join(name)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("output").join("index.json")
    }

    pub fn page_dir(&self, page: PageId) -> PathBuf {
        self.pages_root().join(page.dir_name())
    }

    /// Repository config with the page's own `config.yaml` laid over it.
    pub fn page_config(&self, page: PageId) -> ProjectConfig {
        load_merged_config(
            &self.root.join(CONFIG_FILE),
            &self.page_dir(page).join(CONFIG_FILE),
        )
    }

    /// Every page directory under the pages root.
    pub fn pages(&self) -> Result<Vec<PageDir>, ChartkitError> {
        discovery::discover_pages(&self.pages_root())
    }

    /// A single existing page directory.
    pub fn page(&self, page: PageId) -> Result<PageDir, ChartkitError> {
        let path = self.page_dir(page);
        if path.is_dir() {
            Ok(PageDir { id: page, path })
        } else {
            Err(ChartkitError::PageNotFound(page))
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
