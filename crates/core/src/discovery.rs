//! Directory-name discovery of pages and charts.
//!
//! The repository has no index of its own pages; the `p<N>` / `chart<N>`
//! directory names are the index. This module is the only place that scans
//! for them. Results are ordered by directory name (lexicographic), so
//! `chart10` comes before `chart2`.

use crate::error::ChartkitError;
use chartkit_types::{ChartId, PageId};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A page directory on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDir {
    pub id: PageId,
    pub path: PathBuf,
}

impl PageDir {
    /// Chart subdirectories of this page, in name order.
    pub fn charts(&self) -> Result<Vec<ChartDir>, ChartkitError> {
        discover_charts(&self.path)
    }

    /// Path of a companion script (`make_data.py`, `validate.py`, ...).
    pub fn script(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

/// A chart directory inside a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartDir {
    pub id: ChartId,
    pub path: PathBuf,
}

/// Lists subdirectories of `dir` whose names parse with `parse`.
///
/// A missing `dir` yields an empty list.
fn scan<T>(dir: &Path, parse: fn(&str) -> Option<T>) -> Result<Vec<(String, T, PathBuf)>, ChartkitError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("'{}' does not exist; nothing to scan.", dir.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(ChartkitError::io(dir)(e)),
    };

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(ChartkitError::io(dir))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if let Some(id) = parse(&name) {
            found.push((name, id, path));
        }
    }
    found.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(found)
}

pub fn discover_pages(pages_root: &Path) -> Result<Vec<PageDir>, ChartkitError> {
    Ok(scan(pages_root, PageId::from_dir_name)?
        .into_iter()
        .map(|(_, id, path)| PageDir { id, path })
        .collect())
}

pub fn discover_charts(page_dir: &Path) -> Result<Vec<ChartDir>, ChartkitError> {
    Ok(scan(page_dir, ChartId::from_dir_name)?
        .into_iter()
        .map(|(_, id, path)| ChartDir { id, path })
        .collect())
}
