//! Backfills each chart's `original/` mirror from its root-level snapshots.

use crate::discovery::ChartDir;
use crate::error::ChartkitError;
use crate::workspace::Workspace;
use chartkit_types::PageId;
use std::fs;
use std::path::PathBuf;

pub const ORIGINAL_DIR: &str = "original";

pub const SNAPSHOT_FILES: [&str; 4] = [
    "original_meta.json",
    "original_labels.json",
    "original_series.json",
    "original_scatter.json",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub charts: usize,
    pub copied: Vec<PathBuf>,
    pub failures: Vec<(PathBuf, String)>,
}

fn sync_chart(chart: &ChartDir, report: &mut SyncReport) -> Result<(), ChartkitError> {
    let mirror = chart.path.join(ORIGINAL_DIR);
    fs::create_dir_all(&mirror).map_err(ChartkitError::io(&mirror))?;

    for name in SNAPSHOT_FILES {
        let source = chart.path.join(name);
        let dest = mirror.join(name);
        if !source.is_file() || dest.exists() {
            continue;
        }
        fs::copy(&source, &dest).map_err(ChartkitError::io(&dest))?;
        log::debug!("[SYNC] {} -> {}", source.display(), dest.display());
        report.copied.push(dest);
    }
    Ok(())
}

/// Copies missing snapshot files into `<chart>/original/` for every chart of
/// the selected pages (all pages when `pages` is `None`). Existing copies are
/// never overwritten.
pub fn sync_originals(
    ws: &Workspace,
    pages: Option<&[PageId]>,
) -> Result<SyncReport, ChartkitError> {
    let selected = match pages {
        Some(ids) => ids.iter().map(|&id| ws.page(id)).collect::<Result<Vec<_>, _>>()?,
        None => ws.pages()?,
    };

    let mut report = SyncReport::default();
    for page in selected {
        for chart in page.charts()? {
            report.charts += 1;
            if let Err(e) = sync_chart(&chart, &mut report) {
                log::error!("[SYNC] {}/{}: {}", page.id, chart.id, e);
                report.failures.push((chart.path.clone(), e.to_string()));
            }
        }
    }

    log::info!(
        "[SYNC] Copied {} file(s) across {} chart(s).",
        report.copied.len(),
        report.charts
    );
    Ok(report)
}
