//! Chart preview generation, for one page or for the whole tree.

use crate::discovery::{ChartDir, PageDir};
use crate::error::ChartkitError;
use crate::workspace::Workspace;
use chartkit_traits::{PREVIEW_FILE_NAME, PreviewError, PreviewRenderer, ToolInvocation, ToolRunner};
use chartkit_types::PageId;
use std::path::{Path, PathBuf};

pub const PREVIEW_TOOL: &str = "gen_preview_chart.py";

/// Renders previews by running `tools/gen_preview_chart.py --chart-dir <dir>`.
#[derive(Debug)]
pub struct ToolPreviewRenderer<'a> {
    runner: &'a dyn ToolRunner,
    script: PathBuf,
    working_dir: PathBuf,
}

impl<'a> ToolPreviewRenderer<'a> {
    pub fn new(ws: &Workspace, runner: &'a dyn ToolRunner) -> Self {
        Self {
            runner,
            script: ws.tool(PREVIEW_TOOL),
            working_dir: ws.root().to_path_buf(),
        }
    }
}

impl PreviewRenderer for ToolPreviewRenderer<'_> {
    fn render(&self, chart_dir: &Path) -> Result<(), PreviewError> {
        let invocation = ToolInvocation::new(&self.script)
            .arg("--chart-dir")
            .arg(chart_dir)
            .current_dir(&self.working_dir);
        let output = self.runner.run(&invocation)?;
        if output.is_success() {
            Ok(())
        } else {
            Err(PreviewError::Failed {
                chart: chart_dir.display().to_string(),
                message: output.reason().to_string(),
            })
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewReport {
    /// Chart directories visited.
    pub total: usize,
    pub generated: usize,
    /// Charts whose preview was already on disk (tree mode only).
    pub skipped: usize,
    pub failures: Vec<(PathBuf, String)>,
}

impl PreviewReport {
    fn absorb(&mut self, other: PreviewReport) {
        self.total += other.total;
        self.generated += other.generated;
        self.skipped += other.skipped;
        self.failures.extend(other.failures);
    }
}

fn render_charts(
    renderer: &dyn PreviewRenderer,
    charts: &[ChartDir],
    skip_cached: bool,
) -> PreviewReport {
    let mut report = PreviewReport::default();
    for chart in charts {
        report.total += 1;
        if skip_cached && chart.path.join(PREVIEW_FILE_NAME).exists() {
            log::debug!("[PREVIEW] '{}' already has a preview.", chart.path.display());
            report.skipped += 1;
            continue;
        }
        match renderer.render(&chart.path) {
            Ok(()) => {
                log::info!("[PREVIEW] Generated preview for '{}'.", chart.path.display());
                report.generated += 1;
            }
            Err(e) => {
                log::error!("[PREVIEW] '{}': {}", chart.path.display(), e);
                report.failures.push((chart.path.clone(), e.to_string()));
            }
        }
    }
    report
}

/// Renders every chart of one page. Existing previews are regenerated.
pub fn generate_page_previews(
    ws: &Workspace,
    renderer: &dyn PreviewRenderer,
    page: PageId,
) -> Result<PreviewReport, ChartkitError> {
    let page = ws.page(page)?;
    Ok(render_charts(renderer, &page.charts()?, false))
}

/// Renders every chart of every page, skipping charts that already have a
/// `preview_original.png`.
pub fn generate_tree_previews(
    ws: &Workspace,
    renderer: &dyn PreviewRenderer,
) -> Result<PreviewReport, ChartkitError> {
    let mut report = PreviewReport::default();
    for page in ws.pages()? {
        report.absorb(render_page_cached(renderer, &page));
    }
    Ok(report)
}

fn render_page_cached(renderer: &dyn PreviewRenderer, page: &PageDir) -> PreviewReport {
    match page.charts() {
        Ok(charts) => render_charts(renderer, &charts, true),
        Err(e) => {
            log::error!("[PREVIEW] Cannot list charts of {}: {}", page.id, e);
            PreviewReport {
                failures: vec![(page.path.clone(), e.to_string())],
                ..Default::default()
            }
        }
    }
}
