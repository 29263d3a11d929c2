//! Page build orchestration: data generation, then one fill script per chart.
//!
//! Every step is isolated. A failing `make_data.py` or chart `fill.py` is
//! logged and recorded in the report, and the build moves on.

use crate::discovery::PageDir;
use crate::error::ChartkitError;
use crate::workspace::Workspace;
use chartkit_traits::{ToolInvocation, ToolRunner};
use chartkit_types::{BuildMode, ChartId, PageId, ProjectConfig};
use std::path::Path;

pub const MAKE_DATA_SCRIPT: &str = "make_data.py";
pub const FILL_SCRIPT: &str = "fill.py";

pub const MODE_ENV: &str = "CHARTKIT_MODE";
pub const KEEP_ORIGINAL_ENV: &str = "CHARTKIT_KEEP_ORIGINAL_FOR_MISSING";
pub const AXIS_DAY_BASE_ENV: &str = "CHARTKIT_AXIS_DAY_BASE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded,
    /// The script ran and exited non-zero, or could not be launched.
    Failed(String),
    /// The script file does not exist.
    Missing,
}

impl StepOutcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self, StepOutcome::Succeeded)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartStep {
    pub chart: ChartId,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBuild {
    pub page: PageId,
    /// `None` when the page has no `make_data.py`.
    pub data_step: Option<StepOutcome>,
    pub charts: Vec<ChartStep>,
}

impl PageBuild {
    pub fn failures(&self) -> usize {
        let data = self.data_step.as_ref().is_some_and(StepOutcome::is_failure) as usize;
        data + self.charts.iter().filter(|c| c.outcome.is_failure()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub mode: BuildMode,
    pub pages: Vec<PageBuild>,
    /// Pages that could not be built at all (missing or unreadable).
    pub skipped: Vec<(PageId, String)>,
}

impl BuildReport {
    pub fn failures(&self) -> usize {
        self.pages.iter().map(PageBuild::failures).sum::<usize>() + self.skipped.len()
    }
}

fn script_env(invocation: ToolInvocation, mode: BuildMode, config: &ProjectConfig) -> ToolInvocation {
    invocation
        .env(MODE_ENV, mode.as_str())
        .env(
            KEEP_ORIGINAL_ENV,
            config.fill_policy.keep_original_for_missing.to_string(),
        )
        .env(AXIS_DAY_BASE_ENV, config.fill_policy.axis_day_base.to_string())
}

fn run_step(
    runner: &dyn ToolRunner,
    script: &Path,
    working_dir: &Path,
    mode: BuildMode,
    config: &ProjectConfig,
) -> StepOutcome {
    if !script.is_file() {
        return StepOutcome::Missing;
    }
    let invocation = script_env(ToolInvocation::new(script).current_dir(working_dir), mode, config);
    match runner.run(&invocation) {
        Ok(output) if output.is_success() => {
            let stdout = output.stdout.trim();
            if !stdout.is_empty() {
                log::debug!("[BUILD] {}: {}", script.display(), stdout);
            }
            StepOutcome::Succeeded
        }
        Ok(output) => StepOutcome::Failed(format!(
            "exit code {}: {}",
            output.code.map_or_else(|| "none".to_string(), |c| c.to_string()),
            output.reason()
        )),
        Err(e) => StepOutcome::Failed(e.to_string()),
    }
}

/// Builds one page: `make_data.py` (if present), then each chart's `fill.py`
/// in chart-name order.
pub fn build_page(
    ws: &Workspace,
    runner: &dyn ToolRunner,
    page: &PageDir,
    mode: BuildMode,
) -> Result<PageBuild, ChartkitError> {
    let config = ws.page_config(page.id);
    log::info!("[BUILD] {} (mode: {})", page.id, mode);

    let make_data = page.script(MAKE_DATA_SCRIPT);
    let data_step = if make_data.is_file() {
        let outcome = run_step(runner, &make_data, &page.path, mode, &config);
        if let StepOutcome::Failed(reason) = &outcome {
            log::error!("[BUILD] {}: {} failed: {}", page.id, MAKE_DATA_SCRIPT, reason);
        }
        Some(outcome)
    } else {
        None
    };

    let mut charts = Vec::new();
    for chart in page.charts()? {
        let outcome = run_step(runner, &chart.path.join(FILL_SCRIPT), &chart.path, mode, &config);
        match &outcome {
            StepOutcome::Succeeded => log::info!("[BUILD] {}/{} filled.", page.id, chart.id),
            StepOutcome::Failed(reason) => {
                log::error!("[BUILD] {}/{}: {} failed: {}", page.id, chart.id, FILL_SCRIPT, reason)
            }
            StepOutcome::Missing => {
                log::warn!("[BUILD] {}/{}: no {}.", page.id, chart.id, FILL_SCRIPT)
            }
        }
        charts.push(ChartStep {
            chart: chart.id,
            outcome,
        });
    }

    Ok(PageBuild {
        page: page.id,
        data_step,
        charts,
    })
}

/// Builds the selected pages, or every page when `pages` is `None`.
pub fn build_all(
    ws: &Workspace,
    runner: &dyn ToolRunner,
    mode: BuildMode,
    pages: Option<&[PageId]>,
) -> Result<BuildReport, ChartkitError> {
    let mut report = BuildReport {
        mode,
        pages: Vec::new(),
        skipped: Vec::new(),
    };

    let selected: Vec<Result<PageDir, (PageId, ChartkitError)>> = match pages {
        Some(ids) => ids.iter().map(|&id| ws.page(id).map_err(|e| (id, e))).collect(),
        None => ws.pages()?.into_iter().map(Ok).collect(),
    };

    for page in selected {
        let result = page.and_then(|page| build_page(ws, runner, &page, mode).map_err(|e| (page.id, e)));
        match result {
            Ok(build) => report.pages.push(build),
            Err((id, e)) => {
                log::error!("[BUILD] {}: {}", id, e);
                report.skipped.push((id, e.to_string()));
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartkit_traits::{ScriptedToolRunner, ToolError, ToolOutput};
    use std::fs;
    use tempfile::tempdir;

    fn page_with_charts(ws: &Workspace, page: u32, charts: &[&str]) -> PageDir {
        let id = PageId::new(page);
        let path = ws.page_dir(id);
        for chart in charts {
            let dir = path.join(chart);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(FILL_SCRIPT), "print('fill')").unwrap();
        }
        fs::create_dir_all(&path).unwrap();
        PageDir { id, path }
    }

    #[test]
    fn test_build_continues_past_failures() {
        let dir = tempdir().unwrap();
        let ws = Workspace::open(dir.path());
        let page = page_with_charts(&ws, 3, &["chart1", "chart2", "chart3"]);
        fs::write(page.script(MAKE_DATA_SCRIPT), "raise SystemExit(1)").unwrap();
        fs::remove_file(page.path.join("chart3").join(FILL_SCRIPT)).unwrap();

        let runner = ScriptedToolRunner::new(|inv| {
            if inv.script.ends_with(MAKE_DATA_SCRIPT) {
                Ok(ToolOutput::failure(1, "no data"))
            } else if inv.script.parent().is_some_and(|p| p.ends_with("chart1")) {
                Err(ToolError::Launch {
                    program: "python3".into(),
                    message: "not found".into(),
                })
            } else {
                Ok(ToolOutput::success(""))
            }
        });

        let build = build_page(&ws, &runner, &page, BuildMode::Both).unwrap();

        assert!(matches!(build.data_step, Some(StepOutcome::Failed(ref r)) if r.contains("no data")));
        assert!(matches!(build.charts[0].outcome, StepOutcome::Failed(_)));
        assert_eq!(build.charts[1].outcome, StepOutcome::Succeeded);
        assert_eq!(build.charts[2].outcome, StepOutcome::Missing);
        assert_eq!(build.failures(), 3);
        // make_data + chart1 + chart2; chart3 has no script to run.
        assert_eq!(runner.call_count(), 3);
    }

    #[test]
    fn test_failure_reason_uses_stdout_when_stderr_is_empty() {
        let dir = tempdir().unwrap();
        let ws = Workspace::open(dir.path());
        let page = page_with_charts(&ws, 2, &["chart1"]);

        let runner = ScriptedToolRunner::new(|_| {
            Ok(ToolOutput {
                code: Some(1),
                stdout: "series.json has 3 rows, expected 4\n".to_string(),
                stderr: String::new(),
            })
        });
        let build = build_page(&ws, &runner, &page, BuildMode::Both).unwrap();

        assert_eq!(
            build.charts[0].outcome,
            StepOutcome::Failed("exit code 1: series.json has 3 rows, expected 4".to_string())
        );
    }

    #[test]
    fn test_mode_and_policy_are_passed_through() {
        let dir = tempdir().unwrap();
        let ws = Workspace::open(dir.path());
        let page = page_with_charts(&ws, 1, &["chart1"]);
        fs::write(
            page.path.join("config.yaml"),
            "fill_policy:\n  keep_original_for_missing: false\n  axis_day_base: 0\n",
        )
        .unwrap();

        let runner = ScriptedToolRunner::succeeding();
        build_page(&ws, &runner, &page, BuildMode::Original).unwrap();

        let call = &runner.calls()[0];
        assert_eq!(call.current_dir.as_deref(), Some(page.path.join("chart1").as_path()));
        assert!(call.envs.contains(&(MODE_ENV.to_string(), "original".to_string())));
        assert!(call.envs.contains(&(KEEP_ORIGINAL_ENV.to_string(), "false".to_string())));
        assert!(call.envs.contains(&(AXIS_DAY_BASE_ENV.to_string(), "0".to_string())));
    }

    #[test]
    fn test_build_all_records_missing_pages() {
        let dir = tempdir().unwrap();
        let ws = Workspace::open(dir.path());
        page_with_charts(&ws, 1, &["chart1"]);

        let runner = ScriptedToolRunner::succeeding();
        let report = build_all(
            &ws,
            &runner,
            BuildMode::Both,
            Some(&[PageId::new(1), PageId::new(9)]),
        )
        .unwrap();

        assert_eq!(report.pages.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, PageId::new(9));
        assert_eq!(report.failures(), 1);
    }
}
