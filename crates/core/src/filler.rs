//! Chart data filling: writes each chart's series/labels into its XML part.
//!
//! The XML rewriting itself is done by the external `fill_chart_xml.py`
//! tool. This module checks inputs, invokes the tool once per chart in the
//! given order, and stops the page at the first problem.

use crate::discovery;
use crate::error::ChartkitError;
use crate::workspace::{CONFIG_FILE, Workspace};
use chartkit_source::load_config_or_default;
use chartkit_traits::{ToolInvocation, ToolRunner};
use chartkit_types::{ChartId, PageId};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const FILL_TOOL: &str = "fill_chart_xml.py";
pub const SERIES_FILE: &str = "series.json";
pub const LABELS_FILE: &str = "labels.json";

/// One (chart directory, chart XML file) pair to fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillTarget {
    pub chart_dir: String,
    pub xml_file: String,
}

impl FillTarget {
    pub fn new(chart_dir: impl Into<String>, xml_file: impl Into<String>) -> Self {
        Self {
            chart_dir: chart_dir.into(),
            xml_file: xml_file.into(),
        }
    }

    pub fn for_chart(chart: ChartId) -> Self {
        Self::new(chart.dir_name(), chart.xml_file_name())
    }

    /// Target for a bare directory name: `<name>.xml`.
    pub fn for_name(name: &str) -> Self {
        match ChartId::from_dir_name(name) {
            Some(chart) => Self::for_chart(chart),
            None => Self::new(name, format!("{name}.xml")),
        }
    }
}

impl fmt::Display for FillTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.chart_dir, self.xml_file)
    }
}

impl FromStr for FillTarget {
    type Err = String;

    /// Parses `chart8=chart8.xml`, or a bare `chart8`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((dir, xml)) if !dir.trim().is_empty() && !xml.trim().is_empty() => {
                Ok(Self::new(dir.trim(), xml.trim()))
            }
            Some(_) => Err(format!("invalid fill target '{s}' (expected CHART=XML)")),
            None if !s.trim().is_empty() => Ok(Self::for_name(s.trim())),
            None => Err("empty fill target".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilledChart {
    pub target: FillTarget,
    pub xml_path: PathBuf,
    pub tool_stdout: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillReport {
    pub page: PageId,
    pub filled: Vec<FilledChart>,
}

/// Chooses what to fill when no explicit targets were given.
///
/// Explicit targets win, then `output.replace_charts` from the page's own
/// `config.yaml`, then every chart directory of the page. The repository
/// config never supplies chart names: they are page-specific.
pub fn plan_targets(
    ws: &Workspace,
    page: PageId,
    explicit: Vec<FillTarget>,
) -> Result<Vec<FillTarget>, ChartkitError> {
    if !explicit.is_empty() {
        return Ok(explicit);
    }

    let config = load_config_or_default(&ws.page_dir(page).join(CONFIG_FILE));
    if !config.output.replace_charts.is_empty() {
        return Ok(config
            .output
            .replace_charts
            .iter()
            .map(|name| FillTarget::for_name(name))
            .collect());
    }

    Ok(discovery::discover_charts(&ws.page_dir(page))?
        .into_iter()
        .map(|chart| FillTarget::for_chart(chart.id))
        .collect())
}

/// Fills every target of `page`, in order.
///
/// A missing `series.json`, `labels.json` or chart XML aborts the run before
/// that target's tool call; so does a non-zero tool exit. Targets already
/// filled stay filled.
pub fn fill_page(
    ws: &Workspace,
    runner: &dyn ToolRunner,
    page: PageId,
    targets: &[FillTarget],
) -> Result<FillReport, ChartkitError> {
    let page_dir = ws.page_dir(page);
    let charts_dir = ws.charts_dir();
    let tool = ws.tool(FILL_TOOL);
    let mut filled = Vec::with_capacity(targets.len());

    log::info!(
        "[FILL] {}: {} chart(s), XML from '{}'",
        page,
        targets.len(),
        charts_dir.display()
    );

    for target in targets {
        let chart_dir = page_dir.join(&target.chart_dir);
        let series = chart_dir.join(SERIES_FILE);
        let labels = chart_dir.join(LABELS_FILE);
        let xml = charts_dir.join(&target.xml_file);

        for required in [&series, &labels, &xml] {
            if !required.is_file() {
                log::error!("[FILL] {}: missing '{}', aborting page.", page, required.display());
                return Err(ChartkitError::MissingInput(required.clone()));
            }
        }

        let invocation = ToolInvocation::new(&tool)
            .arg("--chart")
            .arg(&xml)
            .arg("--series_json")
            .arg(&series)
            .arg("--labels_json")
            .arg(&labels)
            .current_dir(ws.root());

        let output = runner.run(&invocation)?;
        if !output.is_success() {
            return Err(ChartkitError::ToolFailed {
                tool: format!("{FILL_TOOL} ({target})"),
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            });
        }

        let stdout = output.stdout.trim().to_string();
        if !stdout.is_empty() {
            log::info!("[FILL] {}/{}: {}", page, target.chart_dir, stdout);
        }
        filled.push(FilledChart {
            target: target.clone(),
            xml_path: xml,
            tool_stdout: stdout,
        });
    }

    Ok(FillReport { page, filled })
}
