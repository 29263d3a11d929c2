//! Creates new page directories seeded from the index manifest.

use crate::error::ChartkitError;
use crate::workspace::{CONFIG_FILE, Workspace};
use chartkit_source::load_manifest_or_empty;
use chartkit_types::{OutputSection, PageConfig, PageId};
use handlebars::{Handlebars, no_escape};
use serde_json::json;
use std::fs;
use std::path::PathBuf;

pub const README_FILE: &str = "readme.md";

const README_TEMPLATE: &str = "\
# {{page}}

Scaffolded on {{date}}.

## Charts
{{#each charts}}
- {{this}}
{{else}}
_No charts listed for slide {{number}} in the index._
{{/each}}

## Steps

1. Put the source data for each chart next to its `series.json`/`labels.json`.
2. Write `make_data.py` to produce the chart JSON files.
3. Write `validate.py` to check the filled output.
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaffoldOutcome {
    Created { charts: Vec<String> },
    AlreadyExists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldedPage {
    pub page: PageId,
    pub path: PathBuf,
    pub outcome: ScaffoldOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub pages: Vec<ScaffoldedPage>,
}

impl ScaffoldReport {
    pub fn created(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| matches!(p.outcome, ScaffoldOutcome::Created { .. }))
            .count()
    }
}

fn render_readme(page: PageId, charts: &[String]) -> Result<String, ChartkitError> {
    let mut engine = Handlebars::new();
    engine.register_escape_fn(no_escape);
    let context = json!({
        "page": page.to_string(),
        "number": page.number(),
        "charts": charts,
        "date": chrono::Local::now().format("%Y-%m-%d").to_string(),
    });
    Ok(engine.render_template(README_TEMPLATE, &context)?)
}

fn create_page(ws: &Workspace, page: PageId, charts: &[String]) -> Result<PathBuf, ChartkitError> {
    let dir = ws.page_dir(page);
    fs::create_dir_all(&dir).map_err(ChartkitError::io(&dir))?;

    let readme = dir.join(README_FILE);
    fs::write(&readme, render_readme(page, charts)?).map_err(ChartkitError::io(&readme))?;

    let config = PageConfig {
        page,
        output: OutputSection {
            replace_charts: charts.to_vec(),
            ..Default::default()
        },
    };
    let config_path = dir.join(CONFIG_FILE);
    fs::write(&config_path, serde_yaml::to_string(&config)?)
        .map_err(ChartkitError::io(&config_path))?;

    Ok(dir)
}

/// Creates `p<N>` for each number that does not exist yet. Existing pages
/// are reported and left untouched.
pub fn scaffold_pages(ws: &Workspace, numbers: &[u32]) -> Result<ScaffoldReport, ChartkitError> {
    let manifest = load_manifest_or_empty(&ws.manifest_path());
    let mut report = ScaffoldReport::default();

    for &number in numbers {
        let page = PageId::new(number);
        let path = ws.page_dir(page);
        if path.exists() {
            log::info!("[SCAFFOLD] {} already exists, skipping.", page);
            report.pages.push(ScaffoldedPage {
                page,
                path,
                outcome: ScaffoldOutcome::AlreadyExists,
            });
            continue;
        }

        let charts = manifest.charts_for(number);
        let path = create_page(ws, page, &charts)?;
        log::info!("[SCAFFOLD] Created {} (charts: {}).", page, charts.join(", "));
        report.pages.push(ScaffoldedPage {
            page,
            path,
            outcome: ScaffoldOutcome::Created { charts },
        });
    }

    Ok(report)
}
