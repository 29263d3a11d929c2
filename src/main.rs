use chartkit::{
    BuildMode, ChartkitError, FillTarget, PageId, PatchOutcome, ProcessToolRunner,
    ScaffoldOutcome, ScriptPatcher, ToolPreviewRenderer, Workspace, build_all, fill_page,
    generate_page_previews, generate_tree_previews, plan_targets, resolve_charts_dir,
    run_validations, scaffold_pages, sync_originals,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::env;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Chart data maintenance for unpacked presentation templates", long_about = None)]
struct Cli {
    /// Repository root (holds config.yaml, tools/ and the pages)
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Interpreter used for every script (default: $CHARTKIT_PYTHON or python3)
    #[arg(long)]
    python: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill chart XML from each chart's series.json/labels.json
    Fill {
        page: PageId,
        /// CHART=XML pairs; defaults to the page config, then every chart
        targets: Vec<FillTarget>,
    },
    /// Render previews for every chart of one page
    Preview { page: PageId },
    /// Render missing previews across every page
    PreviewAll,
    /// Run make_data.py and every chart's fill.py, per page
    Build {
        #[arg(long)]
        mode: Option<BuildMode>,
        pages: Vec<PageId>,
    },
    /// Apply textual fixes to page scripts
    Patch {
        #[arg(value_enum)]
        which: PatchKind,
    },
    /// Copy original_*.json snapshots into each chart's original/ directory
    SyncOriginals {
        /// Pages to sync; all pages when omitted or empty
        #[arg(long, num_args = 0..)]
        pages: Vec<PageId>,
    },
    /// Create page directories from the index manifest
    Scaffold {
        #[arg(required = true, num_args = 1..)]
        numbers: Vec<u32>,
    },
    /// Run every page's validate.py
    Validate,
    /// Print the resolved chart XML directory
    Resolve,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PatchKind {
    ChartName,
    ToolsPath,
    PrintFormat,
    All,
}

impl PatchKind {
    fn patchers(self) -> Vec<ScriptPatcher> {
        match self {
            PatchKind::ChartName => vec![ScriptPatcher::chart_name()],
            PatchKind::ToolsPath => vec![ScriptPatcher::tools_path()],
            PatchKind::PrintFormat => vec![ScriptPatcher::print_format()],
            PatchKind::All => ScriptPatcher::all(),
        }
    }
}

fn main() -> Result<(), ChartkitError> {
    if env::var("RUST_LOG").is_err() {
        unsafe {
            env::set_var("RUST_LOG", "chartkit=info");
        }
    }
    env_logger::init();

    let cli = Cli::parse();
    let ws = Workspace::open(&cli.root);
    log::debug!("Repository root: {}", ws.root().display());
    let runner = match cli.python {
        Some(python) => ProcessToolRunner::new(python),
        None => ProcessToolRunner::from_env(),
    };

    match cli.command {
        Command::Fill { page, targets } => {
            let targets = plan_targets(&ws, page, targets)?;
            fill_page(&ws, &runner, page, &targets)?;
            println!("{page} filled successfully");
        }
        Command::Preview { page } => {
            let renderer = ToolPreviewRenderer::new(&ws, &runner);
            match generate_page_previews(&ws, &renderer, page) {
                Ok(report) => println!(
                    "[done] previews generated: {}/{} in {}",
                    report.generated, report.total, page
                ),
                // Preview problems are reported, never turned into an exit code.
                Err(e) => eprintln!("[error] {e}"),
            }
        }
        Command::PreviewAll => {
            let renderer = ToolPreviewRenderer::new(&ws, &runner);
            let report = generate_tree_previews(&ws, &renderer)?;
            println!(
                "[done] previews generated: {}, cached: {}, failed: {} (of {})",
                report.generated,
                report.skipped,
                report.failures.len(),
                report.total
            );
        }
        Command::Build { mode, pages } => {
            let mode = mode
                .or_else(|| ws.config().final_mode())
                .unwrap_or_default();
            let selected = (!pages.is_empty()).then_some(pages.as_slice());
            let report = build_all(&ws, &runner, mode, selected)?;
            println!(
                "[done] built {} page(s) in {} mode, {} failure(s)",
                report.pages.len(),
                report.mode,
                report.failures()
            );
        }
        Command::Patch { which } => {
            let pages = ws.pages()?;
            for patcher in which.patchers() {
                let report = patcher.run(&pages);
                println!(
                    "[done] {}: patched {}, unchanged {}, missing {}, failed {}",
                    report.patcher,
                    report.patched(),
                    report.count(|o| *o == PatchOutcome::Unchanged),
                    report.count(|o| *o == PatchOutcome::Missing),
                    report.count(|o| matches!(o, PatchOutcome::Failed(_))),
                );
            }
        }
        Command::SyncOriginals { pages } => {
            let selected = (!pages.is_empty()).then_some(pages.as_slice());
            let report = sync_originals(&ws, selected)?;
            println!(
                "[done] copied {} file(s) across {} chart(s)",
                report.copied.len(),
                report.charts
            );
        }
        Command::Scaffold { numbers } => {
            let report = scaffold_pages(&ws, &numbers)?;
            for page in &report.pages {
                match &page.outcome {
                    ScaffoldOutcome::Created { charts } => {
                        println!("[created] {} charts: [{}]", page.page, charts.join(", "))
                    }
                    ScaffoldOutcome::AlreadyExists => {
                        println!("[skip] {} already exists", page.page)
                    }
                }
            }
        }
        Command::Validate => {
            let report = run_validations(&ws, &runner);
            for result in &report.results {
                let status = if result.passed { "PASS" } else { "FAIL" };
                println!("[{}] {}", status, result.script.display());
                if !result.passed && !result.reason.is_empty() {
                    println!("    {}", result.reason);
                }
            }
            if let Err(e) = report.outcome() {
                eprintln!("{e}");
                std::process::exit(1);
            }
            println!("All {} validation script(s) passed", report.results.len());
        }
        Command::Resolve => {
            println!("{}", resolve_charts_dir(ws.root(), ws.config()).display());
        }
    }

    Ok(())
}
