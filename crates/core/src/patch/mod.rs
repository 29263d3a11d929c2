//! One-off maintenance passes over the companion scripts of every page.
//!
//! Each patcher is a rule table applied to one file name in every page
//! directory. Patchers never abort a run: problems are logged and recorded
//! per page.

mod rules;

pub use rules::PatchRule;

use crate::discovery::PageDir;
use chartkit_types::PageId;
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

static TOOLS_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?P<head>\s*TOOLS\s*=\s*Path\(__file__\)\.resolve\(\)\.parents\[)1(?P<tail>\]\s*/\s*['"]tools['"].*)$"#,
    )
    .expect("BUG: invalid tools-path regex literal")
});

static PRINT_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indent>[ \t]*)print\('[ \t]*\n[ \t]*'\.join\((?P<arg>.+)\)\)(?P<trail>[ \t]*)$")
        .expect("BUG: invalid print-format regex literal")
});

static PRINT_FIXED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"print\('\\n'\.join\(").expect("BUG: invalid print-format verify regex literal")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    Patched,
    Unchanged,
    /// The file was processed but the expected fixed form is absent.
    VerificationFailed { written: bool },
    Missing,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchedFile {
    pub page: PageId,
    pub path: PathBuf,
    pub outcome: PatchOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub patcher: &'static str,
    pub files: Vec<PatchedFile>,
}

impl PatchReport {
    pub fn count(&self, pred: impl Fn(&PatchOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }

    /// Files rewritten on disk.
    pub fn patched(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                PatchOutcome::Patched | PatchOutcome::VerificationFailed { written: true }
            )
        })
    }
}

#[derive(Debug, Clone)]
pub struct ScriptPatcher {
    pub name: &'static str,
    pub target: &'static str,
    pub rules: Vec<PatchRule>,
    pub verify: Option<Regex>,
}

impl ScriptPatcher {
    /// `chart_dir.name.replace('chart','') + '.xml'` → `chart_dir.name + '.xml'`.
    pub fn chart_name() -> Self {
        Self {
            name: "chart-name",
            target: "make_data.py",
            rules: vec![
                PatchRule::literal(
                    "chart_dir.name.replace('chart','') + '.xml'",
                    "chart_dir.name + '.xml'",
                ),
                PatchRule::literal(
                    "chart_dir.name.replace(\"chart\",\"\") + \".xml\"",
                    "chart_dir.name + \".xml\"",
                ),
            ],
            verify: None,
        }
    }

    /// `TOOLS = Path(__file__).resolve().parents[1] / 'tools'` → `parents[2]`.
    pub fn tools_path() -> Self {
        Self {
            name: "tools-path",
            target: "make_data.py",
            rules: vec![PatchRule::Line {
                pattern: TOOLS_PATH_RE.clone(),
                replacement: "${head}2${tail}".to_string(),
            }],
            verify: None,
        }
    }

    /// Joins a `print('` line broken before `'.join(...))` back into
    /// `print('\n'.join(...))`.
    pub fn print_format() -> Self {
        Self {
            name: "print-format",
            target: "validate.py",
            rules: vec![PatchRule::LinePair {
                pattern: PRINT_PAIR_RE.clone(),
                replacement: r"${indent}print('\n'.join(${arg}))${trail}".to_string(),
            }],
            verify: Some(PRINT_FIXED_RE.clone()),
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::chart_name(), Self::tools_path(), Self::print_format()]
    }

    pub fn by_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|p| p.name == name)
    }

    /// Applies every rule in order. Returns the new text and whether any
    /// rule changed it.
    pub fn patch_text(&self, text: &str) -> (String, bool) {
        self.rules
            .iter()
            .fold((text.to_string(), false), |(text, changed), rule| {
                let (next, applied) = rule.apply(&text);
                (next, changed || applied)
            })
    }

    fn verified(&self, text: &str) -> bool {
        self.verify.as_ref().is_none_or(|re| re.is_match(text))
    }

    fn patch_page(&self, page: &PageDir) -> PatchOutcome {
        let path = page.script(self.target);
        if !path.is_file() {
            return PatchOutcome::Missing;
        }
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => return PatchOutcome::Failed(format!("read: {e}")),
        };

        // A file already in the fixed form is left alone.
        let already_fixed = self.verify.as_ref().is_some_and(|re| re.is_match(&text));
        if !already_fixed {
            let (patched, changed) = self.patch_text(&text);
            if changed {
                if let Err(e) = fs::write(&path, &patched) {
                    return PatchOutcome::Failed(format!("write: {e}"));
                }
                return if self.verified(&patched) {
                    PatchOutcome::Patched
                } else {
                    PatchOutcome::VerificationFailed { written: true }
                };
            }
        }

        if self.verified(&text) {
            PatchOutcome::Unchanged
        } else {
            PatchOutcome::VerificationFailed { written: false }
        }
    }

    /// Patches `<page>/<target>` of every page.
    pub fn run(&self, pages: &[PageDir]) -> PatchReport {
        let mut files = Vec::with_capacity(pages.len());
        for page in pages {
            let outcome = self.patch_page(page);
            let path = page.script(self.target);
            match &outcome {
                PatchOutcome::Patched => {
                    log::info!("[PATCH] {}: patched '{}'.", self.name, path.display())
                }
                PatchOutcome::Unchanged => {
                    log::debug!("[PATCH] {}: '{}' unchanged.", self.name, path.display())
                }
                PatchOutcome::VerificationFailed { .. } => log::warn!(
                    "[PATCH] {}: '{}' still lacks the fixed form.",
                    self.name,
                    path.display()
                ),
                PatchOutcome::Missing => {}
                PatchOutcome::Failed(reason) => {
                    log::error!("[PATCH] {}: '{}': {}", self.name, path.display(), reason)
                }
            }
            files.push(PatchedFile {
                page: page.id,
                path,
                outcome,
            });
        }
        PatchReport {
            patcher: self.name,
            files,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn page(root: &std::path::Path, n: u32, file: &str, text: &str) -> PageDir {
        let id = PageId::new(n);
        let path = root.join(id.dir_name());
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join(file), text).unwrap();
        PageDir { id, path }
    }

    #[test]
    fn test_tools_path_keeps_indent_and_quotes() {
        let patcher = ScriptPatcher::tools_path();
        let src = "import x\n    TOOLS = Path(__file__).resolve().parents[1] / \"tools\"  # root\n";
        let (out, changed) = patcher.patch_text(src);
        assert!(changed);
        assert_eq!(
            out,
            "import x\n    TOOLS = Path(__file__).resolve().parents[2] / \"tools\"  # root\n"
        );

        let fixed = "TOOLS = Path(__file__).resolve().parents[2] / 'tools'\n";
        assert_eq!(patcher.patch_text(fixed), (fixed.to_string(), false));
    }

    #[test]
    fn test_chart_name_both_quote_styles() {
        let patcher = ScriptPatcher::chart_name();
        let (out, changed) = patcher.patch_text(
            "a = chart_dir.name.replace('chart','') + '.xml'\nb = chart_dir.name.replace(\"chart\",\"\") + \".xml\"\n",
        );
        assert!(changed);
        assert_eq!(out, "a = chart_dir.name + '.xml'\nb = chart_dir.name + \".xml\"\n");
    }

    #[test]
    fn test_print_format_fix() {
        let patcher = ScriptPatcher::print_format();
        let src = "def main():\n    print('\n    '.join(lines))\n    return 0\n";
        let (out, changed) = patcher.patch_text(src);
        assert!(changed);
        assert_eq!(out, "def main():\n    print('\\n'.join(lines))\n    return 0\n");
        assert!(patcher.verified(&out));
    }

    #[test]
    fn test_run_reports_per_page() {
        let dir = tempdir().unwrap();
        let buggy = page(dir.path(), 1, "validate.py", "print('\n'.join(rows))\n");
        let fixed = page(dir.path(), 2, "validate.py", "print('\\n'.join(rows))\n");
        let odd = page(dir.path(), 3, "validate.py", "print(rows)\n");
        let empty = page(dir.path(), 4, "other.py", "");

        let report = ScriptPatcher::print_format().run(&[buggy, fixed, odd, empty]);
        let outcomes: Vec<_> = report.files.iter().map(|f| f.outcome.clone()).collect();
        assert_eq!(
            outcomes,
            vec![
                PatchOutcome::Patched,
                PatchOutcome::Unchanged,
                PatchOutcome::VerificationFailed { written: false },
                PatchOutcome::Missing,
            ]
        );
        assert_eq!(report.patched(), 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("p1/validate.py")).unwrap(),
            "print('\\n'.join(rows))\n"
        );
    }

    #[test]
    fn test_by_name() {
        assert_eq!(ScriptPatcher::by_name("tools-path").unwrap().target, "make_data.py");
        assert!(ScriptPatcher::by_name("nope").is_none());
    }
}
