//! Batch gate: runs every page's `validate.py` and collects PASS/FAIL.

use crate::error::ChartkitError;
use crate::workspace::Workspace;
use chartkit_traits::{ToolInvocation, ToolRunner};
use itertools::Itertools;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const VALIDATE_SCRIPT: &str = "validate.py";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub script: PathBuf,
    pub passed: bool,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub results: Vec<ValidationResult>,
}

impl ValidationReport {
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    /// `Ok` only when at least one script ran and every script passed.
    pub fn outcome(&self) -> Result<(), ChartkitError> {
        if self.results.is_empty() {
            Err(ChartkitError::NoValidationScripts)
        } else if self.failed() > 0 {
            Err(ChartkitError::ValidationFailed {
                failed: self.failed(),
                total: self.results.len(),
            })
        } else {
            Ok(())
        }
    }
}

fn scripts_in(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            log::warn!("[VALIDATE] Cannot list '{}': {}", dir.display(), e);
            return Vec::new();
        }
    };
    entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("[VALIDATE] Skipping an entry of '{}': {}", dir.display(), e);
                None
            }
        })
        .filter(|e| e.file_name().to_string_lossy().starts_with('p'))
        .map(|e| e.path().join(VALIDATE_SCRIPT))
        .filter(|p| p.is_file())
        .collect()
}

/// Every `validate.py` directly inside a `p*` directory, in the flat
/// (`<pages_root>/p*`) and nested (`<pages_root>/charts/p*`) layouts.
/// Canonical, de-duplicated and sorted.
pub fn discover_validation_scripts(ws: &Workspace) -> Vec<PathBuf> {
    let pages_root = ws.pages_root();
    [pages_root.clone(), pages_root.join("charts")]
        .iter()
        .flat_map(|dir| scripts_in(dir))
        .map(|p| fs::canonicalize(&p).unwrap_or(p))
        .sorted()
        .dedup()
        .collect()
}

fn run_one(runner: &dyn ToolRunner, script: &Path) -> ValidationResult {
    let mut invocation = ToolInvocation::new(script);
    if let Some(dir) = script.parent() {
        invocation = invocation.current_dir(dir);
    }
    let (passed, reason) = match runner.run(&invocation) {
        Ok(output) => (output.is_success(), output.reason().to_string()),
        Err(e) => (false, e.to_string()),
    };
    ValidationResult {
        script: script.to_path_buf(),
        passed,
        reason,
    }
}

/// Runs every discovered validation script with no arguments.
pub fn run_validations(ws: &Workspace, runner: &dyn ToolRunner) -> ValidationReport {
    let scripts = discover_validation_scripts(ws);
    if scripts.is_empty() {
        log::warn!("[VALIDATE] No {} scripts under '{}'.", VALIDATE_SCRIPT, ws.pages_root().display());
    }

    let results: Vec<_> = scripts.iter().map(|s| run_one(runner, s)).collect();
    for r in results.iter().filter(|r| !r.passed) {
        log::error!("[VALIDATE] '{}' failed: {}", r.script.display(), r.reason);
    }
    ValidationReport { results }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartkit_traits::{ScriptedToolRunner, ToolOutput};
    use tempfile::tempdir;

    fn script(root: &Path, rel: &str) {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(VALIDATE_SCRIPT), "print('ok')").unwrap();
    }

    #[test]
    fn test_discovers_flat_and_nested_layouts() {
        let dir = tempdir().unwrap();
        let ws = Workspace::open(dir.path());
        script(dir.path(), "charts/p2");
        script(dir.path(), "charts/charts/p1");
        script(dir.path(), "charts/x9");
        fs::create_dir_all(dir.path().join("charts/p3")).unwrap();

        let found = discover_validation_scripts(&ws);
        let parents: Vec<_> = found
            .iter()
            .map(|p| p.parent().unwrap().file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(found.len(), 2);
        assert!(parents.contains(&"p1".to_string()));
        assert!(parents.contains(&"p2".to_string()));
    }

    #[test]
    fn test_missing_pages_root_finds_nothing() {
        let dir = tempdir().unwrap();
        let ws = Workspace::open(dir.path().join("absent"));
        assert!(discover_validation_scripts(&ws).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_pages_root_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let ws = Workspace::open(dir.path());
        script(dir.path(), "charts/charts/p1");
        let flat = dir.path().join("charts");
        fs::set_permissions(&flat, fs::Permissions::from_mode(0o000)).unwrap();

        let listable = fs::read_dir(&flat).is_ok();
        let found = discover_validation_scripts(&ws);
        fs::set_permissions(&flat, fs::Permissions::from_mode(0o755)).unwrap();

        // Running as root can still list the directory.
        if !listable {
            assert!(found.is_empty());
        }
    }

    #[test]
    fn test_outcome_rules() {
        let dir = tempdir().unwrap();
        let ws = Workspace::open(dir.path());
        let runner = ScriptedToolRunner::succeeding();

        let empty = run_validations(&ws, &runner);
        assert!(matches!(empty.outcome(), Err(ChartkitError::NoValidationScripts)));

        script(dir.path(), "charts/p1");
        script(dir.path(), "charts/p2");
        assert!(run_validations(&ws, &runner).outcome().is_ok());

        let runner = ScriptedToolRunner::new(|inv| {
            if inv.script.parent().is_some_and(|p| p.ends_with("p2")) {
                Ok(ToolOutput {
                    code: Some(1),
                    stdout: "row count mismatch\n".to_string(),
                    stderr: "Traceback".to_string(),
                })
            } else {
                Ok(ToolOutput::success(""))
            }
        });
        let report = run_validations(&ws, &runner);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.results[1].reason, "row count mismatch");
        assert!(matches!(
            report.outcome(),
            Err(ChartkitError::ValidationFailed { failed: 1, total: 2 })
        ));
        assert!(runner.calls().iter().all(|c| c.args.is_empty()));
    }
}
