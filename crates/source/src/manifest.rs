//! `output/index.json` loading.

use chartkit_types::IndexManifest;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read manifest '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse manifest '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Strict load. `Ok(None)` when the file does not exist.
pub fn load_manifest(path: &Path) -> Result<Option<IndexManifest>, ManifestError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ManifestError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Soft load: a missing or malformed manifest is an empty mapping.
pub fn load_manifest_or_empty(path: &Path) -> IndexManifest {
    match load_manifest(path) {
        Ok(Some(manifest)) => manifest,
        Ok(None) => {
            log::warn!("Manifest '{}' not found; no chart names available.", path.display());
            IndexManifest::default()
        }
        Err(e) => {
            log::warn!("{e}; treating manifest as empty.");
            IndexManifest::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_manifest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.json");
        fs::write(
            &path,
            r#"{"slides": [{"slide": 3, "charts": [{"name": "chart5"}]}]}"#,
        )
        .unwrap();

        let manifest = load_manifest(&path).unwrap().unwrap();
        assert_eq!(manifest.charts_for(3), vec!["chart5"]);
    }

    #[test]
    fn test_missing_and_malformed_manifest_are_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.json");
        assert!(load_manifest_or_empty(&path).is_empty());

        fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_manifest(&path), Err(ManifestError::Parse { .. })));
        assert!(load_manifest_or_empty(&path).is_empty());
    }
}
