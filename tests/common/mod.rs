#![allow(dead_code)]

use chartkit::Workspace;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway repository tree laid out the way the tools expect it.
pub struct FakeRepo {
    pub dir: TempDir,
}

impl FakeRepo {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp repo");
        fs::create_dir_all(dir.path().join("tools")).expect("create tools dir");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn workspace(&self) -> Workspace {
        Workspace::open(self.root())
    }

    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.root().join(rel)).expect("read fixture file")
    }

    /// `charts/p<page>/<chart>` with series and labels.
    pub fn chart(&self, page: u32, chart: &str) -> PathBuf {
        self.write(&format!("charts/p{page}/{chart}/series.json"), "[[1, 2, 3]]");
        self.write(&format!("charts/p{page}/{chart}/labels.json"), "[\"a\", \"b\", \"c\"]");
        self.root().join(format!("charts/p{page}/{chart}"))
    }

    /// `<template_root>/ppt/charts/<name>`.
    pub fn chart_xml(&self, name: &str) -> PathBuf {
        self.write(
            &format!("input/LRTBH-unzip/ppt/charts/{name}"),
            "<c:chartSpace/>",
        )
    }

    /// Every file under `rel`, relative to it, sorted.
    pub fn files_under(&self, rel: &str) -> Vec<String> {
        fn walk(base: &Path, dir: &Path, out: &mut Vec<String>) {
            for entry in fs::read_dir(dir).expect("read dir").flatten() {
                let path = entry.path();
                if path.is_dir() {
                    walk(base, &path, out);
                } else {
                    out.push(path.strip_prefix(base).unwrap().display().to_string());
                }
            }
        }
        let base = self.root().join(rel);
        let mut out = Vec::new();
        walk(&base, &base, &mut out);
        out.sort();
        out
    }
}
