//! Shared helpers for glyco-core integration tests.

#![allow(dead_code)]

use glyco_core::testing::sample_artifact;
use glyco_core::context::ModelContext;
use std::path::PathBuf;
use tempfile::TempDir;

/// Write the sample model to a fresh temp dir and return both.
pub fn sample_model_file() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("random_forest_model.json");
    let json = sample_artifact().to_json_pretty().expect("serialize artifact");
    std::fs::write(&path, json).expect("write artifact");
    (dir, path)
}

/// Load the sample model the way the binaries do: from a file on disk.
pub fn load_sample_context() -> (TempDir, ModelContext) {
    let (dir, path) = sample_model_file();
    let ctx = ModelContext::load(&path).expect("load sample model");
    (dir, ctx)
}
