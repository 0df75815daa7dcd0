//! Integration tests for polyrun
//!
//! These tests require python, gcc, g++ and a JDK on PATH.
//! Run with: cargo test -p polyrun --features integration-tests
//!
//! Timeout tests wait for the full limit and are marked `#[ignore]`. To include them:
//!    cargo test -p polyrun --features integration-tests -- --include-ignored

#![cfg(feature = "integration-tests")]

use std::fs;
use std::path::{Path, PathBuf};

use polyrun::{Config, Pipeline};

mod compilation;
mod config_loading;
mod scenarios;
mod timeouts;
mod workspace_cleanup;

const FIXTURES_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

/// Helper to get fixture file content
pub(crate) fn fixture_source(name: &str) -> String {
    let path = format!("{FIXTURES_PATH}/sources/{name}");
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read fixture {path}: {e}"))
}

/// A private workspace root so tests can observe what is left behind
pub(crate) fn scratch_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!("polyrun-it-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&root).expect("Failed to create scratch root");
    root
}

/// Default config rooted at `root`
pub(crate) fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.workspace_root = Some(root.to_path_buf());
    config
}

pub(crate) fn test_pipeline(root: &Path) -> Pipeline {
    Pipeline::new(test_config(root))
}

/// Number of entries under a workspace root
pub(crate) fn leftover(root: &Path) -> usize {
    fs::read_dir(root).map(|d| d.count()).unwrap_or(0)
}
