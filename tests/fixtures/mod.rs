//! Test fixtures for integration tests
//!
//! - `project/`: xcconfig documents with includes and conditional values
//! - `builtin/`: a replacement builtin layer for `EngineConfig::builtin_dir`
//! - `Developer/`: a developer directory with JSON platform/SDK metadata

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use xcenv::StaticDiscovery;

/// Root of the fixtures directory
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Path to a project xcconfig fixture
pub fn project_file(name: &str) -> PathBuf {
    fixtures_dir().join("project").join(name)
}

/// Directory holding the replacement builtin documents
pub fn builtin_dir() -> PathBuf {
    fixtures_dir().join("builtin")
}

/// Fixture developer directory
pub fn developer_dir() -> PathBuf {
    fixtures_dir().join("Developer")
}

/// Discovery over the fixture developer directory, with `macosx` and
/// `iphoneos` laid out the standard way
pub fn discovery() -> StaticDiscovery {
    StaticDiscovery::new(developer_dir())
        .with_standard_sdk("macosx", "MacOSX")
        .with_standard_sdk("iphoneos", "iPhoneOS")
}
