//! Error types for settings resolution.

use std::path::PathBuf;

use xcenv_platform::PlatformError;
use xcenv_xcconfig::XcconfigError;

use crate::config::ConfigError;

/// Errors surfaced by the settings store.
///
/// Unknown references and unmapped actions are not errors by default; they
/// are logged and resolution continues.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error(transparent)]
    Document(#[from] XcconfigError),

    #[error("include cycle: {}", display_paths(.chain))]
    IncludeCycle { chain: Vec<PathBuf> },

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("cyclic reference: {}", .chain.join(" -> "))]
    CyclicReference { chain: Vec<String> },

    #[error("resolving {name} exceeded the maximum reference depth of {limit}")]
    DepthExceeded { name: String, limit: usize },

    #[error("expansion of {subject:?} did not settle within {limit} passes")]
    ExpansionLimit { subject: String, limit: usize },

    #[error("unknown build setting reference $({name})")]
    UnknownReference { name: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn display_paths(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_messages() {
        let err = SettingsError::CyclicReference {
            chain: vec!["A".to_string(), "B".to_string(), "A".to_string()],
        };
        assert_eq!(err.to_string(), "cyclic reference: A -> B -> A");

        let err = SettingsError::IncludeCycle {
            chain: vec![PathBuf::from("a.xcconfig"), PathBuf::from("a.xcconfig")],
        };
        assert_eq!(err.to_string(), "include cycle: a.xcconfig -> a.xcconfig");
    }
}
