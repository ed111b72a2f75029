//! Platform metadata errors.

use std::io;
use std::path::PathBuf;

/// Failure to locate a platform or SDK, or to read its metadata.
///
/// All of these are fatal for default loading.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("developer directory not configured")]
    NoDeveloperDir,

    #[error("SDK not found: {0}")]
    SdkNotFound(String),

    #[error("failed to read metadata {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse metadata {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("metadata {} is missing required field {field}", path.display())]
    MissingField { path: PathBuf, field: &'static str },
}
