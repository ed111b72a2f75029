//! Error types for xcconfig parsing and loading.

use std::io;
use std::path::PathBuf;

/// A line of xcconfig text that could not be parsed.
///
/// Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: invalid setting name in {text:?}")]
    InvalidKey { line: usize, text: String },

    #[error("line {line}: malformed condition suffix {suffix:?}: {reason}")]
    MalformedCondition {
        line: usize,
        suffix: String,
        reason: String,
    },

    #[error("line {line}: malformed include directive {text:?}")]
    MalformedInclude { line: usize, text: String },

    #[error("line {line}: expected '=' after {key}")]
    MissingAssignment { line: usize, key: String },

    #[error("line {line}: unknown directive {text:?}")]
    UnknownDirective { line: usize, text: String },
}

impl ParseError {
    /// Line the error was reported on.
    pub fn line(&self) -> usize {
        match self {
            Self::InvalidKey { line, .. }
            | Self::MalformedCondition { line, .. }
            | Self::MalformedInclude { line, .. }
            | Self::MissingAssignment { line, .. }
            | Self::UnknownDirective { line, .. } => *line,
        }
    }
}

/// Failure to load an xcconfig document from disk.
#[derive(Debug, thiserror::Error)]
pub enum XcconfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not valid UTF-8", path.display())]
    InvalidUtf8 { path: PathBuf },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}
