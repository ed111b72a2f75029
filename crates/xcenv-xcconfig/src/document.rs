//! xcconfig documents loaded from disk or from embedded text.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::XcconfigError;
use crate::parser::{parse_text, ConfigLine};

/// A parsed xcconfig file.
///
/// Includes are recorded as lines but not followed; the caller applying the
/// document decides when and how to load them, using
/// [`resolve_include`](Self::resolve_include) for the path.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigDocument {
    path: PathBuf,
    digest: String,
    lines: Vec<ConfigLine>,
}

impl ConfigDocument {
    /// Parse document text. `path` names the document and anchors relative
    /// includes; it does not have to exist.
    pub fn parse(text: &str, path: impl Into<PathBuf>) -> Result<Self, XcconfigError> {
        let path = path.into();
        let lines = parse_text(text).map_err(|source| XcconfigError::Parse {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            digest: digest_bytes(text.as_bytes()),
            path,
            lines,
        })
    }

    /// Read and parse a document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, XcconfigError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| XcconfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|_| XcconfigError::InvalidUtf8 {
            path: path.to_path_buf(),
        })?;

        Self::parse(&text, path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory relative includes are resolved against.
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// SHA-256 of the document text, hex encoded.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn lines(&self) -> &[ConfigLine] {
        &self.lines
    }

    /// Resolve an include path as written in this document.
    pub fn resolve_include(&self, raw: &str) -> PathBuf {
        let raw = Path::new(raw);
        if raw.is_absolute() {
            raw.to_path_buf()
        } else {
            self.directory().join(raw)
        }
    }

    /// Assignments in document order, ignoring includes.
    pub fn assignments(&self) -> impl Iterator<Item = &ConfigLine> {
        self.lines
            .iter()
            .filter(|line| matches!(line, ConfigLine::KeyValue { .. }))
    }
}

fn digest_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConditionSet;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_parse_preserves_line_order() {
        let text = "// base\nA = 1\n#include \"Other.xcconfig\"\nB[sdk=macosx*] = 2\n";
        let doc = ConfigDocument::parse(text, "/configs/Base.xcconfig").unwrap();

        assert_eq!(doc.lines().len(), 4);
        assert!(matches!(doc.lines()[0], ConfigLine::Comment { .. }));
        assert!(matches!(doc.lines()[2], ConfigLine::Include { .. }));
        match &doc.lines()[3] {
            ConfigLine::KeyValue {
                key, conditions, ..
            } => {
                assert_eq!(key, "B");
                assert_eq!(*conditions, ConditionSet::new().with("sdk", "macosx*"));
            }
            other => panic!("unexpected line {other:?}"),
        }
        assert_eq!(doc.assignments().count(), 2);
    }

    #[test]
    fn test_resolve_include_relative_to_document() {
        let doc = ConfigDocument::parse("", "/configs/app/Debug.xcconfig").unwrap();
        assert_eq!(
            doc.resolve_include("../Shared.xcconfig"),
            PathBuf::from("/configs/app/../Shared.xcconfig")
        );
        assert_eq!(
            doc.resolve_include("/abs/Other.xcconfig"),
            PathBuf::from("/abs/Other.xcconfig")
        );
    }

    #[test]
    fn test_resolve_include_for_bare_name() {
        let doc = ConfigDocument::parse("", "Debug.xcconfig").unwrap();
        assert_eq!(doc.resolve_include("Base.xcconfig"), PathBuf::from("Base.xcconfig"));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("App.xcconfig");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "PRODUCT_NAME = App").unwrap();
        drop(file);

        let doc = ConfigDocument::load(&path).unwrap();
        assert_eq!(doc.path(), path.as_path());
        assert_eq!(doc.directory(), dir.path());
        assert_eq!(doc.digest().len(), 64);
    }

    #[test]
    fn test_digest_tracks_content() {
        let a = ConfigDocument::parse("A = 1", "a.xcconfig").unwrap();
        let b = ConfigDocument::parse("A = 1", "b.xcconfig").unwrap();
        let c = ConfigDocument::parse("A = 2", "a.xcconfig").unwrap();
        assert_eq!(a.digest(), b.digest());
        assert_ne!(a.digest(), c.digest());
    }

    #[test]
    fn test_load_missing_file() {
        let err = ConfigDocument::load("/nonexistent/Missing.xcconfig").unwrap_err();
        assert!(matches!(err, XcconfigError::Io { .. }));
        assert!(err.to_string().contains("Missing.xcconfig"));
    }

    #[test]
    fn test_parse_error_names_document() {
        let err = ConfigDocument::parse("A[sdk] = 1", "Broken.xcconfig").unwrap_err();
        assert!(err.to_string().contains("Broken.xcconfig"));
        assert!(err.to_string().contains("line 1"));
    }
}
