//! Builtin settings documents (first layer of every load)
//!
//! `defaults.xcconfig` holds generic defaults, `runtime.xcconfig` the
//! directory layout derived from the project location. Both are embedded and
//! can be replaced by copies in [`EngineConfig::builtin_dir`].

use xcenv_xcconfig::{ConfigDocument, XcconfigError};

use super::engine::EngineConfig;

/// Embedded `defaults.xcconfig`
pub const DEFAULTS_XCCONFIG: &str = include_str!("builtin/defaults.xcconfig");

/// Embedded `runtime.xcconfig`
pub const RUNTIME_XCCONFIG: &str = include_str!("builtin/runtime.xcconfig");

const BUILTIN_NAMES: [(&str, &str); 2] = [
    ("defaults.xcconfig", DEFAULTS_XCCONFIG),
    ("runtime.xcconfig", RUNTIME_XCCONFIG),
];

/// The builtin documents in application order.
pub fn builtin_documents(config: &EngineConfig) -> Result<Vec<ConfigDocument>, XcconfigError> {
    BUILTIN_NAMES
        .iter()
        .map(|(name, embedded)| match &config.builtin_dir {
            Some(dir) => ConfigDocument::load(dir.join(name)),
            None => ConfigDocument::parse(embedded, format!("<builtin>/{}", name)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use xcenv_xcconfig::ConfigLine;

    fn value_of<'a>(doc: &'a ConfigDocument, key: &str) -> Option<&'a str> {
        doc.assignments().find_map(|line| match line {
            ConfigLine::KeyValue {
                key: k,
                value,
                conditions,
            } if k == key && conditions.is_empty() => Some(value.as_str()),
            _ => None,
        })
    }

    #[test]
    fn test_embedded_documents_parse() {
        let docs = builtin_documents(&EngineConfig::default()).unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs[0].path().ends_with("defaults.xcconfig"));
        assert!(docs[1].path().ends_with("runtime.xcconfig"));

        assert_eq!(value_of(&docs[0], "SDKROOT"), Some("macosx"));
        assert_eq!(value_of(&docs[0], "ACTION"), Some("build"));
        assert_eq!(value_of(&docs[1], "BUILD_DIR"), Some("$(SYMROOT)"));
    }

    #[test]
    fn test_builtin_dir_override() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("defaults.xcconfig"), "SDKROOT = iphoneos\n").unwrap();
        fs::write(dir.path().join("runtime.xcconfig"), "SYMROOT = /build\n").unwrap();

        let config = EngineConfig {
            builtin_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let docs = builtin_documents(&config).unwrap();

        assert_eq!(value_of(&docs[0], "SDKROOT"), Some("iphoneos"));
        assert_eq!(value_of(&docs[1], "SYMROOT"), Some("/build"));
    }

    #[test]
    fn test_builtin_dir_missing_file() {
        let dir = TempDir::new().unwrap();
        let config = EngineConfig {
            builtin_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        assert!(matches!(
            builtin_documents(&config),
            Err(XcconfigError::Io { .. })
        ));
    }
}
