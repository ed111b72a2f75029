//! Platform `Info` and SDK `SDKSettings` metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PlatformError;

/// The parts of platform/SDK metadata the settings engine reads.
///
/// Property values are flattened to build-setting strings: arrays are joined
/// with spaces and booleans become `YES`/`NO`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_name: Option<String>,

    pub default_properties: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_properties: Option<BTreeMap<String, String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawMetadata {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    canonical_name: Option<String>,
    #[serde(default)]
    default_properties: BTreeMap<String, Value>,
    #[serde(default)]
    override_properties: Option<BTreeMap<String, Value>>,
}

impl Metadata {
    /// Build metadata from a decoded structured-data value.
    pub fn from_value(value: Value, path: &Path) -> Result<Self, PlatformError> {
        let raw: RawMetadata = serde_json::from_value(value).map_err(|e| PlatformError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            name: raw.name,
            canonical_name: raw.canonical_name,
            default_properties: flatten_properties(raw.default_properties, path)?,
            override_properties: raw
                .override_properties
                .map(|props| flatten_properties(props, path))
                .transpose()?,
        })
    }

    /// `Name`, required for platforms.
    pub fn require_name(&self, path: &Path) -> Result<&str, PlatformError> {
        self.name.as_deref().ok_or_else(|| PlatformError::MissingField {
            path: path.to_path_buf(),
            field: "Name",
        })
    }

    /// `CanonicalName`, required for SDKs.
    pub fn require_canonical_name(&self, path: &Path) -> Result<&str, PlatformError> {
        self.canonical_name
            .as_deref()
            .ok_or_else(|| PlatformError::MissingField {
                path: path.to_path_buf(),
                field: "CanonicalName",
            })
    }
}

fn flatten_properties(
    props: BTreeMap<String, Value>,
    path: &Path,
) -> Result<BTreeMap<String, String>, PlatformError> {
    props
        .into_iter()
        .map(|(key, value)| {
            let flat = flatten_value(&value).ok_or_else(|| PlatformError::Parse {
                path: path.to_path_buf(),
                reason: format!("property {} has unsupported value {}", key, value),
            })?;
            Ok((key, flat))
        })
        .collect()
}

fn flatten_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(true) => Some("YES".to_string()),
        Value::Bool(false) => Some("NO".to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Option<Vec<String>> = items.iter().map(flatten_value).collect();
            Some(parts?.join(" "))
        }
        Value::Null | Value::Object(_) => None,
    }
}

/// Loads metadata stored at a platform or SDK metadata path.
pub trait MetadataLoader {
    fn load(&self, path: &Path) -> Result<Metadata, PlatformError>;
}

/// Reads metadata serialized as JSON at the metadata path.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMetadataLoader;

impl MetadataLoader for JsonMetadataLoader {
    fn load(&self, path: &Path) -> Result<Metadata, PlatformError> {
        let contents = fs::read_to_string(path).map_err(|source| PlatformError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_str(&contents).map_err(|e| PlatformError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Metadata::from_value(value, path)
    }
}

/// Metadata kept in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryMetadataLoader {
    entries: BTreeMap<PathBuf, Metadata>,
}

impl MemoryMetadataLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, path: impl Into<PathBuf>, metadata: Metadata) -> Self {
        self.entries.insert(path.into(), metadata);
        self
    }
}

impl MetadataLoader for MemoryMetadataLoader {
    fn load(&self, path: &Path) -> Result<Metadata, PlatformError> {
        self.entries.get(path).cloned().ok_or_else(|| PlatformError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such metadata"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_from_value_flattens_properties() {
        let value = json!({
            "Name": "iphoneos",
            "DefaultProperties": {
                "DEPLOYMENT_TARGET_SETTING_NAME": "IPHONEOS_DEPLOYMENT_TARGET",
                "ARCHS_STANDARD": ["arm64", "arm64e"],
                "ENABLE_BITCODE": false,
                "TARGETED_DEVICE_FAMILY": 1
            }
        });
        let metadata = Metadata::from_value(value, Path::new("Info.plist")).unwrap();

        assert_eq!(metadata.name.as_deref(), Some("iphoneos"));
        assert_eq!(metadata.default_properties["ARCHS_STANDARD"], "arm64 arm64e");
        assert_eq!(metadata.default_properties["ENABLE_BITCODE"], "NO");
        assert_eq!(metadata.default_properties["TARGETED_DEVICE_FAMILY"], "1");
        assert!(metadata.override_properties.is_none());
    }

    #[test]
    fn test_override_properties_present() {
        let value = json!({
            "Name": "macosx",
            "DefaultProperties": {},
            "OverrideProperties": { "ENABLE_TESTABILITY": "YES" }
        });
        let metadata = Metadata::from_value(value, Path::new("Info.plist")).unwrap();
        let overrides = metadata.override_properties.unwrap();
        assert_eq!(overrides["ENABLE_TESTABILITY"], "YES");
    }

    #[test]
    fn test_nested_dictionary_rejected() {
        let value = json!({
            "DefaultProperties": { "NESTED": { "a": 1 } }
        });
        let err = Metadata::from_value(value, Path::new("SDKSettings.plist")).unwrap_err();
        assert!(matches!(err, PlatformError::Parse { .. }));
        assert!(err.to_string().contains("NESTED"));
    }

    #[test]
    fn test_required_fields() {
        let metadata = Metadata::default();
        let path = Path::new("SDKSettings.plist");
        assert!(matches!(
            metadata.require_canonical_name(path),
            Err(PlatformError::MissingField {
                field: "CanonicalName",
                ..
            })
        ));
        assert!(metadata.require_name(path).is_err());
    }

    #[test]
    fn test_json_loader() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("SDKSettings.plist");
        fs::write(
            &path,
            r#"{"CanonicalName": "macosx14.2", "DefaultProperties": {"MACOSX_DEPLOYMENT_TARGET": "14.2"}}"#,
        )
        .unwrap();

        let metadata = JsonMetadataLoader.load(&path).unwrap();
        assert_eq!(metadata.canonical_name.as_deref(), Some("macosx14.2"));
        assert_eq!(metadata.default_properties["MACOSX_DEPLOYMENT_TARGET"], "14.2");
    }

    #[test]
    fn test_json_loader_missing_file() {
        let err = JsonMetadataLoader
            .load(Path::new("/nonexistent/Info.plist"))
            .unwrap_err();
        assert!(matches!(err, PlatformError::Io { .. }));
    }

    #[test]
    fn test_memory_loader() {
        let metadata = Metadata {
            name: Some("macosx".to_string()),
            ..Default::default()
        };
        let loader = MemoryMetadataLoader::new().insert("/P/Info.plist", metadata.clone());
        assert_eq!(loader.load(Path::new("/P/Info.plist")).unwrap(), metadata);
        assert!(loader.load(Path::new("/Q/Info.plist")).is_err());
    }
}
