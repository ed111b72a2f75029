//! The settings store: name -> Setting, populated by documents and metadata.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use xcenv_xcconfig::{ConditionSet, ConfigDocument, ConfigLine};

use super::setting::{Setting, SettingDefinition, SettingKind, Tier};
use crate::config::EngineConfig;
use crate::error::SettingsError;

/// A document that contributed values, in application order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSource {
    pub tier: Tier,
    pub path: String,
    /// SHA-256 of the document text
    pub digest: String,
}

/// All settings known to one build, keyed by name.
///
/// Written during loading, then read through `&self` only.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    pub(crate) settings: BTreeMap<String, Setting>,
    sources: Vec<DocumentSource>,
    config: EngineConfig,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty store using `config`, which must pass validation.
    pub fn with_config(config: EngineConfig) -> Result<Self, SettingsError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.settings.contains_key(name)
    }

    pub fn setting(&self, name: &str) -> Option<&Setting> {
        self.settings.get(name)
    }

    /// Setting names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.settings.keys().map(String::as_str)
    }

    pub fn sources(&self) -> &[DocumentSource] {
        &self.sources
    }

    /// Write a value at the builtin tier.
    pub fn set_value(&mut self, name: &str, value: &str, conditions: ConditionSet) {
        self.set_value_at(Tier::Default, name, value, conditions);
    }

    /// Write a value at `tier`.
    ///
    /// The first unconditional write to a new setting becomes its default;
    /// everything else is added as an override.
    pub fn set_value_at(&mut self, tier: Tier, name: &str, value: &str, conditions: ConditionSet) {
        match self.settings.get_mut(name) {
            Some(setting) => setting.add_override(tier, conditions, value),
            None if conditions.is_empty() => {
                self.settings.insert(
                    name.to_string(),
                    Setting::with_default(name, SettingKind::default(), tier, value),
                );
            }
            None => {
                let mut setting = Setting::new(name, SettingKind::default());
                setting.add_override(tier, conditions, value);
                self.settings.insert(name.to_string(), setting);
            }
        }
    }

    /// Merge setting declarations.
    ///
    /// A declaration fixes the kind of the setting. Its default value only
    /// fills an empty default, never replaces one.
    pub fn add_definitions<I>(&mut self, definitions: I)
    where
        I: IntoIterator<Item = SettingDefinition>,
    {
        for def in definitions {
            let default = def.default_value.as_deref().unwrap_or_default();
            match self.settings.get_mut(&def.name) {
                Some(setting) => {
                    setting.set_kind(def.kind);
                    setting.fill_default(default);
                }
                None => {
                    let setting = Setting::with_default(&def.name, def.kind, Tier::Default, default);
                    self.settings.insert(def.name, setting);
                }
            }
        }
    }

    /// Load a document from disk and apply it at `tier`.
    pub fn apply_file(&mut self, path: impl AsRef<Path>, tier: Tier) -> Result<(), SettingsError> {
        let document = ConfigDocument::load(path)?;
        self.apply_document(&document, tier)
    }

    /// Apply a document line by line. Includes are loaded and applied in
    /// place, before the line following them.
    pub fn apply_document(
        &mut self,
        document: &ConfigDocument,
        tier: Tier,
    ) -> Result<(), SettingsError> {
        let mut chain = Vec::new();
        self.apply_nested(document, tier, &mut chain)
    }

    fn apply_nested(
        &mut self,
        document: &ConfigDocument,
        tier: Tier,
        chain: &mut Vec<PathBuf>,
    ) -> Result<(), SettingsError> {
        let key = include_key(document.path());
        if chain.contains(&key) {
            let mut cycle = chain.clone();
            cycle.push(key);
            return Err(SettingsError::IncludeCycle { chain: cycle });
        }
        chain.push(key);

        debug!(path = %document.path().display(), ?tier, "applying settings document");
        self.sources.push(DocumentSource {
            tier,
            path: document.path().display().to_string(),
            digest: document.digest().to_string(),
        });

        for line in document.lines() {
            match line {
                ConfigLine::KeyValue {
                    key,
                    value,
                    conditions,
                } => self.set_value_at(tier, key, value, conditions.clone()),
                ConfigLine::Comment { .. } => {}
                ConfigLine::Include { path, optional } => {
                    let include_path = document.resolve_include(path);
                    if *optional && !include_path.exists() {
                        debug!(path = %include_path.display(), "optional include not found, skipping");
                        continue;
                    }
                    let included = ConfigDocument::load(&include_path)?;
                    self.apply_nested(&included, tier, chain)?;
                }
            }
        }

        chain.pop();
        Ok(())
    }
}

/// Identity of a document on the include chain.
fn include_key(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    fn raw_default(store: &SettingsStore, name: &str) -> String {
        store.setting(name).unwrap().default_value().to_string()
    }

    #[test]
    fn test_with_config_rejects_invalid_limits() {
        let config = EngineConfig {
            max_depth: 0,
            ..Default::default()
        };
        let err = SettingsStore::with_config(config).unwrap_err();
        assert!(matches!(err, SettingsError::Config(_)));
        assert!(err.to_string().contains("max_depth"));

        let store = SettingsStore::with_config(EngineConfig::default()).unwrap();
        assert_eq!(store.config().max_depth, 64);
    }

    #[test]
    fn test_first_unconditional_write_is_default() {
        let mut store = SettingsStore::new();
        store.set_value("PRODUCT_NAME", "App", ConditionSet::new());

        let setting = store.setting("PRODUCT_NAME").unwrap();
        assert_eq!(setting.default_value(), "App");
        assert!(setting.overrides().is_empty());
        assert_eq!(setting.kind(), SettingKind::String);
    }

    #[test]
    fn test_conditional_write_creates_empty_default() {
        let mut store = SettingsStore::new();
        store.set_value("ARCHS", "arm64", ConditionSet::new().with("sdk", "iphoneos"));

        let setting = store.setting("ARCHS").unwrap();
        assert_eq!(setting.default_value(), "");
        assert_eq!(setting.overrides().len(), 1);
    }

    #[test]
    fn test_names_are_unique_and_sorted() {
        let mut store = SettingsStore::new();
        store.set_value("B", "1", ConditionSet::new());
        store.set_value("A", "1", ConditionSet::new());
        store.set_value("B", "2", ConditionSet::new());

        assert_eq!(store.len(), 2);
        assert_eq!(store.names().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_apply_document_in_order() {
        let mut store = SettingsStore::new();
        let doc = ConfigDocument::parse(
            "// comment\nA = 1\nA = 2\nB[config=Debug] = x\n",
            "/virtual/App.xcconfig",
        )
        .unwrap();
        store.apply_document(&doc, Tier::Project).unwrap();

        let a = store.setting("A").unwrap();
        assert_eq!(a.default_value(), "1");
        assert_eq!(a.overrides()[0].value, "2");
        assert_eq!(a.overrides()[0].tier, Tier::Project);
        assert_eq!(store.sources().len(), 1);
        assert_eq!(store.sources()[0].tier, Tier::Project);
    }

    #[test]
    fn test_include_applied_before_next_line() {
        let dir = TempDir::new().unwrap();
        write(&dir, "Shared/Base.xcconfig", "KEY = 1\nONLY_BASE = yes\n");
        let app = write(&dir, "App.xcconfig", "#include \"Shared/Base.xcconfig\"\nKEY = 2\n");

        let mut store = SettingsStore::new();
        store.apply_file(&app, Tier::Project).unwrap();

        let key = store.setting("KEY").unwrap();
        assert_eq!(key.default_value(), "1");
        assert_eq!(key.overrides()[0].value, "2");
        assert_eq!(raw_default(&store, "ONLY_BASE"), "yes");
        assert_eq!(store.sources().len(), 2);
        assert!(store.sources()[1].path.ends_with("Base.xcconfig"));
    }

    #[test]
    fn test_include_cycle_detected() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "A.xcconfig", "#include \"B.xcconfig\"\n");
        write(&dir, "B.xcconfig", "#include \"A.xcconfig\"\n");

        let mut store = SettingsStore::new();
        let err = store.apply_file(&a, Tier::Project).unwrap_err();
        match err {
            SettingsError::IncludeCycle { chain } => assert_eq!(chain.len(), 3),
            other => panic!("expected include cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_self_include_detected() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "A.xcconfig", "X = 1\n#include \"./A.xcconfig\"\n");

        let mut store = SettingsStore::new();
        assert!(matches!(
            store.apply_file(&a, Tier::Project),
            Err(SettingsError::IncludeCycle { .. })
        ));
    }

    #[test]
    fn test_diamond_include_allowed() {
        let dir = TempDir::new().unwrap();
        write(&dir, "Common.xcconfig", "COMMON = yes\n");
        write(&dir, "Left.xcconfig", "#include \"Common.xcconfig\"\n");
        write(&dir, "Right.xcconfig", "#include \"Common.xcconfig\"\n");
        let top = write(
            &dir,
            "Top.xcconfig",
            "#include \"Left.xcconfig\"\n#include \"Right.xcconfig\"\n",
        );

        let mut store = SettingsStore::new();
        store.apply_file(&top, Tier::Project).unwrap();
        assert_eq!(raw_default(&store, "COMMON"), "yes");
    }

    #[test]
    fn test_missing_required_include_fails() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "A.xcconfig", "#include \"Missing.xcconfig\"\n");

        let mut store = SettingsStore::new();
        let err = store.apply_file(&a, Tier::Project).unwrap_err();
        assert!(matches!(err, SettingsError::Document(_)));
        assert!(err.to_string().contains("Missing.xcconfig"));
    }

    #[test]
    fn test_missing_optional_include_skipped() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "A.xcconfig", "#include? \"Local.xcconfig\"\nX = 1\n");

        let mut store = SettingsStore::new();
        store.apply_file(&a, Tier::Project).unwrap();
        assert_eq!(raw_default(&store, "X"), "1");
    }

    #[test]
    fn test_malformed_included_document_is_fatal() {
        let dir = TempDir::new().unwrap();
        write(&dir, "Bad.xcconfig", "X[sdk=] = 1\n");
        let a = write(&dir, "A.xcconfig", "#include \"Bad.xcconfig\"\n");

        let mut store = SettingsStore::new();
        let err = store.apply_file(&a, Tier::Project).unwrap_err();
        assert!(err.to_string().contains("Bad.xcconfig"));
    }

    #[test]
    fn test_definitions_declare_kind() {
        let mut store = SettingsStore::new();
        store.set_value("ARCHS", "arm64", ConditionSet::new());
        store.add_definitions(vec![
            SettingDefinition {
                name: "ARCHS".to_string(),
                kind: SettingKind::StringList,
                default_value: Some("x86_64".to_string()),
            },
            SettingDefinition {
                name: "ENABLE_BITCODE".to_string(),
                kind: SettingKind::Boolean,
                default_value: Some("NO".to_string()),
            },
        ]);

        let archs = store.setting("ARCHS").unwrap();
        assert_eq!(archs.kind(), SettingKind::StringList);
        assert_eq!(archs.default_value(), "arm64");

        let bitcode = store.setting("ENABLE_BITCODE").unwrap();
        assert_eq!(bitcode.kind(), SettingKind::Boolean);
        assert_eq!(bitcode.default_value(), "NO");
    }
}
