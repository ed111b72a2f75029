//! Seeding a store with builtin and platform/SDK defaults.

use std::path::Path;
use tracing::info;

use xcenv_platform::{MetadataLoader, PlatformDiscovery, PLATFORM_INFO_FILE, SDK_SETTINGS_FILE};
use xcenv_xcconfig::ConditionSet;

use super::setting::Tier;
use super::store::SettingsStore;
use crate::config::builtin_documents;
use crate::error::SettingsError;

impl SettingsStore {
    /// Load the builtin layer, in order:
    ///
    /// 1. `defaults.xcconfig`, then `runtime.xcconfig`
    /// 2. `DEVELOPER_DIR`, `PLATFORM_DIR`, `SDK_DIR` and
    ///    `PLATFORM_DEVELOPER_SDK_DIR` for the current `SDKROOT`
    /// 3. the platform's name, `DefaultProperties` and `OverrideProperties`
    /// 4. the SDK's canonical name (replacing `SDKROOT`) and `DefaultProperties`
    ///
    /// Everything is written unconditionally at [`Tier::Default`]. Any
    /// discovery or metadata failure aborts the load.
    pub fn load_defaults(
        &mut self,
        discovery: &dyn PlatformDiscovery,
        loader: &dyn MetadataLoader,
    ) -> Result<(), SettingsError> {
        for document in builtin_documents(self.config())? {
            self.apply_document(&document, Tier::Default)?;
        }

        let developer_dir = discovery.developer_dir()?;
        self.set_default("DEVELOPER_DIR", &developer_dir.display().to_string());

        let sdk = self.value("SDKROOT")?.unwrap_or_default();
        let platform_path = discovery.platform_path(&sdk)?;
        self.set_default("PLATFORM_DIR", &platform_path.display().to_string());

        let sdk_path = discovery.sdk_path(&sdk)?;
        self.set_default("SDK_DIR", &sdk_path.display().to_string());
        let sdk_parent = sdk_path.parent().unwrap_or_else(|| Path::new(""));
        self.set_default("PLATFORM_DEVELOPER_SDK_DIR", &sdk_parent.display().to_string());

        let platform_info_path = platform_path.join(PLATFORM_INFO_FILE);
        let platform = loader.load(&platform_info_path)?;
        self.set_default("PLATFORM_NAME", platform.require_name(&platform_info_path)?);
        self.set_default("PLATFORM_PREFERRED_ARCH", "");
        self.set_default("PLATFORM_PRODUCT_BUILD_VERSION", "");
        for (key, value) in &platform.default_properties {
            self.set_default(key, value);
        }
        if let Some(overrides) = &platform.override_properties {
            for (key, value) in overrides {
                self.set_default(key, value);
            }
        }

        let sdk_settings_path = sdk_path.join(SDK_SETTINGS_FILE);
        let sdk_info = loader.load(&sdk_settings_path)?;
        self.set_default("SDKROOT", sdk_info.require_canonical_name(&sdk_settings_path)?);
        for (key, value) in &sdk_info.default_properties {
            self.set_default(key, value);
        }

        self.set_default("CLANG_ANALYZER_MALLOC", "YES");

        info!(
            sdk = %sdk,
            platform = %platform_path.display(),
            settings = self.len(),
            "loaded default build settings"
        );
        Ok(())
    }

    fn set_default(&mut self, name: &str, value: &str) {
        self.set_value_at(Tier::Default, name, value, ConditionSet::new());
    }
}
