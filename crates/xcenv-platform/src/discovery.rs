//! Platform and SDK path discovery.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::PlatformError;

/// Locates the developer directory and the platform/SDK directories for an
/// SDK identifier such as `macosx` or `iphoneos17.2`.
pub trait PlatformDiscovery {
    fn developer_dir(&self) -> Result<PathBuf, PlatformError>;

    fn platform_path(&self, sdk: &str) -> Result<PathBuf, PlatformError>;

    fn sdk_path(&self, sdk: &str) -> Result<PathBuf, PlatformError>;
}

/// Directories belonging to one SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkLocation {
    pub platform: PathBuf,
    pub sdk: PathBuf,
}

/// Discovery over a fixed table of SDKs.
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    developer_dir: Option<PathBuf>,
    sdks: BTreeMap<String, SdkLocation>,
}

impl StaticDiscovery {
    pub fn new(developer_dir: impl Into<PathBuf>) -> Self {
        Self {
            developer_dir: Some(developer_dir.into()),
            sdks: BTreeMap::new(),
        }
    }

    /// Register an SDK under the identifier used to look it up.
    pub fn with_sdk(
        mut self,
        name: impl Into<String>,
        platform: impl Into<PathBuf>,
        sdk: impl Into<PathBuf>,
    ) -> Self {
        self.sdks.insert(
            name.into(),
            SdkLocation {
                platform: platform.into(),
                sdk: sdk.into(),
            },
        );
        self
    }

    /// Register an SDK laid out the way Xcode installs it:
    /// `<developer>/Platforms/<Platform>.platform/Developer/SDKs/<Platform>.sdk`.
    pub fn with_standard_sdk(self, name: impl Into<String>, platform_name: &str) -> Self {
        let developer_dir = self.developer_dir.clone().unwrap_or_default();
        let platform = developer_dir
            .join("Platforms")
            .join(format!("{}.platform", platform_name));
        let sdk = platform
            .join("Developer")
            .join("SDKs")
            .join(format!("{}.sdk", platform_name));
        self.with_sdk(name, platform, sdk)
    }

    fn location(&self, sdk: &str) -> Result<&SdkLocation, PlatformError> {
        self.sdks
            .get(sdk)
            .ok_or_else(|| PlatformError::SdkNotFound(sdk.to_string()))
    }
}

impl PlatformDiscovery for StaticDiscovery {
    fn developer_dir(&self) -> Result<PathBuf, PlatformError> {
        self.developer_dir.clone().ok_or(PlatformError::NoDeveloperDir)
    }

    fn platform_path(&self, sdk: &str) -> Result<PathBuf, PlatformError> {
        Ok(self.location(sdk)?.platform.clone())
    }

    fn sdk_path(&self, sdk: &str) -> Result<PathBuf, PlatformError> {
        Ok(self.location(sdk)?.sdk.clone())
    }
}
