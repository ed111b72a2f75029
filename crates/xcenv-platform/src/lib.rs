//! Platform and SDK metadata for xcenv.
//!
//! Locating the developer directory, platforms and SDKs, and decoding their
//! property lists, happen outside this workspace. This crate defines the read
//! interfaces the settings engine consumes and simple implementations backed
//! by fixed paths and JSON files.

mod discovery;
mod error;
mod metadata;

pub use discovery::{PlatformDiscovery, SdkLocation, StaticDiscovery};
pub use error::PlatformError;
pub use metadata::{JsonMetadataLoader, MemoryMetadataLoader, Metadata, MetadataLoader};

/// File name of a platform's metadata inside the platform directory.
pub const PLATFORM_INFO_FILE: &str = "Info.plist";

/// File name of an SDK's metadata inside the SDK directory.
pub const SDK_SETTINGS_FILE: &str = "SDKSettings.plist";
