//! xcenv - build settings resolution engine
//!
//! Computes the effective build settings of an xcconfig-driven build: a flat
//! namespace of named settings with conditional values, layered across
//! precedence tiers, and expanded through `$(NAME)` placeholders until a
//! fixed point.

pub mod actions;
pub mod config;
pub mod error;
pub mod export;
pub mod settings;

pub use actions::{components_for_action, injected_settings, BuildComponent};
pub use config::{ConfigError, EngineConfig};
pub use error::SettingsError;
pub use export::{format_export, parse_export_line, ResolvedSettings};
pub use settings::{
    BuildContext, Candidate, DocumentSource, Setting, SettingDefinition, SettingKind,
    SettingsStore, Tier,
};

pub use xcenv_platform::{
    JsonMetadataLoader, MemoryMetadataLoader, Metadata, MetadataLoader, PlatformDiscovery,
    PlatformError, StaticDiscovery,
};
pub use xcenv_xcconfig::{ConditionSet, ConfigDocument, ConfigLine, ParseError, XcconfigError};
