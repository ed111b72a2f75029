//! Build action -> component derivation.
//!
//! The requested `ACTION` decides which components of a target are built
//! (`headers`, `build`, `source`, `resources`). Install-style actions also
//! force deployment settings before the components are reported.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use xcenv_xcconfig::ConditionSet;

use crate::error::SettingsError;
use crate::settings::{SettingsStore, Tier};

/// A component of a target that an action builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildComponent {
    Headers,
    Build,
    Source,
    Resources,
}

impl BuildComponent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Headers => "headers",
            Self::Build => "build",
            Self::Source => "source",
            Self::Resources => "resources",
        }
    }
}

impl fmt::Display for BuildComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use BuildComponent::{Build, Headers, Resources, Source};

/// Components built by each action.
const ACTION_COMPONENTS: &[(&str, &[BuildComponent])] = &[
    ("build", &[Headers, Build]),
    ("analyze", &[Headers, Build]),
    ("copysrc", &[Source]),
    ("copyhdrs", &[Headers]),
    ("copyrsrcs", &[Resources]),
    ("install", &[Headers, Build]),
    ("installdebugonly", &[Build]),
    ("installprofileonly", &[Build]),
    ("installdebugprofileonly", &[Build]),
    ("installhdrs", &[Headers]),
    ("installsrc", &[Source]),
    ("installrsrcs", &[Resources]),
];

const DEPLOY: [(&str, &str); 2] = [
    ("DEPLOYMENT_LOCATION", "YES"),
    ("DEPLOYMENT_POSTPROCESSING", "YES"),
];

/// Settings forced by each action.
const ACTION_SETTINGS: &[(&str, &[(&str, &str)])] = &[
    (
        "installdebugonly",
        &[DEPLOY[0], DEPLOY[1], ("BUILD_VARIANTS", "debug")],
    ),
    (
        "installprofileonly",
        &[DEPLOY[0], DEPLOY[1], ("BUILD_VARIANTS", "profile")],
    ),
    (
        "installdebugprofileonly",
        &[DEPLOY[0], DEPLOY[1], ("BUILD_VARIANTS", "profile debug")],
    ),
    ("installhdrs", &DEPLOY),
    ("installsrc", &DEPLOY),
    ("installrsrcs", &DEPLOY),
];

/// Components built by `action`, or `None` for an unknown action.
pub fn components_for_action(action: &str) -> Option<&'static [BuildComponent]> {
    ACTION_COMPONENTS
        .iter()
        .find(|(name, _)| *name == action)
        .map(|(_, components)| *components)
}

/// Settings `action` forces; empty for actions that force nothing.
pub fn injected_settings(action: &str) -> &'static [(&'static str, &'static str)] {
    ACTION_SETTINGS
        .iter()
        .find(|(name, _)| *name == action)
        .map(|(_, settings)| *settings)
        .unwrap_or(&[])
}

impl SettingsStore {
    /// Components for the current `ACTION`, space separated.
    ///
    /// Forced settings are written unconditionally at [`Tier::Target`]. An
    /// unknown or unset action logs a warning and yields an empty string.
    pub fn build_components(&mut self) -> Result<String, SettingsError> {
        let action = self.value("ACTION")?.unwrap_or_default();
        Ok(self.build_components_for(&action))
    }

    /// Components for an explicit action, applying its forced settings.
    pub fn build_components_for(&mut self, action: &str) -> String {
        for (name, value) in injected_settings(action) {
            self.set_value_at(Tier::Target, name, value, ConditionSet::new());
        }

        match components_for_action(action) {
            Some(components) => components
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            None => {
                warn!(action, "no build components for action");
                String::new()
            }
        }
    }
}
