//! Build context: the axis values conditions are matched against.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use xcenv_xcconfig::ConditionSet;

/// Axes and the settings that supply their value when no explicit context
/// is given.
pub const AXIS_SETTINGS: &[(&str, &str)] = &[
    ("sdk", "SDKROOT"),
    ("arch", "CURRENT_ARCH"),
    ("config", "CONFIGURATION"),
    ("configuration", "CONFIGURATION"),
    ("variant", "CURRENT_VARIANT"),
];

/// Setting backing an axis, if any.
pub fn axis_setting(axis: &str) -> Option<&'static str> {
    AXIS_SETTINGS
        .iter()
        .find(|(a, _)| *a == axis)
        .map(|(_, setting)| *setting)
}

/// Explicit axis values, e.g. `{sdk: iphoneos, arch: arm64}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildContext(BTreeMap<String, String>);

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, axis: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(axis.into(), value.into());
        self
    }

    pub fn get(&self, axis: &str) -> Option<&str> {
        self.0.get(axis).map(String::as_str)
    }

    pub fn matches(&self, conditions: &ConditionSet) -> bool {
        conditions.matches(|axis| self.get(axis).map(str::to_string))
    }
}
