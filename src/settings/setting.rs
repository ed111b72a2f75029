//! A single named setting and its conditional values.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use xcenv_xcconfig::ConditionSet;

use super::context::BuildContext;

/// Precedence level a value is defined at, least specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Default,
    Project,
    Configuration,
    Target,
}

/// Declared value type. Decides quoting on export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingKind {
    #[default]
    String,
    StringList,
    Path,
    PathList,
    #[serde(alias = "bool")]
    Boolean,
    Enumeration,
    Integer,
}

impl SettingKind {
    /// Whether exported values of this kind are double quoted.
    pub fn is_quoted(self) -> bool {
        self == SettingKind::String
    }
}

/// A setting declaration, e.g. from a build system specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SettingDefinition {
    pub name: String,

    #[serde(rename = "Type", default)]
    pub kind: SettingKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// One conditional value of a setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionalValue {
    pub tier: Tier,
    pub conditions: ConditionSet,
    pub value: String,
}

/// A value taking part in resolution, in rank order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub tier: Tier,
    pub specificity: usize,
    pub value: &'a str,
    seq: usize,
}

/// A named setting: an unconditional default plus ordered overrides.
#[derive(Debug, Clone, Serialize)]
pub struct Setting {
    name: String,
    kind: SettingKind,
    default_value: String,
    default_tier: Tier,
    overrides: Vec<ConditionalValue>,
}

impl Setting {
    pub fn new(name: impl Into<String>, kind: SettingKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default_value: String::new(),
            default_tier: Tier::Default,
            overrides: Vec::new(),
        }
    }

    /// A setting whose unconditional default is `value`, defined at `tier`.
    pub fn with_default(
        name: impl Into<String>,
        kind: SettingKind,
        tier: Tier,
        value: impl Into<String>,
    ) -> Self {
        Self {
            default_value: value.into(),
            default_tier: tier,
            ..Self::new(name, kind)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SettingKind {
        self.kind
    }

    pub(crate) fn set_kind(&mut self, kind: SettingKind) {
        self.kind = kind;
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    pub(crate) fn fill_default(&mut self, value: &str) {
        if self.default_value.is_empty() {
            self.default_value = value.to_string();
        }
    }

    pub fn overrides(&self) -> &[ConditionalValue] {
        &self.overrides
    }

    /// Add a conditional value.
    ///
    /// A value with the same tier and condition set as an existing override
    /// replaces it and becomes the most recent addition. A `$(inherited)` in
    /// the replacement refers to the value being replaced.
    pub fn add_override(&mut self, tier: Tier, conditions: ConditionSet, value: impl Into<String>) {
        let mut value = value.into();
        if let Some(pos) = self
            .overrides
            .iter()
            .position(|o| o.tier == tier && o.conditions == conditions)
        {
            let previous = self.overrides.remove(pos);
            value = splice_inherited(&value, &previous.value);
        }
        self.overrides.push(ConditionalValue {
            tier,
            conditions,
            value,
        });
    }

    /// All values whose conditions match, best first.
    ///
    /// Higher tiers rank first; within a tier more constrained condition sets
    /// rank first, then later additions. The default always takes part.
    pub fn ranked<F, E>(&self, mut matches: F) -> Result<Vec<Candidate<'_>>, E>
    where
        F: FnMut(&ConditionSet) -> Result<bool, E>,
    {
        let mut candidates = vec![Candidate {
            tier: self.default_tier,
            specificity: 0,
            value: &self.default_value,
            seq: 0,
        }];

        for (i, o) in self.overrides.iter().enumerate() {
            if matches(&o.conditions)? {
                candidates.push(Candidate {
                    tier: o.tier,
                    specificity: o.conditions.len(),
                    value: &o.value,
                    seq: i + 1,
                });
            }
        }

        candidates.sort_by_key(|c| Reverse((c.tier, c.specificity, c.seq)));
        Ok(candidates)
    }

    /// Raw (unexpanded) value selected for an explicit context.
    pub fn resolve(&self, context: &BuildContext) -> &str {
        let ranked = match self.ranked(|c| Ok::<_, std::convert::Infallible>(context.matches(c))) {
            Ok(ranked) => ranked,
            Err(never) => match never {},
        };
        ranked.first().map(|c| c.value).unwrap_or(&self.default_value)
    }
}

fn splice_inherited(value: &str, previous: &str) -> String {
    value
        .replace("$(inherited)", previous)
        .replace("${inherited}", previous)
}
