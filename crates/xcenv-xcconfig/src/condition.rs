//! Condition sets attached to setting assignments.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;

/// Immutable set of `axis=pattern` constraints.
///
/// The empty set is unconditional and matches every context. A non-empty set
/// matches a context when every axis it names has a value in the context and
/// that value matches the pattern. Axes the set does not name are
/// unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionSet(BTreeMap<String, String>);

impl ConditionSet {
    /// The unconditional set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper adding one constraint.
    pub fn with(mut self, axis: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.0.insert(axis.into(), pattern.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of constrained axes, used as the specificity of the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, axis: &str) -> Option<&str> {
        self.0.get(axis).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check the set against a context given as a lookup function.
    pub fn matches<F>(&self, mut lookup: F) -> bool
    where
        F: FnMut(&str) -> Option<String>,
    {
        match self.try_matches(|axis| Ok::<_, Infallible>(lookup(axis))) {
            Ok(matched) => matched,
            Err(never) => match never {},
        }
    }

    /// Fallible variant of [`matches`](Self::matches).
    ///
    /// Axes are looked up lazily in order and evaluation stops at the first
    /// mismatch, so a context only computes the axes a set actually names.
    pub fn try_matches<F, E>(&self, mut lookup: F) -> Result<bool, E>
    where
        F: FnMut(&str) -> Result<Option<String>, E>,
    {
        for (axis, pattern) in &self.0 {
            match lookup(axis)? {
                Some(value) if pattern_matches(pattern, &value) => {}
                _ => return Ok(false),
            }
        }
        Ok(true)
    }
}

impl<K, V> FromIterator<(K, V)> for ConditionSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Display for ConditionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        write!(f, "[")?;
        for (i, (axis, pattern)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}={}", axis, pattern)?;
        }
        write!(f, "]")
    }
}

/// Match a condition pattern against a context value.
///
/// `*` matches any run of characters (including none); everything else is
/// literal.
pub fn pattern_matches(pattern: &str, value: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == value;
    }

    let mut parts = pattern.split('*');
    // split always yields at least one element
    let first = parts.next().unwrap_or_default();
    let Some(mut rest) = value.strip_prefix(first) else {
        return false;
    };

    let mut parts: Vec<&str> = parts.collect();
    let last = parts.pop().unwrap_or_default();

    for part in parts {
        if part.is_empty() {
            continue;
        }
        match rest.find(part) {
            Some(idx) => rest = &rest[idx + part.len()..],
            None => return false,
        }
    }

    rest.len() >= last.len() && rest.ends_with(last)
}
