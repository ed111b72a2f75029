//! Placeholder expansion and value resolution.
//!
//! `$(NAME)` and `${NAME}` are replaced by the resolved value of `NAME`,
//! repeatedly, until a pass over the string changes nothing. Resolving a
//! value may need other values, both through placeholders and through the
//! axes its conditions name (`sdk` reads `SDKROOT`), so resolution is
//! mutually recursive. A stack of the settings being resolved turns
//! re-entry into a `CyclicReference` error.

use regex_lite::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

use xcenv_xcconfig::ConditionSet;

use super::context::{axis_setting, BuildContext};
use super::setting::{Candidate, Setting};
use super::store::SettingsStore;
use crate::error::SettingsError;

const INHERITED: &str = "inherited";

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\$\((\w*)\)|\$\{(\w*)\}").expect("placeholder pattern is valid")
    })
}

/// Position of the value being expanded within its setting's ranked chain.
type Origin<'c, 's> = Option<(&'c [Candidate<'s>], usize)>;

struct Resolver<'s> {
    store: &'s SettingsStore,
    context: Option<&'s BuildContext>,
    stack: Vec<&'s str>,
}

impl<'s> Resolver<'s> {
    fn new(store: &'s SettingsStore, context: Option<&'s BuildContext>) -> Self {
        Self {
            store,
            context,
            stack: Vec::new(),
        }
    }

    fn value(&mut self, name: &str) -> Result<Option<String>, SettingsError> {
        let store = self.store;
        let Some((key, setting)) = store.settings.get_key_value(name) else {
            return Ok(None);
        };

        if self.stack.contains(&key.as_str()) {
            let mut chain: Vec<String> = self.stack.iter().map(|s| s.to_string()).collect();
            chain.push(key.clone());
            return Err(SettingsError::CyclicReference { chain });
        }

        let limit = store.config().max_depth;
        if self.stack.len() >= limit {
            return Err(SettingsError::DepthExceeded {
                name: key.clone(),
                limit,
            });
        }

        self.stack.push(key.as_str());
        let result = self.resolve_setting(setting);
        self.stack.pop();
        result.map(Some)
    }

    fn resolve_setting(&mut self, setting: &'s Setting) -> Result<String, SettingsError> {
        let ranked = setting.ranked(|conditions| self.conditions_match(conditions))?;
        self.expand_candidate(&ranked, 0)
    }

    fn conditions_match(&mut self, conditions: &ConditionSet) -> Result<bool, SettingsError> {
        conditions.try_matches(|axis| self.axis_value(axis))
    }

    fn axis_value(&mut self, axis: &str) -> Result<Option<String>, SettingsError> {
        if let Some(value) = self.context.and_then(|ctx| ctx.get(axis)) {
            return Ok(Some(value.to_string()));
        }
        match axis_setting(axis) {
            Some(name) => self.value(name),
            None => Ok(None),
        }
    }

    fn expand_candidate(
        &mut self,
        ranked: &[Candidate<'s>],
        index: usize,
    ) -> Result<String, SettingsError> {
        self.expand(ranked[index].value, Some((ranked, index)))
    }

    fn expand(&mut self, raw: &str, origin: Origin<'_, 's>) -> Result<String, SettingsError> {
        let limit = self.store.config().max_passes;
        let mut inherited = None;
        let mut current = raw.to_string();

        // `limit` changing passes, plus the pass that sees no change
        for _ in 0..=limit {
            let next = self.substitute(&current, origin, &mut inherited)?;
            if next == current {
                return Ok(next);
            }
            current = next;
        }

        Err(SettingsError::ExpansionLimit {
            subject: raw.to_string(),
            limit,
        })
    }

    /// One left-to-right pass over `text`.
    fn substitute(
        &mut self,
        text: &str,
        origin: Origin<'_, 's>,
        inherited: &mut Option<String>,
    ) -> Result<String, SettingsError> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for caps in placeholder().captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();

            out.push_str(&text[last..whole.start()]);
            last = whole.end();

            if name.is_empty() {
                // `$()` is an explicit empty string, e.g. `http:/$()/host`
                continue;
            } else if name == INHERITED {
                out.push_str(&self.inherited(origin, inherited)?);
            } else if let Some(value) = self.value(name)? {
                out.push_str(&value);
            } else if self.store.config().strict_references {
                return Err(SettingsError::UnknownReference {
                    name: name.to_string(),
                });
            } else {
                warn!(reference = name, "unknown build setting reference, dropping");
            }
        }

        out.push_str(&text[last..]);
        Ok(out)
    }

    /// Value of the next candidate below `origin`, expanded in its own
    /// position. Computed once per expansion.
    fn inherited(
        &mut self,
        origin: Origin<'_, 's>,
        cache: &mut Option<String>,
    ) -> Result<String, SettingsError> {
        if let Some(value) = cache {
            return Ok(value.clone());
        }

        let value = match origin {
            Some((ranked, index)) if index + 1 < ranked.len() => {
                self.expand_candidate(ranked, index + 1)?
            }
            _ => {
                debug!("$(inherited) has no less specific value, expanding to empty");
                String::new()
            }
        };

        *cache = Some(value.clone());
        Ok(value)
    }
}

impl SettingsStore {
    /// Resolved and expanded value of `name` under the store's own context.
    ///
    /// `None` if the setting was never written.
    pub fn value(&self, name: &str) -> Result<Option<String>, SettingsError> {
        Resolver::new(self, None).value(name)
    }

    /// Like [`value`](Self::value), with axis values taken from `context`
    /// first and from the store for axes it does not name.
    pub fn value_in_context(
        &self,
        name: &str,
        context: &BuildContext,
    ) -> Result<Option<String>, SettingsError> {
        Resolver::new(self, Some(context)).value(name)
    }

    /// Expand every placeholder in `raw` to a fixed point.
    pub fn expand(&self, raw: &str) -> Result<String, SettingsError> {
        Resolver::new(self, None).expand(raw, None)
    }
}
