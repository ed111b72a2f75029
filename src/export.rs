//! Export of the resolved settings
//!
//! Two forms:
//! - shell `export KEY=value` lines, quoted for string-typed settings
//! - a JSON snapshot of the resolved map with the documents it came from

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::SettingsError;
use crate::settings::{DocumentSource, SettingKind, SettingsStore};

/// Schema version for the resolved settings snapshot
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "xcenv/resolved_settings@1";

/// Resolved settings with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedSettings {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When the snapshot was taken
    pub created_at: DateTime<Utc>,

    /// Documents applied to the store, in application order
    pub sources: Vec<DocumentSource>,

    /// Setting name -> resolved value
    pub settings: BTreeMap<String, String>,
}

impl ResolvedSettings {
    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write to file
    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.settings.get(name).map(String::as_str)
    }
}

impl SettingsStore {
    /// Every setting resolved and expanded, by name.
    pub fn resolved(&self) -> Result<BTreeMap<String, String>, SettingsError> {
        self.names()
            .map(|name| {
                let value = self.value(name)?.unwrap_or_default();
                Ok((name.to_string(), value))
            })
            .collect()
    }

    /// `export KEY=value` lines in lexicographic order.
    pub fn export(&self) -> Result<Vec<String>, SettingsError> {
        self.settings
            .iter()
            .map(|(name, setting)| {
                let value = self.value(name)?.unwrap_or_default();
                Ok(format_export(name, &value, setting.kind()))
            })
            .collect()
    }

    /// Snapshot of the resolved settings and their sources.
    pub fn snapshot(&self) -> Result<ResolvedSettings, SettingsError> {
        Ok(ResolvedSettings {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            sources: self.sources().to_vec(),
            settings: self.resolved()?,
        })
    }
}

/// Format one export line.
///
/// String values are double quoted with `\`, `"`, `$` and `` ` `` escaped.
/// Other kinds are written as is, except that a leading `"` or `\` is
/// backslash escaped so the value cannot be read back as a quoted one.
pub fn format_export(name: &str, value: &str, kind: SettingKind) -> String {
    if !kind.is_quoted() {
        let escape = if value.starts_with(['"', '\\']) { "\\" } else { "" };
        return format!("export {}={}{}", name, escape, value);
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    format!("export {}={}", name, quoted)
}

/// Parse a line produced by [`format_export`] back into name and value.
pub fn parse_export_line(line: &str) -> Option<(String, String)> {
    let (name, raw) = line.strip_prefix("export ")?.split_once('=')?;

    if let Some(unquoted) = raw.strip_prefix('\\') {
        return Some((name.to_string(), unquoted.to_string()));
    }

    let value = match raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
        Some(inner) => {
            let mut value = String::with_capacity(inner.len());
            let mut chars = inner.chars();
            while let Some(c) = chars.next() {
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        value.push(escaped);
                    }
                } else {
                    value.push(c);
                }
            }
            value
        }
        _ => raw.to_string(),
    };

    Some((name.to_string(), value))
}
