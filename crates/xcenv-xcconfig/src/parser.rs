//! Line-oriented xcconfig parser.
//!
//! Grammar, one construct per line:
//! - blank lines and `// comment`
//! - `#include "path"` and `#include? "path"` (missing file tolerated)
//! - `KEY[axis=value,axis=value][axis=value] = value`
//!
//! Values lose a trailing `// comment` and a trailing `;`.

use serde::{Deserialize, Serialize};

use crate::condition::ConditionSet;
use crate::error::ParseError;

/// One parsed line of an xcconfig document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConfigLine {
    /// A setting assignment.
    KeyValue {
        key: String,
        value: String,
        conditions: ConditionSet,
    },

    /// Comment or blank line. No semantic effect.
    Comment { text: String },

    /// An include directive; `path` is as written.
    Include { path: String, optional: bool },
}

/// Parse a whole document body.
///
/// A leading byte order mark is ignored.
pub fn parse_text(text: &str) -> Result<Vec<ConfigLine>, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    text.lines()
        .enumerate()
        .map(|(i, line)| parse_line(line, i + 1))
        .collect()
}

/// Parse a single line. `line_no` is only used for error reporting.
pub fn parse_line(line: &str, line_no: usize) -> Result<ConfigLine, ParseError> {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return Ok(ConfigLine::Comment {
            text: String::new(),
        });
    }

    if let Some(text) = trimmed.strip_prefix("//") {
        return Ok(ConfigLine::Comment {
            text: text.trim().to_string(),
        });
    }

    if trimmed.starts_with('#') {
        return parse_directive(trimmed, line_no);
    }

    parse_assignment(trimmed, line_no)
}

fn parse_directive(trimmed: &str, line_no: usize) -> Result<ConfigLine, ParseError> {
    let Some(rest) = trimmed.strip_prefix("#include") else {
        return Err(ParseError::UnknownDirective {
            line: line_no,
            text: trimmed.to_string(),
        });
    };

    let (optional, rest) = match rest.strip_prefix('?') {
        Some(r) => (true, r),
        None => (false, rest),
    };

    let malformed = || ParseError::MalformedInclude {
        line: line_no,
        text: trimmed.to_string(),
    };

    // `#includefoo` is not an include
    if !rest.starts_with(char::is_whitespace) && !rest.starts_with('"') {
        return Err(malformed());
    }

    let rest = rest.trim();
    let quoted = rest.strip_prefix('"').ok_or_else(malformed)?;
    let close = quoted.find('"').ok_or_else(malformed)?;
    let path = &quoted[..close];
    let trailing = quoted[close + 1..].trim();

    if path.is_empty() || !(trailing.is_empty() || trailing.starts_with("//")) {
        return Err(malformed());
    }

    Ok(ConfigLine::Include {
        path: path.to_string(),
        optional,
    })
}

fn parse_assignment(trimmed: &str, line_no: usize) -> Result<ConfigLine, ParseError> {
    let key_len = trimmed
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    let key = &trimmed[..key_len];

    if key.is_empty() || key.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(ParseError::InvalidKey {
            line: line_no,
            text: trimmed.to_string(),
        });
    }

    let mut rest = &trimmed[key_len..];
    let mut conditions = ConditionSet::new();

    while let Some(after_open) = rest.strip_prefix('[') {
        let close = after_open
            .find(']')
            .ok_or_else(|| ParseError::MalformedCondition {
                line: line_no,
                suffix: rest.to_string(),
                reason: "missing ']'".to_string(),
            })?;
        conditions = parse_condition_group(&after_open[..close], conditions, line_no)?;
        rest = &after_open[close + 1..];
    }

    let rest = rest.trim_start();
    let Some(value) = rest.strip_prefix('=') else {
        // `FOO-BAR = 1` has a bad key; `FOO` alone has no assignment
        if rest.contains('=') {
            return Err(ParseError::InvalidKey {
                line: line_no,
                text: trimmed.to_string(),
            });
        }
        return Err(ParseError::MissingAssignment {
            line: line_no,
            key: key.to_string(),
        });
    };

    let value = strip_trailing_comment(value).trim();
    let value = value.strip_suffix(';').unwrap_or(value).trim_end();

    Ok(ConfigLine::KeyValue {
        key: key.to_string(),
        value: value.to_string(),
        conditions,
    })
}

fn parse_condition_group(
    group: &str,
    mut conditions: ConditionSet,
    line_no: usize,
) -> Result<ConditionSet, ParseError> {
    let malformed = |reason: &str| ParseError::MalformedCondition {
        line: line_no,
        suffix: format!("[{}]", group),
        reason: reason.to_string(),
    };

    if group.trim().is_empty() {
        return Err(malformed("empty condition"));
    }

    for clause in group.split(',') {
        let (axis, pattern) = clause
            .split_once('=')
            .ok_or_else(|| malformed("expected axis=value"))?;
        let axis = axis.trim();
        let pattern = pattern.trim();

        if axis.is_empty() || !axis.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(malformed("invalid axis name"));
        }
        if pattern.is_empty() || pattern.contains('=') {
            return Err(malformed("invalid value"));
        }
        if conditions.get(axis).is_some() {
            return Err(malformed("axis constrained twice"));
        }

        conditions = conditions.with(axis, pattern);
    }

    Ok(conditions)
}

fn strip_trailing_comment(s: &str) -> &str {
    match s.find("//") {
        Some(idx) => &s[..idx],
        None => s,
    }
}
