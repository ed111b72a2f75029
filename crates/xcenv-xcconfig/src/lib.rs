//! xcconfig document model.
//!
//! Parses xcconfig text into an ordered sequence of typed lines (settings,
//! comments, includes) and resolves include paths relative to the including
//! document.

mod condition;
mod document;
mod error;
mod parser;

pub use condition::{pattern_matches, ConditionSet};
pub use document::ConfigDocument;
pub use error::{ParseError, XcconfigError};
pub use parser::{parse_line, parse_text, ConfigLine};
