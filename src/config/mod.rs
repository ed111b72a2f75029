//! Engine configuration and builtin settings documents
//!
//! - `engine`: resolution limits and options, loaded from TOML
//! - `defaults`: the builtin `defaults.xcconfig` and `runtime.xcconfig`

mod defaults;
mod engine;

pub use defaults::{builtin_documents, DEFAULTS_XCCONFIG, RUNTIME_XCCONFIG};
pub use engine::{ConfigError, EngineConfig};
