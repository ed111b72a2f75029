//! Settings model and resolution
//!
//! - `setting`: one named setting, its tiers and conditional values
//! - `context`: axis values conditions are matched against
//! - `store`: the name -> setting map and document application
//! - `resolve`: placeholder expansion
//! - `defaults`: seeding the store from builtins and platform/SDK metadata

mod context;
mod defaults;
mod resolve;
mod setting;
mod store;

pub use context::{axis_setting, BuildContext, AXIS_SETTINGS};
pub use setting::{Candidate, ConditionalValue, Setting, SettingDefinition, SettingKind, Tier};
pub use store::{DocumentSource, SettingsStore};
