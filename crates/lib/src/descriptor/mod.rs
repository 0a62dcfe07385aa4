//! Project descriptors: syntax front-ends, raw types and loading.
//!
//! # Modules
//!
//! - [`frontend`] - the [`Frontend`] trait plus JSON and YAML front-ends
//! - [`lua`] - Lua script descriptors
//! - [`load`] - validation of parsed values into [`ProjectNode`]s
//! - [`types`] - raw descriptor types

pub mod frontend;
pub mod load;
pub mod lua;
mod types;

pub use frontend::{Frontend, FrontendError, Frontends, JsonFrontend, YamlFrontend};
pub use load::DescriptorLoader;
pub use lua::LuaFrontend;
pub use types::*;
