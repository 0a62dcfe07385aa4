//! trellis-lib: project descriptor resolution
//!
//! This crate turns a tree of build descriptors into fully resolved,
//! per-module effective configurations:
//! - `ProjectNode`: a single descriptor as written, loaded through a front-end
//! - `ResolvedProject`: a descriptor after inheritance, property substitution and plugin merging
//! - `ProjectTree`: an aggregator and its modules, in declared build order
//!
//! [`Engine::resolve_tree`] runs the whole pipeline; [`resolve_tree`] does so
//! with the default front-ends and parent lookup.

pub mod aggregate;
pub mod config;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod placeholder;
pub mod resolve;
pub mod util;
pub mod value;

pub use aggregate::{ModuleEntry, ProjectTree};
pub use config::{ErrorMode, MissingProperty, ResolveConfig};
pub use descriptor::{DescriptorLoader, PluginConfig, ProjectNode};
pub use engine::{Engine, resolve_tree};
pub use error::{ErrorReport, ModulePath, ResolveError};
pub use resolve::ResolvedProject;
