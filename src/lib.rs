//! Field-driven CSS for content blocks.
//!
//! This crate bundles the two workspace crates behind one import:
//!
//! - [`fieldcss`]: schemas, resolution, generators, sanitizer and emitter
//! - [`blockstyle`]: the cached [`Engine`] built on top of them
//!
//! Hosts that keep their schemas and configuration on disk can use
//! [`engine_from_files`] to set everything up in one call.

use std::path::Path;
use std::sync::Arc;

pub use blockstyle::{CacheKey, CacheStats, Engine, EngineConfig, Error, Generated, Result};
pub use fieldcss::emit::OutputStyle;
pub use fieldcss::sanitizer::SanitizePolicy;
pub use fieldcss::schema::{CompositeKind, Condition, FieldDescriptor, SchemaRegistry};
pub use fieldcss::types::{Breakpoint, Breakpoints};
pub use fieldcss::{Diagnostics, FieldError, SettingsTree, Warning};
pub use {blockstyle, fieldcss};

/// Builds an engine from an optional JSON configuration file and a list of
/// schema documents (each mapping block types to field lists).
pub fn engine_from_files<P: AsRef<Path>>(config: Option<&Path>, schemas: &[P]) -> Result<Engine> {
    let config = match config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    let mut builder = SchemaRegistry::builder();
    for path in schemas {
        builder.load_file(path)?;
    }
    Engine::new(config, Arc::new(builder.build()))
}

/// Converts a JSON object into a [`SettingsTree`]; anything else yields an
/// empty tree.
pub fn settings_from_json(value: serde_json::Value) -> SettingsTree {
    match value {
        serde_json::Value::Object(map) => map,
        _ => SettingsTree::new(),
    }
}
