//! # blockstyle - scoped CSS for content blocks
//!
//! The runtime side of `fieldcss`. An [`Engine`] holds a schema registry
//! and an [`EngineConfig`], and turns `(block type, instance id, settings)`
//! into a minified stylesheet scoped to that instance's wrapper class.
//! Results are cached by a canonical hash of their inputs.
//!
//! ```text
//! settings ─▶ Engine::generate ─▶ cache ─▶ assemble ─▶ render ─▶ CSS
//! ```
//!
//! ## Modules
//!
//! - [`engine`]: the public entry point
//! - [`assembly`]: orders base rules, media overrides and custom CSS
//! - [`cache`]: keyed, single-flight cache with TTL and capacity
//! - [`config`]: engine options loaded from JSON
//! - [`log_init`]: a file logger for hosts without a `log` backend

pub mod assembly;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod log_init;

pub use cache::{CacheKey, CacheStats};
pub use config::EngineConfig;
pub use engine::{Engine, Generated};
pub use error::{Error, Result};
