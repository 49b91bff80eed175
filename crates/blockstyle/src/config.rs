//! Engine configuration.
//!
//! Every option has a default, so an empty JSON object is a valid
//! configuration:
//!
//! ```json
//! {
//!   "breakpoints": [
//!     { "name": "wide", "min": 1024 },
//!     { "name": "medium", "min": 768, "max": 1023 },
//!     { "name": "narrow", "max": 767 }
//!   ],
//!   "wrapper_prefix": "block-",
//!   "output": "compact",
//!   "cache_ttl_secs": 3600,
//!   "cache_capacity": 1024,
//!   "sanitize": "AUTO_SCOPE | ALLOW_KEYFRAMES | ALLOW_MEDIA"
//! }
//! ```

use crate::error::{Error, Result};
use fieldcss::emit::OutputStyle;
use fieldcss::sanitizer::SanitizePolicy;
use fieldcss::types::Breakpoints;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub breakpoints: Breakpoints,
    /// Prepended to the instance id to form the scoping class.
    pub wrapper_prefix: String,
    pub output: OutputStyle,
    /// `None` keeps entries until they are invalidated or evicted.
    pub cache_ttl_secs: Option<u64>,
    pub cache_capacity: usize,
    pub sanitize: SanitizePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            breakpoints: Breakpoints::default(),
            wrapper_prefix: "block-".to_string(),
            output: OutputStyle::Compact,
            cache_ttl_secs: Some(3600),
            cache_capacity: 1024,
            sanitize: SanitizePolicy::default(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading engine configuration from {}", path.display());
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn with_breakpoints(mut self, breakpoints: Breakpoints) -> Self {
        self.breakpoints = breakpoints;
        self
    }

    pub fn with_wrapper_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.wrapper_prefix = prefix.into();
        self
    }

    pub fn with_output(mut self, output: OutputStyle) -> Self {
        self.output = output;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.cache_ttl_secs = ttl.map(|d| d.as_secs());
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_sanitize_policy(mut self, policy: SanitizePolicy) -> Self {
        self.sanitize = policy;
        self
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }

    /// Checks the options that serde cannot: the prefix must start a valid
    /// CSS class name and the cache must hold at least one entry.
    pub fn validate(&self) -> Result<()> {
        let mut chars = self.wrapper_prefix.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => {
                return Err(Error::Config(format!(
                    "wrapper prefix `{}` must start with a letter or `_`",
                    self.wrapper_prefix
                )));
            }
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(Error::Config(format!(
                "wrapper prefix `{}` may only contain letters, digits, `-` and `_`",
                self.wrapper_prefix
            )));
        }
        if self.cache_capacity == 0 {
            return Err(Error::Config("cache capacity must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.cache_ttl(), Some(Duration::from_secs(3600)));
        assert_eq!(config.breakpoints.len(), 3);
    }

    #[test]
    fn partial_document_overrides_fields() {
        let config = EngineConfig::from_json(
            r#"{
                "wrapper_prefix": "b",
                "output": "expanded",
                "cache_ttl_secs": null,
                "breakpoints": [
                    {"name": "phone", "max": 599},
                    {"name": "desktop", "min": 600}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.wrapper_prefix, "b");
        assert_eq!(config.output, OutputStyle::Expanded);
        assert_eq!(config.cache_ttl(), None);
        assert_eq!(config.breakpoints.widest().name, "desktop");
    }

    #[test]
    fn invalid_breakpoints_are_rejected() {
        let result = EngineConfig::from_json(r#"{"breakpoints": [{"name": "a"}, {"name": "b"}]}"#);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn prefix_must_be_a_class_name() {
        for bad in ["", "1block", "block prefix", ".block"] {
            let config = EngineConfig::new().with_wrapper_prefix(bad);
            assert!(matches!(config.validate(), Err(Error::Config(_))), "{bad}");
        }
        assert!(EngineConfig::new().with_wrapper_prefix("_b-").validate().is_ok());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = EngineConfig::new().with_cache_capacity(0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(EngineConfig::from_json(r#"{"wrapper": "x"}"#).is_err());
    }
}
