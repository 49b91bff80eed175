//! The engine: the entry point a host uses to turn block settings into CSS.

use crate::assembly::{AssemblyContext, assemble};
use crate::cache::{CacheKey, CacheStats, StyleCache};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use fieldcss::error::{FieldError, Warning};
use fieldcss::schema::SchemaRegistry;
use fieldcss::SettingsTree;
use std::sync::Arc;

/// The outcome of one generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generated {
    pub css: String,
    /// Fields whose values were rejected, with the fallback applied.
    pub errors: Vec<FieldError>,
    pub warnings: Vec<Warning>,
}

impl Generated {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Generates and caches scoped stylesheets for block instances.
///
/// An `Engine` is `Send + Sync`; share it behind an `Arc` between request
/// handlers.
///
/// ```rust
/// use blockstyle::{Engine, EngineConfig};
/// use fieldcss::schema::{FieldDescriptor, SchemaRegistry};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let mut builder = SchemaRegistry::builder();
/// builder
///     .register(
///         "heading",
///         vec![FieldDescriptor::number("size")
///             .unit("px")
///             .property("font-size")
///             .selector("{{WRAPPER}} h2")],
///     )
///     .unwrap();
/// let engine = Engine::new(EngineConfig::default(), Arc::new(builder.build())).unwrap();
///
/// let settings = json!({"size": 32}).as_object().cloned().unwrap();
/// let out = engine.generate("heading", "7", &settings).unwrap();
/// assert_eq!(out.css, ".block-7 h2{font-size:32px}");
/// ```
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    registry: Arc<SchemaRegistry>,
    cache: StyleCache<Generated>,
}

impl Engine {
    pub fn new(config: EngineConfig, registry: Arc<SchemaRegistry>) -> Result<Self> {
        config.validate()?;
        log::info!(
            "style engine ready: {} block type(s), {} breakpoint(s)",
            registry.block_types().len(),
            config.breakpoints.len()
        );
        let cache = StyleCache::new(config.cache_ttl(), config.cache_capacity);
        Ok(Self {
            config,
            registry,
            cache,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Generates the stylesheet for one block instance, serving it from the
    /// cache when the same settings were seen before.
    ///
    /// Fails only for unknown block types and invalid instance ids. Bad
    /// field values are reported in [`Generated::errors`] and never abort.
    pub fn generate(
        &self,
        block_type: &str,
        instance_id: &str,
        settings: &SettingsTree,
    ) -> Result<Arc<Generated>> {
        validate_instance_id(instance_id)?;
        let schema = self.registry.lookup(block_type)?;
        let key = CacheKey::new(block_type, instance_id, settings);

        self.cache.get_or_generate(key, block_type, || {
            let wrapper = format!(".{}", self.wrapper_class(instance_id));
            let cx = AssemblyContext {
                breakpoints: &self.config.breakpoints,
                wrapper: &wrapper,
                policy: self.config.sanitize,
            };
            let sheet = assemble(schema, settings, &cx);
            let css = sheet.render(self.config.output);
            log::debug!(
                "{}#{}: generated {} bytes of CSS",
                block_type,
                instance_id,
                css.len()
            );
            Ok::<_, Error>(Generated {
                css,
                errors: sheet.diagnostics.errors,
                warnings: sheet.diagnostics.warnings,
            })
        })
    }

    /// The scoping class for an instance, without the leading dot.
    pub fn wrapper_class(&self, instance_id: &str) -> String {
        format!("{}{}", self.config.wrapper_prefix, instance_id)
    }

    /// Drops the cached stylesheet for exactly these settings.
    pub fn invalidate(&self, block_type: &str, instance_id: &str, settings: &SettingsTree) -> bool {
        self.cache
            .invalidate(CacheKey::new(block_type, instance_id, settings))
    }

    pub fn invalidate_block_type(&self, block_type: &str) -> usize {
        self.cache.invalidate_block_type(block_type)
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

fn validate_instance_id(id: &str) -> Result<()> {
    if id.is_empty()
        || !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(Error::InvalidInstanceId(id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldcss::FieldCssError;

    fn engine() -> Engine {
        Engine::new(EngineConfig::default(), Arc::new(SchemaRegistry::builder().build())).unwrap()
    }

    #[test]
    fn instance_ids_are_checked() {
        let engine = engine();
        for bad in ["", "a b", "x{", "1.2", "é"] {
            assert!(matches!(
                engine.generate("card", bad, &SettingsTree::new()),
                Err(Error::InvalidInstanceId(_))
            ));
        }
    }

    #[test]
    fn unknown_block_type_is_fatal_and_not_cached() {
        let engine = engine();
        let result = engine.generate("card", "1", &SettingsTree::new());
        assert!(matches!(
            result,
            Err(Error::Schema(FieldCssError::SchemaNotFound(_)))
        ));
        assert_eq!(engine.cache_stats().entries, 0);
    }

    #[test]
    fn wrapper_class_uses_prefix() {
        let engine = Engine::new(
            EngineConfig::new().with_wrapper_prefix("b"),
            Arc::new(SchemaRegistry::builder().build()),
        )
        .unwrap();
        assert_eq!(engine.wrapper_class("42"), "b42");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = Engine::new(
            EngineConfig::new().with_cache_capacity(0),
            Arc::new(SchemaRegistry::builder().build()),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
