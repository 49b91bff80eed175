use blockstyle::{CacheKey, Engine, EngineConfig, Error};
use fieldcss::schema::{FieldDescriptor, SchemaRegistry};
use fieldcss::{FieldCssError, SettingsTree};
use serde_json::json;
use std::sync::{Arc, Barrier};
use std::thread;

fn engine() -> Engine {
    let mut builder = SchemaRegistry::builder();
    builder
        .register(
            "hero",
            vec![
                FieldDescriptor::text("color").property("color").selector("{{WRAPPER}}"),
                FieldDescriptor::number("height").unit("vh").property("min-height").selector("{{WRAPPER}}"),
            ],
        )
        .unwrap();
    Engine::new(EngineConfig::default(), Arc::new(builder.build())).unwrap()
}

fn settings(color: &str) -> SettingsTree {
    json!({"color": color, "height": 60}).as_object().cloned().unwrap()
}

#[test]
fn test_repeat_request_is_served_from_cache() {
    let engine = engine();
    let first = engine.generate("hero", "1", &settings("red")).unwrap();
    let second = engine.generate("hero", "1", &settings("red")).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    let stats = engine.cache_stats();
    assert_eq!((stats.hits, stats.misses), (1, 1));
}

#[test]
fn test_key_order_does_not_matter() {
    let engine = engine();
    let mut reordered = SettingsTree::new();
    reordered.insert("height".into(), json!(60));
    reordered.insert("color".into(), json!("red"));
    assert_eq!(
        CacheKey::new("hero", "1", &settings("red")),
        CacheKey::new("hero", "1", &reordered)
    );
    engine.generate("hero", "1", &settings("red")).unwrap();
    engine.generate("hero", "1", &reordered).unwrap();
    assert_eq!(engine.cache_stats().misses, 1);
}

#[test]
fn test_changed_settings_miss() {
    let engine = engine();
    let red = engine.generate("hero", "1", &settings("red")).unwrap();
    let blue = engine.generate("hero", "1", &settings("blue")).unwrap();
    assert_ne!(red.css, blue.css);
    assert_eq!(engine.cache_stats().misses, 2);
}

#[test]
fn test_instances_are_scoped_separately() {
    let engine = engine();
    let a = engine.generate("hero", "a", &settings("red")).unwrap();
    let b = engine.generate("hero", "b", &settings("red")).unwrap();
    assert_eq!(a.css, ".block-a{color:red;min-height:60vh}");
    assert_eq!(b.css, ".block-b{color:red;min-height:60vh}");
}

#[test]
fn test_invalidate_forces_regeneration() {
    let engine = engine();
    engine.generate("hero", "1", &settings("red")).unwrap();
    assert!(engine.invalidate("hero", "1", &settings("red")));
    assert!(!engine.invalidate("hero", "1", &settings("red")));
    engine.generate("hero", "1", &settings("red")).unwrap();
    assert_eq!(engine.cache_stats().misses, 2);

    engine.generate("hero", "2", &settings("red")).unwrap();
    assert_eq!(engine.invalidate_block_type("hero"), 2);
    assert_eq!(engine.cache_stats().entries, 0);
}

#[test]
fn test_unknown_block_type_is_not_cached() {
    let engine = engine();
    for _ in 0..2 {
        let result = engine.generate("footer", "1", &SettingsTree::new());
        assert!(matches!(
            result,
            Err(Error::Schema(FieldCssError::SchemaNotFound(ref name))) if name == "footer"
        ));
    }
    let stats = engine.cache_stats();
    assert_eq!((stats.entries, stats.misses), (0, 0));
}

#[test]
fn test_concurrent_requests_generate_once() {
    const THREADS: usize = 8;
    let engine = Arc::new(engine());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                engine.generate("hero", "1", &settings("red")).unwrap()
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
    let stats = engine.cache_stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, (THREADS - 1) as u64);
}
