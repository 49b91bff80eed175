//! Generates the stylesheet for a card block from a schema document on
//! disk. Set `BLOCKSTYLE_LOG` to a file path to capture the engine's logs.

use blockstyle::log_init::init_logger;
use blockstyle_rs::{Engine, OutputStyle, SchemaRegistry, engine_from_files, settings_from_json};
use std::path::Path;
use std::sync::Arc;

fn main() -> blockstyle_rs::Result<()> {
    if let Ok(path) = std::env::var("BLOCKSTYLE_LOG") {
        init_logger(path, log::LevelFilter::Debug)?;
    }

    let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos");
    let engine = engine_from_files(None, &[demos.join("card_schema.json")])?;
    let settings = settings_from_json(serde_json::from_str(include_str!("card_settings.json"))?);

    let out = engine.generate("card", "hero-1", &settings)?;
    println!("/* compact */\n{}\n", out.css);
    for error in &out.errors {
        eprintln!("error: {error}");
    }
    for warning in &out.warnings {
        eprintln!("warning: {warning}");
    }

    // The second request for the same settings comes from the cache.
    engine.generate("card", "hero-1", &settings)?;
    let stats = engine.cache_stats();
    println!("/* cache: {} hit(s), {} miss(es) */\n", stats.hits, stats.misses);

    let mut builder = SchemaRegistry::builder();
    builder.load_file(demos.join("card_schema.json"))?;
    let pretty = Engine::new(
        engine.config().clone().with_output(OutputStyle::Expanded),
        Arc::new(builder.build()),
    )?;
    println!("/* expanded */\n{}", pretty.generate("card", "hero-1", &settings)?.css);
    Ok(())
}
