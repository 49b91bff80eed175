//! Shows what the sanitizer does to user-written CSS under different
//! policies.

use blockstyle_rs::fieldcss::emit::CssWriter;
use blockstyle_rs::fieldcss::sanitizer::sanitize;
use blockstyle_rs::{Engine, EngineConfig, FieldDescriptor, SanitizePolicy, SchemaRegistry, settings_from_json};
use serde_json::json;
use std::sync::Arc;

const SOURCE: &str = r#"
/* user tweaks */
h2 { letter-spacing: 0.05em; }
{{WRAPPER}} .cta:hover { transform: translateY(-2px); }
body { margin: 0; }
.avatar { background: url("javascript:alert(1)"); }
@import url("https://example.com/evil.css");
@keyframes pulse { from { opacity: 1 } to { opacity: .6 } }
@media (max-width: 600px) { h2 { font-size: 18px; } }
"#;

fn main() -> blockstyle_rs::Result<()> {
    for (label, policy) in [
        ("default", SanitizePolicy::default()),
        ("no auto-scope", SanitizePolicy::all() - SanitizePolicy::AUTO_SCOPE),
        ("rules only", SanitizePolicy::AUTO_SCOPE),
    ] {
        println!("/* policy: {label} */");
        match sanitize(SOURCE, ".block-42", policy) {
            Ok(out) => {
                println!("{}", CssWriter::default().write(&out.blocks));
                for warning in out.warnings {
                    println!("  ! {warning}");
                }
            }
            Err(reason) => println!("  malformed: {reason}"),
        }
        println!();
    }

    let mut builder = SchemaRegistry::builder();
    builder.register("text", vec![FieldDescriptor::custom_css("custom_css")])?;
    let engine = Engine::new(EngineConfig::default(), Arc::new(builder.build()))?;

    let broken = settings_from_json(json!({"custom_css": "h2 { color: red"}));
    let out = engine.generate("text", "42", &broken)?;
    println!("/* unbalanced input */ css = {:?}", out.css);
    for error in &out.errors {
        println!("  ! {error}");
    }
    Ok(())
}
