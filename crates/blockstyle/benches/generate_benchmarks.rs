use blockstyle::{Engine, EngineConfig};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fieldcss::SettingsTree;
use fieldcss::schema::{CompositeKind, FieldDescriptor, SchemaRegistry};
use serde_json::json;
use std::sync::Arc;

fn engine() -> Engine {
    let mut builder = SchemaRegistry::builder();
    builder
        .register(
            "card",
            vec![
                FieldDescriptor::number("font_size")
                    .unit("px")
                    .responsive()
                    .selector("{{WRAPPER}} h2 { font-size: {{VALUE}}{{UNIT}}; }"),
                FieldDescriptor::composite("padding", CompositeKind::Spacing)
                    .property("padding")
                    .responsive()
                    .selector("{{WRAPPER}}"),
                FieldDescriptor::composite("background", CompositeKind::Background)
                    .selector("{{WRAPPER}}"),
                FieldDescriptor::composite("title", CompositeKind::Typography)
                    .selector("{{WRAPPER}} h2"),
                FieldDescriptor::custom_css("custom_css"),
            ],
        )
        .unwrap();
    Engine::new(EngineConfig::default(), Arc::new(builder.build())).unwrap()
}

fn settings(fields: usize) -> SettingsTree {
    let all = json!({
        "font_size": {"wide": 32, "medium": 28, "narrow": 22},
        "padding": {"wide": "24px 32px", "narrow": 12},
        "background": {
            "type": "gradient",
            "gradient": {"type": "linear", "angle": 135, "stops": [
                {"color": "#ff7a18"}, {"color": "#af002d"}, {"color": "#319197"}
            ]}
        },
        "title": {"family": "Open Sans, sans-serif", "size": 28, "weight": "600"},
        "custom_css": "a { color: inherit } a:hover { text-decoration: underline }"
    });
    all.as_object()
        .map(|m| m.iter().take(fields).map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default()
}

fn bench_generate(c: &mut Criterion) {
    let engine = engine();
    let mut group = c.benchmark_group("generate");

    for fields in [1, 3, 5] {
        let s = settings(fields);

        group.bench_with_input(BenchmarkId::new("cache_miss", fields), &s, |b, s| {
            b.iter(|| {
                engine.invalidate_all();
                engine.generate("card", "1", black_box(s)).unwrap()
            })
        });

        group.bench_with_input(BenchmarkId::new("cache_hit", fields), &s, |b, s| {
            engine.generate("card", "1", s).unwrap();
            b.iter(|| engine.generate("card", "1", black_box(s)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
