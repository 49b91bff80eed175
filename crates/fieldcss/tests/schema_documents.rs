use fieldcss::FieldCssError;
use fieldcss::schema::{CompositeKind, FieldKind, SchemaRegistry};

const CARD: &str = r#"{
    "card": [
        { "key": "background", "type": "composite", "kind": "background",
          "selectors": ["{{WRAPPER}}"] },
        { "key": "padding", "type": "composite", "kind": "spacing",
          "property": "padding", "responsive": true,
          "default": { "wide": 24, "narrow": "12px 8px" },
          "selectors": ["{{WRAPPER}} .card-body"] },
        { "key": "showBorder", "type": "toggle", "default": false },
        { "key": "border", "type": "composite", "kind": "border",
          "condition": { "op": "truthy", "field": "showBorder" },
          "selectors": ["{{WRAPPER}}"] },
        { "key": "titleSize", "type": "number", "min": 10, "max": 72, "step": 1,
          "unit": "px", "default": 24, "responsive": true,
          "selectors": ["{{WRAPPER}} h3 { font-size: {{VALUE}}{{UNIT}}; }"] },
        { "key": "css", "type": "custom_css" }
    ]
}"#;

#[test]
fn test_card_document_registers() {
    let mut builder = SchemaRegistry::builder();
    builder.register_document(CARD).unwrap();
    let registry = builder.build();

    let schema = registry.lookup("card").unwrap();
    assert_eq!(schema.len(), 6);
    assert_eq!(
        schema.field("padding").unwrap().kind(),
        &FieldKind::Composite {
            kind: CompositeKind::Spacing
        }
    );
    assert!(schema.field("titleSize").unwrap().is_responsive());
}

#[test]
fn test_register_json_rejects_unknown_kind() {
    let mut builder = SchemaRegistry::builder();
    let err = builder
        .register_json("x", r#"[{ "key": "a", "type": "slider" }]"#)
        .unwrap_err();
    assert!(matches!(err, FieldCssError::Json(_)));
}

#[test]
fn test_duplicate_block_types_in_separate_calls() {
    let mut builder = SchemaRegistry::builder();
    builder.register_document(CARD).unwrap();
    let err = builder.register_json("card", "[]").unwrap_err();
    assert!(matches!(err, FieldCssError::DuplicateSchema(t) if t == "card"));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let mut builder = SchemaRegistry::builder();
    let err = builder.load_file("/nonexistent/fields.json").unwrap_err();
    assert!(matches!(err, FieldCssError::Io(_)));
}

#[test]
fn test_invalid_default_names_the_field() {
    let mut builder = SchemaRegistry::builder();
    let err = builder
        .register_json(
            "x",
            r#"[{ "key": "align", "type": "choice", "options": ["left"], "default": "middle" }]"#,
        )
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("`align`"), "{message}");
    assert!(message.contains("schema `x`"), "{message}");
}
