use fieldcss::{SanitizeError, WarningKind};
use fieldcss::emit::{CssWriter, OutputStyle};
use fieldcss::sanitizer::{SanitizePolicy, sanitize};

fn compact(source: &str) -> (String, Vec<WarningKind>) {
    let out = sanitize(source, ".block-xyz", SanitizePolicy::default()).unwrap();
    (CssWriter::default().write(&out.blocks), out.warnings)
}

#[test]
fn test_rejected_rule_leaves_empty_fragment() {
    let (css, warnings) = compact("a{background:url(javascript:alert(1))}");
    assert_eq!(css, "");
    assert_eq!(warnings.len(), 1);
    assert!(matches!(
        &warnings[0],
        WarningKind::SanitizerRejection { selector, .. } if selector == "a"
    ));
}

#[test]
fn test_already_scoped_rule_is_unchanged() {
    let (css, warnings) = compact("{{WRAPPER}} p{color:red}");
    assert_eq!(css, ".block-xyz p{color:red}");
    assert!(warnings.is_empty());
}

#[test]
fn test_unscoped_rule_is_prefixed() {
    let (css, _) = compact("p{color:red}");
    assert_eq!(css, ".block-xyz p{color:red}");
}

#[test]
fn test_comments_are_stripped() {
    let (css, _) = compact(
        r#"
        /* heading tweaks */
        h2 {
            letter-spacing: 1px; /* tighter */
            color: #333;
        }
        "#,
    );
    assert_eq!(css, ".block-xyz h2{letter-spacing:1px;color:#333}");
}

#[test]
fn test_wrapper_alone_styles_the_block() {
    let (css, _) = compact("{{WRAPPER}} { border-radius: 4px }");
    assert_eq!(css, ".block-xyz{border-radius:4px}");
}

#[test]
fn test_hover_on_wrapper_is_scoped() {
    let (css, _) = compact("{{WRAPPER}}:hover { opacity: .8 }");
    assert_eq!(css, ".block-xyz:hover{opacity:.8}");
}

#[test]
fn test_svg_data_uri_is_rejected() {
    let (css, warnings) = compact("a{background-image:url('data: image/svg+xml;utf8,<svg/>')}");
    assert_eq!(css, "");
    assert_eq!(warnings.len(), 1);
}

#[test]
fn test_png_data_uri_is_allowed() {
    let (css, warnings) = compact("a{background-image:url(data:image/png;base64,iVBORw0KGgo=)}");
    assert_eq!(
        css,
        ".block-xyz a{background-image:url(data:image/png;base64,iVBORw0KGgo=)}"
    );
    assert!(warnings.is_empty());
}

#[test]
fn test_nested_rules_are_rejected() {
    let (css, warnings) = compact("div { p { color: red } }");
    assert_eq!(css, "");
    assert_eq!(warnings.len(), 1);
}

#[test]
fn test_unbalanced_braces_are_malformed() {
    for source in ["p { color: red }}", "p { color: red"] {
        assert_eq!(
            sanitize(source, ".b1", SanitizePolicy::default()),
            Err(SanitizeError::UnbalancedBraces),
            "{source}"
        );
    }
}

#[test]
fn test_markup_in_keyframe_step_is_rejected() {
    let (css, warnings) =
        compact("@keyframes x { </style><script>alert(1)</script> { opacity: 0 } }");
    assert_eq!(css, "");
    assert!(matches!(
        &warnings[..],
        [WarningKind::SanitizerRejection { selector, .. }] if selector == "@keyframes x"
    ));
}

#[test]
fn test_wrapper_in_sibling_or_negation_is_prefixed() {
    let (css, _) = compact(":not(.block-xyz) a, .block-xyz ~ p { display: none }");
    assert_eq!(
        css,
        ".block-xyz :not(.block-xyz) a,.block-xyz .block-xyz ~ p{display:none}"
    );
    let (css, _) = compact("{{WRAPPER}} > p { display: none }");
    assert_eq!(css, ".block-xyz > p{display:none}");
}

#[test]
fn test_expanded_custom_css() {
    let out = sanitize(
        "p { color: red } @media (max-width: 600px) { p { color: blue } }",
        ".block-xyz",
        SanitizePolicy::default(),
    )
    .unwrap();
    let css = CssWriter::new(OutputStyle::Expanded).write(&out.blocks);
    insta::assert_snapshot!(css, @r"
.block-xyz p {
  color: red;
}
@media (max-width: 600px) {
  .block-xyz p {
    color: blue;
  }
}
");
}
