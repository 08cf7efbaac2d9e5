use intrin_core::{codes, from_json_slice, to_canonical_json_bytes, ErrorInfo, IntrinError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("name", "Iface_mma")
        .with_context("interface", "Iface")
}

#[test]
fn registry_error_surface() {
    let err = IntrinError::Registry(sample_info(codes::DUPLICATE_NAME, "already registered"));
    assert_eq!(err.code(), codes::DUPLICATE_NAME);
    assert!(err.is(codes::DUPLICATE_NAME));
    assert!(err.info().context.contains_key("name"));
}

#[test]
fn constraint_error_keeps_details_in_order() {
    let err = IntrinError::Constraint(
        ErrorInfo::new(codes::CONSTRAINT_VIOLATION, "unsatisfied").with_details(["a < 10", "0 < c"]),
    );
    assert_eq!(err.info().details, vec!["a < 10".to_string(), "0 < c".to_string()]);
}

#[test]
fn display_includes_context_and_hint() {
    let err = IntrinError::Resource(
        ErrorInfo::new(codes::MALFORMED_RESOURCE_SHAPE, "bad seed")
            .with_context("kind", "string")
            .with_hint("pass a mapping"),
    );
    let rendered = err.to_string();
    assert!(rendered.starts_with("resource error: bad seed (code: resource.malformed_shape)"));
    assert!(rendered.contains("kind=string"));
    assert!(rendered.contains("hint: pass a mapping"));
}

#[test]
fn errors_roundtrip_through_canonical_json() {
    let err = IntrinError::Generator(
        sample_info(codes::NAME_COLLISION, "suffix reused").with_details(["1_2"]),
    );
    let bytes = to_canonical_json_bytes(&err).expect("json");
    let parsed: IntrinError = from_json_slice(&bytes).expect("parse");
    assert_eq!(parsed, err);
    let text = String::from_utf8(bytes).expect("utf8");
    assert!(text.starts_with(r#"{"detail":"#));
}
