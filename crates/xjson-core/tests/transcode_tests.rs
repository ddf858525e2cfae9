use xjson_core::{transcode, Member, Options, TypeDescriptor, TypeHint};

#[derive(Default)]
struct Probe {
    label: String,
}

/// Helper: a concrete target hint whose qualified name we can assert on.
fn probe_hint() -> TypeHint {
    TypeHint::object(TypeDescriptor::concrete(
        "Probe",
        Probe::default,
        vec![Member::new("Label", TypeHint::Str, |p: &mut Probe, v: String| {
            p.label = v
        })],
    ))
}

fn qualified_of(hint: &TypeHint) -> String {
    match hint {
        TypeHint::Object(descriptor) => descriptor.qualified().to_string(),
        _ => panic!("expected an object hint"),
    }
}

// ============================================================================
// Comment and blank-line stripping
// ============================================================================

#[test]
fn strips_comments_blanks_and_wraps() {
    let source = "// comment\n\"a\": 1,\n\"b\": 2";
    let json = transcode(source, &TypeHint::Unspecified, &Options::default());
    assert_eq!(json, "{\n\"a\": 1,\n\"b\": 2\n}");
}

#[test]
fn strips_indented_comments_and_blank_lines() {
    let source = "   // indented note\n\n  \t\n\"a\": 1";
    let json = transcode(source, &TypeHint::Unspecified, &Options::default());
    assert_eq!(json, "{\n\"a\": 1\n}");
}

#[test]
fn comment_marker_inside_a_value_is_not_a_comment() {
    let source = "\"url\": \"//host/path\"";
    let json = transcode(source, &TypeHint::Unspecified, &Options::default());
    assert!(json.contains("//host/path"));
}

#[test]
fn output_parses_as_json() {
    let source = "// config\n\"name\": \"demo\",\n\"limit\": 3";
    let json = transcode(source, &TypeHint::Unspecified, &Options::default());
    let value: serde_json::Value = serde_json::from_str(&json).expect("output must parse");
    assert_eq!(value["name"], "demo");
    assert_eq!(value["limit"], 3);
}

#[test]
fn empty_source_becomes_empty_object() {
    let json = transcode("", &TypeHint::Unspecified, &Options::default());
    let value: serde_json::Value = serde_json::from_str(&json).expect("output must parse");
    assert_eq!(value, serde_json::json!({}));
}

// ============================================================================
// Type-tag injection
// ============================================================================

#[test]
fn injects_tag_for_concrete_target() {
    let hint = probe_hint();
    let json = transcode("\"Label\": \"x\"", &hint, &Options::default());
    let value: serde_json::Value = serde_json::from_str(&json).expect("output must parse");
    assert_eq!(value["__type"], qualified_of(&hint).as_str());
    assert_eq!(value["Label"], "x");
}

#[test]
fn injected_tag_has_no_comma_without_statements() {
    let hint = probe_hint();
    let json = transcode("// only a comment", &hint, &Options::default());
    assert!(!json.contains(','), "no other members, no comma: {json}");
    let value: serde_json::Value = serde_json::from_str(&json).expect("output must parse");
    assert_eq!(value.as_object().unwrap().len(), 1);
}

#[test]
fn no_injection_without_concrete_target() {
    for hint in [TypeHint::Unspecified, TypeHint::Dict] {
        let json = transcode("\"a\": 1", &hint, &Options::default());
        assert!(!json.contains("__type"), "unexpected tag in {json}");
    }
}

#[test]
fn no_injection_for_interface_target() {
    let hint = TypeHint::object(TypeDescriptor::interface("Persona"));
    let json = transcode("\"a\": 1", &hint, &Options::default());
    assert!(!json.contains("__type"));
}

#[test]
fn existing_tag_suppresses_injection() {
    let hint = probe_hint();
    let source = "\"__type\": \"Probe\",\n\"Label\": \"x\"";
    let json = transcode(source, &hint, &Options::default());
    assert_eq!(json.matches("__type").count(), 1);
    let value: serde_json::Value = serde_json::from_str(&json).expect("output must parse");
    assert_eq!(value["__type"], "Probe");
}

#[test]
fn tag_detection_requires_the_exact_key() {
    // A key merely starting with the tag text is not the tag.
    let hint = probe_hint();
    let source = "\"__typed\": \"x\"";
    let json = transcode(source, &hint, &Options::default());
    let value: serde_json::Value = serde_json::from_str(&json).expect("output must parse");
    let object = value.as_object().unwrap();
    assert!(object.contains_key("__type"));
    assert!(object.contains_key("__typed"));
}

#[test]
fn tag_detection_allows_space_before_colon() {
    let hint = probe_hint();
    let source = "\"__type\" : \"Probe\"";
    let json = transcode(source, &hint, &Options::default());
    assert_eq!(json.matches("__type").count(), 1);
}

#[test]
fn custom_type_tag_is_honored() {
    let options = Options {
        type_tag: "@class".to_string(),
        ..Options::default()
    };
    let hint = probe_hint();

    // Injection uses the configured tag.
    let json = transcode("\"a\": 1", &hint, &options);
    let value: serde_json::Value = serde_json::from_str(&json).expect("output must parse");
    assert_eq!(value["@class"], qualified_of(&hint).as_str());

    // Detection looks for the configured tag, so a default-named member is
    // just a statement.
    let json = transcode("\"@class\": \"Probe\"", &hint, &options);
    assert_eq!(json.matches("@class").count(), 1);
}
