use std::sync::{Arc, Mutex};

use xjson_core::{
    resolve, AliasRegistry, LogSink, Member, Options, Severity, TypeDescriptor, TypeHint,
    XjsonError,
};

#[derive(Default)]
struct Widget {
    width: f64,
}

fn widget_descriptor() -> TypeDescriptor {
    TypeDescriptor::concrete(
        "Widget",
        Widget::default,
        vec![Member::new("Width", TypeHint::F64, |w: &mut Widget, v: f64| {
            w.width = v
        })],
    )
}

fn options_with(aliases: AliasRegistry) -> Options {
    Options {
        aliases,
        ..Options::default()
    }
}

/// Helper: a sink that records every message with its severity.
fn capture_log() -> (LogSink, Arc<Mutex<Vec<(Severity, String)>>>) {
    let store = Arc::new(Mutex::new(Vec::new()));
    let sink_store = Arc::clone(&store);
    let sink: LogSink = Arc::new(move |severity, message: &str| {
        sink_store.lock().unwrap().push((severity, message.to_string()));
    });
    (sink, store)
}

// ============================================================================
// Alias lookup
// ============================================================================

#[test]
fn registered_alias_resolves() {
    let mut aliases = AliasRegistry::new();
    aliases.register("Widget", TypeHint::object(widget_descriptor()));
    let options = options_with(aliases);

    let hint = resolve("Widget", &options).unwrap();
    match hint {
        TypeHint::Object(descriptor) => assert_eq!(descriptor.name(), "Widget"),
        other => panic!("expected an object hint, got {other:?}"),
    }
}

#[test]
fn unregistered_name_fails() {
    let mut aliases = AliasRegistry::new();
    aliases.register("Widget", TypeHint::object(widget_descriptor()));
    let options = options_with(aliases);

    match resolve("Gadget", &options) {
        Err(XjsonError::TypeResolution { name }) => assert_eq!(name, "Gadget"),
        other => panic!("expected TypeResolution, got {other:?}"),
    }
}

#[test]
fn empty_registry_fails_with_lookup_disabled() {
    let options = Options::default();
    assert!(matches!(
        resolve("Widget", &options),
        Err(XjsonError::TypeResolution { .. })
    ));
}

#[test]
fn last_registration_wins() {
    let mut aliases = AliasRegistry::new();
    aliases.register("n", TypeHint::I32);
    aliases.register("n", TypeHint::Str);
    let options = options_with(aliases);

    assert!(matches!(resolve("n", &options), Ok(TypeHint::Str)));
}

#[test]
fn resolution_failure_reports_through_the_sink() {
    let (sink, store) = capture_log();
    let options = Options {
        log: Some(sink),
        ..Options::default()
    };

    let _ = resolve("Missing", &options);
    let messages = store.lock().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, Severity::Error);
    assert!(messages[0].1.contains("Missing"));
}

// ============================================================================
// Fully-qualified lookup (opt-in)
// ============================================================================

#[test]
fn qualified_lookup_is_off_by_default() {
    let descriptor = widget_descriptor();
    let qualified = descriptor.qualified().to_string();
    let mut aliases = AliasRegistry::new();
    aliases.register("Widget", TypeHint::object(descriptor));
    let options = options_with(aliases);

    assert!(matches!(
        resolve(&qualified, &options),
        Err(XjsonError::TypeResolution { .. })
    ));
}

#[test]
fn qualified_lookup_resolves_when_enabled() {
    let descriptor = widget_descriptor();
    let qualified = descriptor.qualified().to_string();
    let mut aliases = AliasRegistry::new();
    aliases.register("Widget", TypeHint::object(descriptor));
    let options = Options {
        allow_fully_qualified_types: true,
        ..options_with(aliases)
    };

    let hint = resolve(&qualified, &options).unwrap();
    match hint {
        TypeHint::Object(descriptor) => assert_eq!(descriptor.qualified(), qualified),
        other => panic!("expected an object hint, got {other:?}"),
    }
}

// ============================================================================
// Construction modes
// ============================================================================

#[test]
fn builtin_aliases_cover_primitives_and_arrays() {
    let aliases = AliasRegistry::builtin();
    assert!(matches!(aliases.get("int"), Some(TypeHint::I32)));
    assert!(matches!(aliases.get("float"), Some(TypeHint::F32)));
    assert!(matches!(aliases.get("long"), Some(TypeHint::I64)));
    assert!(matches!(aliases.get("ulong"), Some(TypeHint::U64)));
    assert!(
        matches!(aliases.get("bool[]"), Some(TypeHint::Seq(e)) if matches!(**e, TypeHint::Bool))
    );
    assert!(
        matches!(aliases.get("boolean[]"), Some(TypeHint::Seq(e)) if matches!(**e, TypeHint::Bool))
    );
    assert!(
        matches!(aliases.get("double[]"), Some(TypeHint::Seq(e)) if matches!(**e, TypeHint::F64))
    );
    assert!(
        matches!(aliases.get("object[]"), Some(TypeHint::Seq(e)) if matches!(**e, TypeHint::Unspecified))
    );
    assert!(
        matches!(aliases.get("string[]"), Some(TypeHint::Seq(e)) if matches!(**e, TypeHint::Str))
    );
    assert!(matches!(aliases.get("uint[]"), Some(TypeHint::Seq(e)) if matches!(**e, TypeHint::U32)));
}

#[test]
fn scan_admits_only_concrete_types() {
    let aliases = AliasRegistry::scan([widget_descriptor(), TypeDescriptor::interface("Shape")]);
    assert_eq!(aliases.len(), 1);
    assert!(aliases.contains("Widget"));
    assert!(!aliases.contains("Shape"));
}

#[test]
fn modes_compose_by_layering() {
    let mut aliases = AliasRegistry::builtin();
    aliases.merge(AliasRegistry::scan([widget_descriptor()]));
    // Explicit registration on top overrides a built-in.
    aliases.register("int", TypeHint::Str);

    assert!(aliases.contains("Widget"));
    assert!(matches!(aliases.get("int"), Some(TypeHint::Str)));
    assert!(matches!(aliases.get("float"), Some(TypeHint::F32)));
}

#[test]
fn from_pairs_builds_a_registry() {
    let aliases = AliasRegistry::from_pairs([
        ("w", TypeHint::object(widget_descriptor())),
        ("count", TypeHint::I64),
    ]);
    assert_eq!(aliases.len(), 2);
    assert!(matches!(aliases.get("count"), Some(TypeHint::I64)));
}
