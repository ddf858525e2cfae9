//! Per-call configuration: alias registry, reserved names, security flag,
//! and the optional log sink.

use std::fmt;
use std::sync::Arc;

use crate::registry::AliasRegistry;

/// Severity attached to every message sent through the log sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Shared, thread-safe logging callback. Purely observational: whether a
/// sink is present never changes the outcome of a call.
pub type LogSink = Arc<dyn Fn(Severity, &str) + Send + Sync>;

/// Configuration for one deserialization call.
///
/// Read-only for the duration of a call. An `Options` value may be shared
/// across concurrently executing calls on different threads, provided the
/// log sink is itself safe for concurrent invocation.
#[derive(Clone)]
pub struct Options {
    /// Short names the input may use in type tags and inline annotations.
    pub aliases: AliasRegistry,
    /// Reserved object member naming the concrete type to instantiate.
    pub type_tag: String,
    /// Separator splitting `property:TypeName` member keys.
    pub type_separator: char,
    /// Permit resolving names through the qualified-name table when the
    /// alias registry has no entry. Off by default: input text choosing
    /// which types get constructed is an opt-in capability.
    pub allow_fully_qualified_types: bool,
    /// Optional message sink for informational, warning, and error output.
    pub log: Option<LogSink>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            aliases: AliasRegistry::new(),
            type_tag: "__type".to_string(),
            type_separator: ':',
            allow_fully_qualified_types: false,
            log: None,
        }
    }
}

impl Options {
    pub(crate) fn info(&self, message: &str) {
        self.emit(Severity::Info, message);
    }

    pub(crate) fn warn(&self, message: &str) {
        self.emit(Severity::Warning, message);
    }

    pub(crate) fn error(&self, message: &str) {
        self.emit(Severity::Error, message);
    }

    fn emit(&self, severity: Severity, message: &str) {
        if let Some(sink) = &self.log {
            sink(severity, message);
        }
    }
}
