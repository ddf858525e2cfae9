//! # xjson-core
//!
//! Type-directed deserialization of JSON and **XJSON** text into statically
//! named object graphs, without any serialization metadata on the target
//! types.
//!
//! Three pieces work together:
//!
//! - [`transcode`] — rewrites XJSON (full-line `//` comments, implicit
//!   top-level braces) into canonical JSON text before parsing
//! - [`registry`] — alias registry and type descriptors: callers register
//!   explicit tables describing how to construct types and assign members,
//!   and a default-off flag gates fully-qualified lookups
//! - the mapping engine — recursive descent over the parsed value tree,
//!   resolving `"__type"` tags and inline `property:TypeName` annotations to
//!   pick concrete types for interface-typed slots, falling back to ordered
//!   dictionaries where no concrete type is in play
//!
//! A reserved `"__version"` root member is gated against the engine's major
//! version before any mapping happens.
//!
//! ## Quick start
//!
//! ```rust
//! use xjson_core::{deserialize_xjson, Mapped, Options, TypeHint};
//!
//! // XJSON: comments and implicit top-level braces.
//! let source = "// player record\n\"name\": \"Ada\",\n\"score\": 42";
//! let options = Options::default();
//! let result = deserialize_xjson(source, &TypeHint::Unspecified, &options).unwrap();
//!
//! // With no hint, objects map to ordered dictionaries and numbers to f64.
//! assert_eq!(result.get("name"), Some(&Mapped::Str("Ada".into())));
//! assert_eq!(result.get("score"), Some(&Mapped::F64(42.0)));
//! ```
//!
//! ## Modules
//!
//! - [`transcode`] — XJSON → canonical JSON text
//! - [`registry`] — type descriptors, alias registry, name resolution
//! - [`mapped`] — the result graph: [`Mapped`], [`Instance`], [`FromMapped`]
//! - [`options`] — per-call configuration and the log sink
//! - [`version`] — engine version constants and the major-version gate
//! - [`error`] — the fatal error taxonomy

pub mod error;
pub mod mapped;
mod mapper;
pub mod options;
pub mod registry;
pub mod transcode;
pub mod version;

use std::path::Path;

use serde_json::Value;

pub use error::{Result, XjsonError};
pub use mapped::{FromMapped, Instance, Mapped};
pub use options::{LogSink, Options, Severity};
pub use registry::{resolve, AliasRegistry, Member, TypeDescriptor, TypeHint};
pub use transcode::transcode;
pub use version::{ENGINE_MAJOR, ENGINE_MINOR, VERSION_TAG};

/// Deserialize canonical JSON text into a mapped value.
///
/// Parses the text, gates the declared version, then maps the tree against
/// `target`. Pass [`TypeHint::Unspecified`] to map without a target type.
pub fn deserialize(text: &str, target: &TypeHint, options: &Options) -> Result<Mapped> {
    let node: Value = serde_json::from_str(text)?;
    mapper::map_root(&node, target, options)
}

/// Transcode XJSON source text, then deserialize the resulting JSON.
pub fn deserialize_xjson(source: &str, target: &TypeHint, options: &Options) -> Result<Mapped> {
    let json = transcode::transcode(source, target, options);
    deserialize(&json, target, options)
}

/// Map an already-parsed JSON value tree against a target type.
///
/// The version gate runs here too: a `"__version"` member on an object root
/// is checked before any instantiation.
pub fn map_node(node: &Value, target: &TypeHint, options: &Options) -> Result<Mapped> {
    mapper::map_root(node, target, options)
}

/// Read and deserialize a file. An `.xjson` extension (ASCII
/// case-insensitive) selects the transcoder; anything else parses directly.
pub fn read_file(path: impl AsRef<Path>, target: &TypeHint, options: &Options) -> Result<Mapped> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    if is_xjson_path(path) {
        deserialize_xjson(&text, target, options)
    } else {
        deserialize(&text, target, options)
    }
}

fn is_xjson_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xjson"))
}
