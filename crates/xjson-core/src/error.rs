//! Error types for XJSON transcoding and value mapping.

use thiserror::Error;

use crate::version::ENGINE_MAJOR;

/// Errors that can occur while deserializing JSON or XJSON input.
///
/// Every variant is fatal: the whole call aborts and no partial object graph
/// is returned. Tolerable conditions (unknown member names, unparseable
/// version strings) are reported through the [`Options::log`] sink instead
/// and never surface here.
///
/// [`Options::log`]: crate::Options
#[derive(Error, Debug)]
pub enum XjsonError {
    /// The input text was not valid JSON (after XJSON transcoding, if any).
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The input declared a major version newer than this engine.
    /// Checked before any mapping or instantiation takes place.
    #[error("input version {found} is newer than engine major version {engine}", engine = ENGINE_MAJOR)]
    Version {
        /// Major component declared by the input.
        found: u32,
    },

    /// A type name could not be resolved: the alias registry has no entry
    /// and fully-qualified lookup is disabled or missed as well.
    #[error("cannot resolve type name '{name}'")]
    TypeResolution {
        /// The name as it appeared in the input or annotation.
        name: String,
    },

    /// A target type could not be constructed, or a mapped value could not
    /// be assigned to one of its members.
    #[error("cannot construct '{type_name}': {reason}")]
    Construction {
        /// Simple name of the type being built.
        type_name: String,
        /// What went wrong.
        reason: String,
    },

    /// Reading the input file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout xjson-core.
pub type Result<T> = std::result::Result<T, XjsonError>;
