//! Major-version gate, checked once before any mapping.

use serde_json::Value;

use crate::error::{Result, XjsonError};
use crate::options::Options;

/// Major version of the mapping engine, compared against input declarations.
pub const ENGINE_MAJOR: u32 = 1;

/// Minor version of the mapping engine. Never part of the gate.
pub const ENGINE_MINOR: u32 = 0;

/// Reserved root member carrying the producer's engine version as
/// `"<major>.<minor>"`. Not configurable.
pub const VERSION_TAG: &str = "__version";

/// Gate the root node's declared version against [`ENGINE_MAJOR`].
///
/// Only a major component that parses as an integer and exceeds the engine's
/// own major version is fatal. Anything else (missing tag, non-object root,
/// unparseable string) is accepted, with a warning where the declaration
/// was present but unreadable.
pub fn check(root: &Value, options: &Options) -> Result<()> {
    let Value::Object(members) = root else {
        return Ok(());
    };
    let Some(declared) = members.get(VERSION_TAG) else {
        return Ok(());
    };
    let Value::String(text) = declared else {
        options.warn(&format!("ignoring non-string '{VERSION_TAG}' member"));
        return Ok(());
    };

    let major_text = text.split('.').next().unwrap_or("");
    match major_text.parse::<u32>() {
        Ok(found) if found > ENGINE_MAJOR => {
            options.error(&format!(
                "input version {found} is newer than engine major version {ENGINE_MAJOR}"
            ));
            Err(XjsonError::Version { found })
        }
        Ok(_) => Ok(()),
        Err(_) => {
            options.warn(&format!(
                "unparseable '{VERSION_TAG}' value '{text}', proceeding"
            ));
            Ok(())
        }
    }
}
