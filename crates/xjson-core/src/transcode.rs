//! XJSON → canonical JSON text rewriting.
//!
//! XJSON is a line-oriented JSON superset: full-line `//` comments and blank
//! lines are permitted, and the enclosing braces of the top-level object are
//! implicit. Transcoding is lossless for everything else: surviving lines
//! are carried into the output verbatim, so malformed member text is caught
//! by the JSON parser rather than here.
//!
//! When the caller asks for a concrete (non-dictionary) target type and the
//! source declares no type tag of its own, a synthetic tag member naming the
//! target's qualified type is inserted as the first body line.

use crate::options::Options;
use crate::registry::TypeHint;

/// Rewrite XJSON source text into a single canonical JSON text.
///
/// - Lines that are blank after trimming, or whose trimmed form starts with
///   `//`, are dropped.
/// - The result is wrapped in `{` ... `}`.
/// - A synthetic `"<type_tag>": "<qualified name>"` member is injected for a
///   concrete target when no top-level tag is present, with a trailing comma
///   only if at least one other statement line survives.
///
/// ```
/// use xjson_core::{transcode, Options, TypeHint};
///
/// let source = "// comment\n\"a\": 1,\n\"b\": 2";
/// let json = transcode(source, &TypeHint::Unspecified, &Options::default());
/// assert_eq!(json, "{\n\"a\": 1,\n\"b\": 2\n}");
/// ```
pub fn transcode(source: &str, target: &TypeHint, options: &Options) -> String {
    let mut body: Vec<&str> = Vec::new();
    let mut has_tag = false;
    let mut statements = 0usize;

    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }
        if is_type_tag_line(trimmed, &options.type_tag) {
            has_tag = true;
        } else {
            statements += 1;
        }
        body.push(line);
    }

    let mut lines: Vec<String> = Vec::with_capacity(body.len() + 1);
    if !has_tag {
        if let Some(descriptor) = target.as_concrete() {
            let comma = if statements > 0 { "," } else { "" };
            lines.push(format!(
                "\"{}\": \"{}\"{}",
                options.type_tag,
                descriptor.qualified(),
                comma
            ));
            options.info(&format!(
                "injected type tag for '{}'",
                descriptor.qualified()
            ));
        }
    }
    lines.extend(body.iter().map(|line| line.to_string()));

    format!("{{\n{}\n}}", lines.join("\n"))
}

/// Does this surviving line declare the top-level type tag?
///
/// Structural check: a quoted key exactly equal to the tag, followed by
/// optional whitespace and a colon.
fn is_type_tag_line(trimmed: &str, tag: &str) -> bool {
    let Some(rest) = trimmed.strip_prefix('"') else {
        return false;
    };
    let Some(rest) = rest.strip_prefix(tag) else {
        return false;
    };
    let Some(rest) = rest.strip_prefix('"') else {
        return false;
    };
    rest.trim_start().starts_with(':')
}
