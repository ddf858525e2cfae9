//! The mapping engine: recursive descent over a parsed JSON value tree,
//! producing typed instances and dictionary fallbacks.
//!
//! Dispatch is a single exhaustive match per node kind:
//!
//! - **Null / Bool / String** pass through; optionality is enforced at
//!   member assignment.
//! - **Number** maps at the narrowest width the hint requests, `f64` when
//!   nothing narrower is asked for.
//! - **Array** maps each child with the element hint, or generically.
//! - **Object** is where the type system engages: an explicit type tag wins
//!   over any static hint, a concrete hint is used directly, and everything
//!   else falls back to an ordered dictionary.
//!
//! Member binding honors inline `property:TypeName` annotations, looks
//! members up by exact name (first match wins), tolerates unknown members
//! with a logged warning, and aborts the whole call on resolution or
//! construction failures. No partial graph ever escapes.

use std::any::Any;
use std::sync::Arc;

use serde_json::{Map, Number, Value};

use crate::error::{Result, XjsonError};
use crate::mapped::{Instance, Mapped};
use crate::options::Options;
use crate::registry::{self, TypeDescriptor, TypeHint};
use crate::version;

/// Public mapping entry: version gate once, then recursive descent.
pub(crate) fn map_root(node: &Value, hint: &TypeHint, options: &Options) -> Result<Mapped> {
    version::check(node, options)?;
    map_value(node, hint, options)
}

fn map_value(node: &Value, hint: &TypeHint, options: &Options) -> Result<Mapped> {
    match node {
        Value::Null => Ok(Mapped::Null),
        Value::Bool(b) => Ok(Mapped::Bool(*b)),
        Value::String(s) => Ok(Mapped::Str(s.clone())),
        Value::Number(number) => Ok(map_number(number, hint)),
        Value::Array(items) => map_array(items, hint, options),
        Value::Object(members) => map_object(members, hint, options),
    }
}

/// Numeric widening: the narrowest representation the hint requests.
/// Integer widths read the integer lexeme when there is one and otherwise
/// saturate through `f64`; every other hint yields `f64`.
fn map_number(number: &Number, hint: &TypeHint) -> Mapped {
    match hint {
        TypeHint::I32 => Mapped::I32(number_i64(number) as i32),
        TypeHint::U32 => Mapped::U32(number_u64(number) as u32),
        TypeHint::I64 => Mapped::I64(number_i64(number)),
        TypeHint::U64 => Mapped::U64(number_u64(number)),
        TypeHint::F32 => Mapped::F32(number_f64(number) as f32),
        _ => Mapped::F64(number_f64(number)),
    }
}

fn number_f64(number: &Number) -> f64 {
    number.as_f64().unwrap_or(0.0)
}

fn number_i64(number: &Number) -> i64 {
    number.as_i64().unwrap_or_else(|| number_f64(number) as i64)
}

fn number_u64(number: &Number) -> u64 {
    number.as_u64().unwrap_or_else(|| number_f64(number) as u64)
}

fn map_array(items: &[Value], hint: &TypeHint, options: &Options) -> Result<Mapped> {
    let element: &TypeHint = match hint {
        TypeHint::Seq(element) => element,
        _ => &TypeHint::Unspecified,
    };
    let mut mapped = Vec::with_capacity(items.len());
    for item in items {
        mapped.push(map_value(item, element, options)?);
    }
    Ok(Mapped::Seq(mapped))
}

fn map_object(members: &Map<String, Value>, hint: &TypeHint, options: &Options) -> Result<Mapped> {
    // An explicit type tag overrides any static hint; this is how a
    // concretely-typed object satisfies an interface-typed slot.
    if let Some(tag) = members.get(options.type_tag.as_str()) {
        match tag {
            Value::String(name) => {
                let resolved = registry::resolve(name, options)?;
                if let TypeHint::Object(descriptor) = &resolved {
                    return instantiate(members, descriptor, options);
                }
                options.warn(&format!("type tag '{name}' does not name an object type"));
                return map_dictionary(members, options);
            }
            _ => options.warn(&format!(
                "ignoring non-string '{}' member",
                options.type_tag
            )),
        }
    }

    match hint {
        TypeHint::Object(descriptor) if descriptor.is_concrete() => {
            instantiate(members, descriptor, options)
        }
        _ => map_dictionary(members, options),
    }
}

/// Default-construct the descriptor's type and bind every member except the
/// type tag itself.
fn instantiate(
    members: &Map<String, Value>,
    descriptor: &Arc<TypeDescriptor>,
    options: &Options,
) -> Result<Mapped> {
    let mut value = descriptor.construct()?;
    for (key, node) in members {
        if key == &options.type_tag {
            continue;
        }
        bind_member(value.as_mut(), descriptor, key, node, options)?;
    }
    Ok(Mapped::Instance(Instance::new(
        Arc::clone(descriptor),
        value,
    )))
}

/// Bind one object member onto the instance under construction.
///
/// A key containing the type separator splits at the first occurrence into
/// `(property, type name)`, both trimmed; the annotation's resolved type
/// replaces the member's declared hint. Unknown properties log a warning and
/// drop the value; an unresolvable annotation aborts the call.
fn bind_member(
    target: &mut dyn Any,
    descriptor: &TypeDescriptor,
    key: &str,
    node: &Value,
    options: &Options,
) -> Result<()> {
    let (property, hint) = match split_annotation(key, options.type_separator) {
        Some((property, type_name)) => (property, registry::resolve(type_name, options)?),
        None => match descriptor.member(key) {
            Some(member) => (key, member.hint().clone()),
            None => {
                drop_unknown_member(descriptor, key, options);
                return Ok(());
            }
        },
    };

    let Some(member) = descriptor.member(property) else {
        drop_unknown_member(descriptor, property, options);
        return Ok(());
    };

    require_tag_for_abstract(&hint, node, options)?;

    let value = map_value(node, &hint, options)?;
    member
        .assign(target, value)
        .map_err(|reason| XjsonError::Construction {
            type_name: descriptor.name().to_string(),
            reason: format!("member '{property}': {reason}"),
        })
}

fn drop_unknown_member(descriptor: &TypeDescriptor, property: &str, options: &Options) {
    options.warn(&format!(
        "no member '{}' on '{}'; value dropped",
        property,
        descriptor.name()
    ));
}

/// An object node headed into an interface-typed slot must carry a type tag:
/// the dictionary fallback cannot satisfy a slot that requires a concrete
/// instance.
fn require_tag_for_abstract(hint: &TypeHint, node: &Value, options: &Options) -> Result<()> {
    if let TypeHint::Object(descriptor) = hint {
        if !descriptor.is_concrete() {
            let tagged = matches!(
                node,
                Value::Object(members)
                    if matches!(members.get(options.type_tag.as_str()), Some(Value::String(_)))
            );
            if !tagged {
                options.error(&format!(
                    "type tag required to instantiate interface type '{}'",
                    descriptor.name()
                ));
                return Err(XjsonError::TypeResolution {
                    name: descriptor.name().to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Dictionary fallback: map each member generically, honoring inline type
/// annotations, and store pairs in source order.
fn map_dictionary(members: &Map<String, Value>, options: &Options) -> Result<Mapped> {
    let mut pairs = Vec::with_capacity(members.len());
    for (key, node) in members {
        if key == &options.type_tag {
            continue;
        }
        match split_annotation(key, options.type_separator) {
            Some((property, type_name)) => {
                let hint = registry::resolve(type_name, options)?;
                let value = map_value(node, &hint, options)?;
                pairs.push((property.to_string(), value));
            }
            None => {
                let value = map_value(node, &TypeHint::Unspecified, options)?;
                pairs.push((key.clone(), value));
            }
        }
    }
    Ok(Mapped::Dict(pairs))
}

/// Split `property:TypeName` at the first separator; both halves trimmed.
fn split_annotation(key: &str, separator: char) -> Option<(&str, &str)> {
    let (property, type_name) = key.split_once(separator)?;
    Some((property.trim(), type_name.trim()))
}
