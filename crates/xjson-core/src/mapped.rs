//! The mapped result graph: a closed value enum plus dynamically typed
//! instances of registered target types.
//!
//! Mirrors the JSON node kinds but keeps the numeric widths requested by
//! type hints separate, and uses `Vec<(String, Mapped)>` for dictionaries to
//! maintain insertion order without depending on `IndexMap`. Every nested
//! value is exclusively owned by its parent: the result is always a tree,
//! never a graph with shared or cyclic references.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::registry::TypeDescriptor;

/// A value produced by the mapping engine.
#[derive(Debug)]
pub enum Mapped {
    Null,
    Bool(bool),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(String),
    /// Ordered sequence; homogeneous when an element hint drove the mapping,
    /// heterogeneous otherwise.
    Seq(Vec<Mapped>),
    /// String-keyed pairs in insertion order (the dictionary fallback).
    Dict(Vec<(String, Mapped)>),
    /// An instantiated registered type.
    Instance(Instance),
}

impl Mapped {
    /// Short name of the value kind, used in conversion diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Mapped::Null => "null",
            Mapped::Bool(_) => "bool",
            Mapped::I32(_) => "i32",
            Mapped::U32(_) => "u32",
            Mapped::I64(_) => "i64",
            Mapped::U64(_) => "u64",
            Mapped::F32(_) => "f32",
            Mapped::F64(_) => "f64",
            Mapped::Str(_) => "string",
            Mapped::Seq(_) => "sequence",
            Mapped::Dict(_) => "dictionary",
            Mapped::Instance(_) => "instance",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Mapped::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Mapped::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric value as `f64`, whatever width it was mapped at.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Mapped::I32(v) => Some(*v as f64),
            Mapped::U32(v) => Some(*v as f64),
            Mapped::I64(v) => Some(*v as f64),
            Mapped::U64(v) => Some(*v as f64),
            Mapped::F32(v) => Some(*v as f64),
            Mapped::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Mapped::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Mapped]> {
        match self {
            Mapped::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&[(String, Mapped)]> {
        match self {
            Mapped::Dict(pairs) => Some(pairs),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Mapped::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn into_instance(self) -> Option<Instance> {
        match self {
            Mapped::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// First dictionary entry stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Mapped> {
        match self {
            Mapped::Dict(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Render the result back into a `serde_json::Value` for display.
    ///
    /// Descriptors expose setters only, so an instance's members cannot be
    /// read back; instances render as a tagged stub object.
    pub fn to_json(&self) -> Value {
        match self {
            Mapped::Null => Value::Null,
            Mapped::Bool(b) => Value::from(*b),
            Mapped::I32(v) => Value::from(*v),
            Mapped::U32(v) => Value::from(*v),
            Mapped::I64(v) => Value::from(*v),
            Mapped::U64(v) => Value::from(*v),
            Mapped::F32(v) => Value::from(*v as f64),
            Mapped::F64(v) => Value::from(*v),
            Mapped::Str(s) => Value::String(s.clone()),
            Mapped::Seq(items) => Value::Array(items.iter().map(Mapped::to_json).collect()),
            Mapped::Dict(pairs) => {
                let mut map = serde_json::Map::new();
                for (key, value) in pairs {
                    map.insert(key.clone(), value.to_json());
                }
                Value::Object(map)
            }
            Mapped::Instance(instance) => {
                let mut map = serde_json::Map::new();
                map.insert(
                    "__type".to_string(),
                    Value::String(instance.type_name().to_string()),
                );
                Value::Object(map)
            }
        }
    }
}

/// Structural equality for everything except instances, which carry opaque
/// state and never compare equal.
impl PartialEq for Mapped {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Mapped::Null, Mapped::Null) => true,
            (Mapped::Bool(a), Mapped::Bool(b)) => a == b,
            (Mapped::I32(a), Mapped::I32(b)) => a == b,
            (Mapped::U32(a), Mapped::U32(b)) => a == b,
            (Mapped::I64(a), Mapped::I64(b)) => a == b,
            (Mapped::U64(a), Mapped::U64(b)) => a == b,
            (Mapped::F32(a), Mapped::F32(b)) => a == b,
            (Mapped::F64(a), Mapped::F64(b)) => a == b,
            (Mapped::Str(a), Mapped::Str(b)) => a == b,
            (Mapped::Seq(a), Mapped::Seq(b)) => a == b,
            (Mapped::Dict(a), Mapped::Dict(b)) => a == b,
            _ => false,
        }
    }
}

/// A default-constructed registered type with its members assigned.
///
/// Pairs the descriptor that produced the value with the value itself, so
/// callers can inspect the dynamic type name and downcast to the concrete
/// Rust type.
pub struct Instance {
    descriptor: Arc<TypeDescriptor>,
    value: Box<dyn Any>,
}

impl Instance {
    pub(crate) fn new(descriptor: Arc<TypeDescriptor>, value: Box<dyn Any>) -> Self {
        Instance { descriptor, value }
    }

    /// Simple name of the instantiated type.
    pub fn type_name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Take ownership of the concrete value, or get the instance back on a
    /// type mismatch.
    pub fn downcast<T: Any>(self) -> std::result::Result<Box<T>, Instance> {
        let Instance { descriptor, value } = self;
        value
            .downcast::<T>()
            .map_err(|value| Instance { descriptor, value })
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.descriptor.name())
            .finish_non_exhaustive()
    }
}

/// Conversion from a mapped value into a member's field type.
///
/// Registration tables use this through [`Member::new`]: the generated
/// setter converts the mapped value before writing it into the field. A
/// failed conversion aborts the call as a construction error.
///
/// [`Member::new`]: crate::registry::Member::new
pub trait FromMapped: Sized {
    fn from_mapped(value: Mapped) -> std::result::Result<Self, String>;
}

impl FromMapped for Mapped {
    fn from_mapped(value: Mapped) -> std::result::Result<Self, String> {
        Ok(value)
    }
}

impl FromMapped for bool {
    fn from_mapped(value: Mapped) -> std::result::Result<Self, String> {
        match value {
            Mapped::Bool(b) => Ok(b),
            other => Err(format!("expected bool, found {}", other.kind_name())),
        }
    }
}

impl FromMapped for String {
    fn from_mapped(value: Mapped) -> std::result::Result<Self, String> {
        match value {
            Mapped::Str(s) => Ok(s),
            other => Err(format!("expected string, found {}", other.kind_name())),
        }
    }
}

macro_rules! from_mapped_numeric {
    ($($ty:ty),*) => {$(
        impl FromMapped for $ty {
            fn from_mapped(value: Mapped) -> std::result::Result<Self, String> {
                match value {
                    Mapped::I32(v) => Ok(v as $ty),
                    Mapped::U32(v) => Ok(v as $ty),
                    Mapped::I64(v) => Ok(v as $ty),
                    Mapped::U64(v) => Ok(v as $ty),
                    Mapped::F32(v) => Ok(v as $ty),
                    Mapped::F64(v) => Ok(v as $ty),
                    other => Err(format!("expected a number, found {}", other.kind_name())),
                }
            }
        }
    )*};
}

from_mapped_numeric!(i32, u32, i64, u64, f32, f64);

impl FromMapped for Instance {
    fn from_mapped(value: Mapped) -> std::result::Result<Self, String> {
        match value {
            Mapped::Instance(instance) => Ok(instance),
            other => Err(format!("expected an instance, found {}", other.kind_name())),
        }
    }
}

impl<T: FromMapped> FromMapped for Option<T> {
    fn from_mapped(value: Mapped) -> std::result::Result<Self, String> {
        match value {
            Mapped::Null => Ok(None),
            other => T::from_mapped(other).map(Some),
        }
    }
}

impl<T: FromMapped> FromMapped for Vec<T> {
    fn from_mapped(value: Mapped) -> std::result::Result<Self, String> {
        match value {
            Mapped::Seq(items) => items.into_iter().map(T::from_mapped).collect(),
            other => Err(format!("expected a sequence, found {}", other.kind_name())),
        }
    }
}
