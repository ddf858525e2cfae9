//! Type descriptors, the alias registry, and name resolution.
//!
//! Target types carry no serialization metadata; instead, callers register
//! explicit descriptor tables describing how to default-construct a type and
//! assign its members. The alias registry maps the short names that input
//! text may use (type tags, inline annotations) onto those descriptors, and
//! [`resolve`] is the single gate deciding what untrusted input is allowed
//! to instantiate:
//!
//! - alias lookup first: the caller controls every entry;
//! - fully-qualified lookup only when explicitly enabled, since it lets
//!   input text name types directly.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, XjsonError};
use crate::mapped::{FromMapped, Mapped};
use crate::options::Options;

/// Target-type hint consumed by the mapping engine and stored in the alias
/// registry. Primitive aliases resolve to primitive hints; object aliases
/// resolve to descriptors.
#[derive(Debug, Clone)]
pub enum TypeHint {
    /// No hint: numbers map to `f64`, objects to dictionaries, arrays to
    /// heterogeneous sequences.
    Unspecified,
    Bool,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Str,
    /// Ordered sequence with an element hint.
    Seq(Box<TypeHint>),
    /// Explicit string-keyed ordered mapping target.
    Dict,
    /// A registered named type, concrete or interface/abstract.
    Object(Arc<TypeDescriptor>),
}

impl TypeHint {
    pub fn seq(element: TypeHint) -> TypeHint {
        TypeHint::Seq(Box::new(element))
    }

    pub fn object(descriptor: TypeDescriptor) -> TypeHint {
        TypeHint::Object(Arc::new(descriptor))
    }

    /// The descriptor behind this hint, if it names a concrete type.
    pub(crate) fn as_concrete(&self) -> Option<&Arc<TypeDescriptor>> {
        match self {
            TypeHint::Object(descriptor) if descriptor.is_concrete() => Some(descriptor),
            _ => None,
        }
    }
}

type ConstructFn = Box<dyn Fn() -> Box<dyn Any> + Send + Sync>;
type SetFn = Box<dyn Fn(&mut dyn Any, Mapped) -> std::result::Result<(), String> + Send + Sync>;

enum TypeKind {
    Concrete(ConstructFn),
    Abstract,
}

/// Handle to a target type: its names, concreteness, constructor, and
/// settable public members.
///
/// Descriptors stand in for runtime introspection: the table is written once
/// where the type is registered and drives every instantiation of that type.
///
/// ```
/// use xjson_core::{Member, TypeDescriptor, TypeHint};
///
/// #[derive(Default)]
/// struct Hero {
///     name: String,
///     age: f64,
/// }
///
/// let descriptor = TypeDescriptor::concrete("Hero", Hero::default, vec![
///     Member::new("Name", TypeHint::Str, |h: &mut Hero, v: String| h.name = v),
///     Member::new("Age", TypeHint::F64, |h: &mut Hero, v: f64| h.age = v),
/// ]);
/// assert!(descriptor.is_concrete());
/// assert_eq!(descriptor.name(), "Hero");
/// ```
pub struct TypeDescriptor {
    name: String,
    qualified: String,
    kind: TypeKind,
    members: Vec<Member>,
}

impl TypeDescriptor {
    /// Describe a concrete, default-constructible type.
    ///
    /// The qualified name is the Rust type path, recorded for the
    /// fully-qualified lookup table and for the transcoder's synthetic type
    /// tag.
    pub fn concrete<T, C>(name: &str, construct: C, members: Vec<Member>) -> TypeDescriptor
    where
        T: Any,
        C: Fn() -> T + Send + Sync + 'static,
    {
        TypeDescriptor {
            name: name.to_string(),
            qualified: std::any::type_name::<T>().to_string(),
            kind: TypeKind::Concrete(Box::new(move || Box::new(construct()))),
            members,
        }
    }

    /// Describe an interface or abstract base type. Such a descriptor can
    /// appear as a member's declared type but can never be constructed; a
    /// type tag must select a concrete type for the slot.
    pub fn interface(name: &str) -> TypeDescriptor {
        TypeDescriptor {
            name: name.to_string(),
            qualified: name.to_string(),
            kind: TypeKind::Abstract,
            members: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified(&self) -> &str {
        &self.qualified
    }

    pub fn is_concrete(&self) -> bool {
        matches!(self.kind, TypeKind::Concrete(_))
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// First member whose name matches exactly.
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|member| member.name == name)
    }

    /// Default-construct the type. Interfaces and abstract types must be
    /// resolved to a concrete type before this point; reaching it with one
    /// is a contract violation surfaced as a construction error.
    pub(crate) fn construct(&self) -> Result<Box<dyn Any>> {
        match &self.kind {
            TypeKind::Concrete(construct) => Ok(construct()),
            TypeKind::Abstract => Err(XjsonError::Construction {
                type_name: self.name.clone(),
                reason: "interface/abstract types cannot be default-constructed".to_string(),
            }),
        }
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("qualified", &self.qualified)
            .field("concrete", &self.is_concrete())
            .field(
                "members",
                &self.members.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// One settable public member of a described type: its name, declared type
/// hint, and a setter writing a converted value into the field.
pub struct Member {
    name: String,
    hint: TypeHint,
    set: SetFn,
}

impl Member {
    /// Build a member entry from a plain field-assignment closure. The
    /// generated setter downcasts the receiver and converts the mapped value
    /// through [`FromMapped`] before applying it.
    pub fn new<T, V, F>(name: &str, hint: TypeHint, apply: F) -> Member
    where
        T: Any,
        V: FromMapped,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let set: SetFn = Box::new(move |target, value| {
            let target = target
                .downcast_mut::<T>()
                .ok_or_else(|| "receiver type mismatch".to_string())?;
            let value = V::from_mapped(value)?;
            apply(target, value);
            Ok(())
        });
        Member {
            name: name.to_string(),
            hint,
            set,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type of the member, used as the mapping hint when no inline
    /// annotation overrides it.
    pub fn hint(&self) -> &TypeHint {
        &self.hint
    }

    pub(crate) fn assign(
        &self,
        target: &mut dyn Any,
        value: Mapped,
    ) -> std::result::Result<(), String> {
        (self.set)(target, value)
    }
}

/// Mapping from short alias names to type hints, plus the qualified-name
/// table backing fully-qualified lookup.
///
/// Keys are unique and the last registration wins, so construction modes
/// compose by layering: scan a descriptor collection for defaults, then
/// register explicit aliases on top.
#[derive(Debug, Clone, Default)]
pub struct AliasRegistry {
    aliases: HashMap<String, TypeHint>,
    qualified: HashMap<String, TypeHint>,
}

impl AliasRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        AliasRegistry::default()
    }

    /// Registry built from explicit `(name, hint)` pairs.
    pub fn from_pairs<N, I>(pairs: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, TypeHint)>,
    {
        let mut registry = AliasRegistry::new();
        for (name, hint) in pairs {
            registry.register(name, hint);
        }
        registry
    }

    /// Registry built by scanning a descriptor collection, admitting only
    /// concrete types, each keyed by its simple name.
    pub fn scan<I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = TypeDescriptor>,
    {
        let mut registry = AliasRegistry::new();
        for descriptor in descriptors {
            if !descriptor.is_concrete() {
                continue;
            }
            let name = descriptor.name().to_string();
            registry.register(name, TypeHint::object(descriptor));
        }
        registry
    }

    /// The fixed built-in set mapping primitive and primitive-array names to
    /// their hints.
    pub fn builtin() -> Self {
        AliasRegistry::from_pairs([
            ("int", TypeHint::I32),
            ("float", TypeHint::F32),
            ("long", TypeHint::I64),
            ("ulong", TypeHint::U64),
            ("int[]", TypeHint::seq(TypeHint::I32)),
            ("float[]", TypeHint::seq(TypeHint::F32)),
            ("string[]", TypeHint::seq(TypeHint::Str)),
            ("double[]", TypeHint::seq(TypeHint::F64)),
            ("object[]", TypeHint::seq(TypeHint::Unspecified)),
            ("bool[]", TypeHint::seq(TypeHint::Bool)),
            ("boolean[]", TypeHint::seq(TypeHint::Bool)),
            ("uint[]", TypeHint::seq(TypeHint::U32)),
            ("long[]", TypeHint::seq(TypeHint::I64)),
            ("ulong[]", TypeHint::seq(TypeHint::U64)),
        ])
    }

    /// Register an alias, overriding any existing entry under the same name.
    /// Object hints also land in the qualified-name table.
    pub fn register(&mut self, name: impl Into<String>, hint: TypeHint) {
        if let TypeHint::Object(descriptor) = &hint {
            self.qualified
                .insert(descriptor.qualified().to_string(), hint.clone());
        }
        self.aliases.insert(name.into(), hint);
    }

    /// Fold another registry into this one; entries from `other` win on
    /// conflicting keys.
    pub fn merge(&mut self, other: AliasRegistry) {
        self.aliases.extend(other.aliases);
        self.qualified.extend(other.qualified);
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&TypeHint> {
        self.aliases.get(name)
    }

    pub(crate) fn get_qualified(&self, name: &str) -> Option<&TypeHint> {
        self.qualified.get(name)
    }
}

/// Resolve a type name from input text to a hint.
///
/// Lookup order is load-bearing: the caller-controlled alias registry is
/// consulted first; the qualified-name table only when
/// `allow_fully_qualified_types` is set. Everything else fails.
pub fn resolve(name: &str, options: &Options) -> Result<TypeHint> {
    if !options.aliases.is_empty() {
        if let Some(hint) = options.aliases.get(name) {
            return Ok(hint.clone());
        }
    }
    if options.allow_fully_qualified_types {
        if let Some(hint) = options.aliases.get_qualified(name) {
            return Ok(hint.clone());
        }
    }
    options.error(&format!("cannot resolve type name '{name}'"));
    Err(XjsonError::TypeResolution {
        name: name.to_string(),
    })
}
