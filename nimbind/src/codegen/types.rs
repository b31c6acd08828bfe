use super::sanitize::Ident;

use std::fmt;

/// Semantic primitive kinds the oracle can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Any number-like type (`float` in Nim).
    Number,
    /// Any string-like type (`cstring` in Nim).
    String,
    /// `bool` in Nim.
    Boolean,
    /// `void` in Nim. Never written as a return type.
    Void,
}

impl PrimitiveKind {
    pub const fn nim_name(&self) -> &'static str {
        match self {
            PrimitiveKind::Number => "float",
            PrimitiveKind::String => "cstring",
            PrimitiveKind::Boolean => "bool",
            PrimitiveKind::Void => "void",
        }
    }
}

/// Identity of a declaration in the dependency graph.
///
/// Keys use foreign names, which are unique per entity, not sanitized ones.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeclKey {
    Type(String),
    Variable(String),
    /// Free function overloads are distinct declarations.
    Function { name: String, overload: usize },
}

impl DeclKey {
    pub fn name(&self) -> &str {
        match self {
            DeclKey::Type(name) | DeclKey::Variable(name) => name,
            DeclKey::Function { name, .. } => name,
        }
    }
}

impl fmt::Display for DeclKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved type in a field, parameter, return or variable position.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(PrimitiveKind),
    /// A class or interface, referenced by name and built separately.
    Structured(Ident),
}

impl TypeRef {
    pub fn nim_name(&self) -> &str {
        match self {
            TypeRef::Primitive(kind) => kind.nim_name(),
            TypeRef::Structured(ident) => &ident.name,
        }
    }

    /// The declaration this reference needs in scope, if any.
    pub fn key(&self) -> Option<DeclKey> {
        match self {
            TypeRef::Primitive(_) => None,
            TypeRef::Structured(ident) => Some(DeclKey::Type(ident.original.clone())),
        }
    }

    pub const fn is_void(&self) -> bool {
        matches!(self, TypeRef::Primitive(PrimitiveKind::Void))
    }
}
