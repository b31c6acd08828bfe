use serde::{Deserialize, Serialize};

use std::fmt;

/// A type as the oracle reports it, before classification.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceType {
    Number,
    String,
    Boolean,
    #[default]
    Void,
    /// Reference to another module-scope symbol by name.
    Reference { name: String },
    /// Anything the oracle resolved but has no rendering rule (unions, generics, ...).
    Opaque { text: String },
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceType::Number => f.write_str("number"),
            SourceType::String => f.write_str("string"),
            SourceType::Boolean => f.write_str("boolean"),
            SourceType::Void => f.write_str("void"),
            SourceType::Reference { name } => f.write_str(name),
            SourceType::Opaque { text } => f.write_str(text),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Class,
    Interface,
    Function,
    /// Block- or function-scoped variable.
    Variable,
}

impl SymbolKind {
    pub const fn is_class_like(&self) -> bool {
        matches!(self, SymbolKind::Class | SymbolKind::Interface)
    }
}

/// A single parameter of a call signature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamSymbol {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: SourceType,
}

/// One overload of a function, method or constructor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CallSignature {
    #[serde(default)]
    pub params: Vec<ParamSymbol>,
    #[serde(rename = "returns", default)]
    pub ret: SourceType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Constructor,
    Field,
    Method,
    /// Index signatures, accessors and whatever else the oracle knows about.
    #[serde(other)]
    Other,
}

/// Entry in a class or interface member table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    /// Field type. Unused for other kinds.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<SourceType>,
    /// Overloads of a constructor or method.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<CallSignature>,
}

/// A module-scope symbol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Declared type of a variable.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<SourceType>,
    /// Call signatures of a function.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<CallSignature>,
    /// Inheritance parent of a class or interface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<SourceType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Member>,
}

impl Symbol {
    fn with_kind(name: &str, kind: SymbolKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            namespace: None,
            ty: None,
            signatures: Vec::new(),
            parent: None,
            members: Vec::new(),
        }
    }

    pub fn class(name: &str) -> Self {
        Self::with_kind(name, SymbolKind::Class)
    }

    pub fn interface(name: &str) -> Self {
        Self::with_kind(name, SymbolKind::Interface)
    }

    pub fn variable(name: &str, ty: SourceType) -> Self {
        Self {
            ty: Some(ty),
            ..Self::with_kind(name, SymbolKind::Variable)
        }
    }

    pub fn function(name: &str, signatures: Vec<CallSignature>) -> Self {
        Self {
            signatures,
            ..Self::with_kind(name, SymbolKind::Function)
        }
    }

    pub fn in_namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }

    pub fn extends(mut self, parent: &str) -> Self {
        self.parent = Some(SourceType::reference(parent));
        self
    }

    pub fn member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }
}

impl SourceType {
    pub fn reference(name: &str) -> Self {
        SourceType::Reference {
            name: name.to_string(),
        }
    }

    pub fn opaque(text: &str) -> Self {
        SourceType::Opaque {
            text: text.to_string(),
        }
    }
}

impl CallSignature {
    pub fn new(params: &[(&str, SourceType)], ret: SourceType) -> Self {
        Self {
            params: params
                .iter()
                .map(|(name, ty)| ParamSymbol {
                    name: name.to_string(),
                    ty: ty.clone(),
                })
                .collect(),
            ret,
        }
    }
}

impl Member {
    pub fn field(name: &str, ty: SourceType) -> Self {
        Self {
            name: name.to_string(),
            kind: MemberKind::Field,
            ty: Some(ty),
            signatures: Vec::new(),
        }
    }

    pub fn method(name: &str, signatures: Vec<CallSignature>) -> Self {
        Self {
            name: name.to_string(),
            kind: MemberKind::Method,
            ty: None,
            signatures,
        }
    }

    pub fn constructor(signatures: Vec<CallSignature>) -> Self {
        Self {
            name: "constructor".to_string(),
            kind: MemberKind::Constructor,
            ty: None,
            signatures,
        }
    }
}
