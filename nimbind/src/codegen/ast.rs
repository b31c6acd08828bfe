use super::sanitize::{Ident, escape_link, escape_pattern};
use super::types::{DeclKey, PrimitiveKind, TypeRef};

use std::collections::BTreeSet;
use std::rc::Rc;

/// Produces Nim source text for a declaration.
pub trait Render {
    fn render(&self) -> String;
}

/// `importc`, spelling out the foreign name only when sanitizing changed it.
fn importc(ident: &Ident) -> String {
    match ident.link() {
        Some(original) => format!("importc: \"{}\"", escape_link(original)),
        None => "importc".to_string(),
    }
}

fn render_params<'a>(params: impl IntoIterator<Item = &'a Parameter>) -> String {
    params
        .into_iter()
        .map(Render::render)
        .collect::<Vec<_>>()
        .join(", ")
}

fn return_suffix(ret: &TypeRef) -> String {
    if ret.is_void() {
        String::new()
    } else {
        format!(": {}", ret.nim_name())
    }
}

/// A parameter of a signature or constructor.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub ident: Ident,
    pub ty: TypeRef,
}

impl Render for Parameter {
    fn render(&self) -> String {
        format!("{}: {}", self.ident.name, self.ty.nim_name())
    }
}

/// A module-scope variable.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub ident: Ident,
    pub ty: TypeRef,
}

impl Variable {
    pub fn key(&self) -> DeclKey {
        DeclKey::Variable(self.ident.original.clone())
    }
}

impl Render for Variable {
    fn render(&self) -> String {
        format!(
            "var {}* {{.{}, nodecl.}}: {}",
            self.ident.name,
            importc(&self.ident),
            self.ty.nim_name()
        )
    }
}

/// A data member of a structured type.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub ident: Ident,
    pub ty: TypeRef,
}

impl Render for Field {
    fn render(&self) -> String {
        match self.ident.link() {
            Some(original) => format!(
                "{}* {{.importc: \"{}\".}}: {}",
                self.ident.name,
                escape_link(original),
                self.ty.nim_name()
            ),
            None => format!("{}*: {}", self.ident.name, self.ty.nim_name()),
        }
    }
}

/// A free function overload, or a method when `owner` is set.
#[derive(Clone, Debug, PartialEq)]
pub struct Signature {
    pub ident: Ident,
    pub params: Vec<Parameter>,
    pub ret: TypeRef,
    pub owner: Option<Ident>,
    /// Position among the overloads of the same foreign function.
    pub overload: usize,
}

impl Signature {
    pub fn key(&self) -> Option<DeclKey> {
        match self.owner {
            Some(_) => None,
            None => Some(DeclKey::Function {
                name: self.ident.original.clone(),
                overload: self.overload,
            }),
        }
    }

    pub fn dependencies(&self) -> BTreeSet<DeclKey> {
        self.params
            .iter()
            .map(|p| &p.ty)
            .chain(std::iter::once(&self.ret))
            .filter_map(TypeRef::key)
            .collect()
    }
}

impl Render for Signature {
    fn render(&self) -> String {
        match &self.owner {
            None => format!(
                "proc {}*({}){} {{.{}.}}",
                self.ident.name,
                render_params(&self.params),
                return_suffix(&self.ret),
                importc(&self.ident)
            ),
            Some(owner) => {
                let receiver = format!("self: {}", owner.name);
                let params = if self.params.is_empty() {
                    receiver
                } else {
                    format!("{receiver}, {}", render_params(&self.params))
                };
                format!(
                    "proc {}*({}){} {{.importcpp: \"#.{}(@)\".}}",
                    self.ident.name,
                    params,
                    return_suffix(&self.ret),
                    escape_pattern(&self.ident.original)
                )
            }
        }
    }
}

/// A construction expression for `owner`.
#[derive(Clone, Debug, PartialEq)]
pub struct Constructor {
    pub owner: Ident,
    pub params: Vec<Parameter>,
}

impl Constructor {
    pub fn name(&self) -> String {
        format!("new{}", self.owner.name)
    }

    /// The same parameter list, constructing `owner` instead.
    pub fn retarget(&self, owner: &Ident) -> Self {
        Self {
            owner: owner.clone(),
            params: self.params.clone(),
        }
    }

    pub fn dependencies(&self) -> BTreeSet<DeclKey> {
        self.params.iter().filter_map(|p| p.ty.key()).collect()
    }
}

impl Render for Constructor {
    fn render(&self) -> String {
        format!(
            "proc {}*({}): {} {{.importcpp: \"new {}(@)\".}}",
            self.name(),
            render_params(&self.params),
            self.owner.name,
            escape_pattern(&self.owner.original)
        )
    }
}

/// A class (concrete) or interface (abstract) with its members.
#[derive(Debug, PartialEq)]
pub struct StructuredType {
    pub ident: Ident,
    pub is_abstract: bool,
    pub parent: Option<Rc<StructuredType>>,
    pub fields: Vec<Field>,
    pub constructors: Vec<Constructor>,
    pub methods: Vec<Signature>,
}

impl StructuredType {
    pub fn key(&self) -> DeclKey {
        DeclKey::Type(self.ident.original.clone())
    }

    /// Whether this type or any of its ancestors declares a field called `original`.
    pub fn declares_field(&self, original: &str) -> bool {
        let mut current = Some(self);
        while let Some(ty) = current {
            if ty.fields.iter().any(|f| f.ident.original == original) {
                return true;
            }
            current = ty.parent.as_deref();
        }
        false
    }

    pub fn dependencies(&self) -> BTreeSet<DeclKey> {
        let mut deps: BTreeSet<DeclKey> = self.parent.iter().map(|p| p.key()).collect();
        deps.extend(self.fields.iter().filter_map(|f| f.ty.key()));
        for ctor in &self.constructors {
            deps.extend(ctor.dependencies());
        }
        for method in &self.methods {
            deps.extend(method.dependencies());
        }
        // referring to itself is fine inside a single type section
        deps.remove(&self.key());
        deps
    }
}

impl Render for StructuredType {
    fn render(&self) -> String {
        let base = self
            .parent
            .as_ref()
            .map_or("RootObj", |parent| parent.ident.name.as_str());

        let mut lines = vec![format!(
            "type {}* {{.{}.}} = ref object of {}",
            self.ident.name,
            importc(&self.ident),
            base
        )];
        lines.extend(self.fields.iter().map(|f| format!("  {}", f.render())));
        lines.extend(self.constructors.iter().map(Render::render));
        lines.extend(self.methods.iter().map(Render::render));
        lines.join("\n")
    }
}

/// Every kind of node the builder can produce.
#[derive(Clone, Debug, PartialEq)]
pub enum Decl {
    Primitive(PrimitiveKind),
    Variable(Variable),
    Parameter(Parameter),
    Field(Field),
    Signature(Signature),
    Constructor(Constructor),
    StructuredType(Rc<StructuredType>),
}

impl Decl {
    pub fn name(&self) -> String {
        match self {
            Decl::Primitive(kind) => kind.nim_name().to_string(),
            Decl::Variable(Variable { ident, .. })
            | Decl::Parameter(Parameter { ident, .. })
            | Decl::Field(Field { ident, .. })
            | Decl::Signature(Signature { ident, .. }) => ident.name.clone(),
            Decl::Constructor(ctor) => ctor.name(),
            Decl::StructuredType(ty) => ty.ident.name.clone(),
        }
    }

    /// Graph identity, or `None` for nodes that only exist inside another declaration.
    pub fn key(&self) -> Option<DeclKey> {
        match self {
            Decl::Primitive(_) | Decl::Parameter(_) | Decl::Field(_) | Decl::Constructor(_) => {
                None
            }
            Decl::Variable(var) => Some(var.key()),
            Decl::Signature(sig) => sig.key(),
            Decl::StructuredType(ty) => Some(ty.key()),
        }
    }

    /// Keys that must be defined before this declaration.
    pub fn dependencies(&self) -> BTreeSet<DeclKey> {
        match self {
            Decl::Primitive(_) => BTreeSet::new(),
            Decl::Variable(Variable { ty, .. })
            | Decl::Parameter(Parameter { ty, .. })
            | Decl::Field(Field { ty, .. }) => ty.key().into_iter().collect(),
            Decl::Signature(sig) => sig.dependencies(),
            Decl::Constructor(ctor) => ctor.dependencies(),
            Decl::StructuredType(ty) => ty.dependencies(),
        }
    }
}

impl Render for Decl {
    fn render(&self) -> String {
        match self {
            Decl::Primitive(kind) => kind.nim_name().to_string(),
            Decl::Variable(var) => var.render(),
            Decl::Parameter(param) => param.render(),
            Decl::Field(field) => field.render(),
            Decl::Signature(sig) => sig.render(),
            Decl::Constructor(ctor) => ctor.render(),
            Decl::StructuredType(ty) => ty.render(),
        }
    }
}
