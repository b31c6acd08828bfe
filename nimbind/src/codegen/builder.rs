use super::ast::{Constructor, Decl, Field, Parameter, Signature, StructuredType, Variable};
use super::config::Config;
use super::diagnostics::Diagnostic;
use super::sanitize::Ident;
use super::types::{PrimitiveKind, TypeRef};
use crate::error::{BindgenError, GenResult};
use crate::oracle::{
    CallSignature, Member, MemberKind, Oracle, SourceType, Symbol, SymbolKind, TypeClass,
};
use crate::refused;

use log::{debug, warn};

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// Lifecycle of a structured type. Absent from the memo table means unbuilt.
#[derive(Debug)]
enum TypeState {
    Building,
    Built(Rc<StructuredType>),
    Invalid,
}

/// Everything the builder produced for one source unit.
#[derive(Debug)]
pub struct BuildOutput {
    pub decls: Vec<Decl>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Turns oracle symbols into declarations.
///
/// One builder handles one source unit: the structured type memo table lives
/// here and is never shared between runs.
pub struct Builder<'a, O: Oracle> {
    oracle: &'a O,
    config: &'a Config,
    types: HashMap<String, TypeState>,
    /// The symbol each structured type name was first built from.
    declared_by: HashMap<String, &'a Symbol>,
    /// Built structured types, parents before children.
    built: Vec<Rc<StructuredType>>,
    /// Class-like symbols seen in member positions that still need building.
    pending: VecDeque<&'a Symbol>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a, O: Oracle> Builder<'a, O> {
    pub fn new(oracle: &'a O, config: &'a Config) -> Self {
        Self {
            oracle,
            config,
            types: HashMap::new(),
            declared_by: HashMap::new(),
            built: Vec::new(),
            pending: VecDeque::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Build every module-scope symbol and everything they reference.
    ///
    /// Only unrecoverable errors are returned; everything else ends up as a
    /// diagnostic.
    pub fn build_module(mut self) -> GenResult<BuildOutput> {
        let oracle = self.oracle;
        let mut values = Vec::new();

        for sym in oracle.symbols() {
            let result = self.build_symbol(sym, &mut values);
            self.absorb(sym, result)?;
        }

        while let Some(sym) = self.pending.pop_front() {
            if self.types.contains_key(&sym.name) {
                continue;
            }
            let result = self.structured(sym).map(|_| ());
            self.absorb(sym, result)?;
        }

        let mut decls: Vec<Decl> = self
            .built
            .iter()
            .cloned()
            .map(Decl::StructuredType)
            .collect();
        decls.extend(values);

        debug!(
            "built {} declarations with {} diagnostics",
            decls.len(),
            self.diagnostics.len()
        );
        Ok(BuildOutput {
            decls,
            diagnostics: self.diagnostics,
        })
    }

    fn build_symbol(&mut self, sym: &'a Symbol, out: &mut Vec<Decl>) -> GenResult<()> {
        match sym.kind {
            SymbolKind::Variable => {
                out.push(Decl::Variable(self.variable(sym)?));
            }
            SymbolKind::Function => {
                out.extend(self.function(sym)?.into_iter().map(Decl::Signature));
            }
            SymbolKind::Class | SymbolKind::Interface => {
                let first = self.declared_by.get(&sym.name);
                if first.is_some_and(|first| !std::ptr::eq(*first, sym)) {
                    self.warn(format!("skipping duplicate declaration of `{}`", sym.name));
                    return Ok(());
                }
                self.structured(sym)?;
            }
        }
        Ok(())
    }

    fn warn(&mut self, message: String) {
        warn!("{message}");
        self.diagnostics.push(Diagnostic::skipped(message));
    }

    /// Per-symbol boundary: refusals and type failures become diagnostics.
    fn absorb(&mut self, sym: &Symbol, result: GenResult<()>) -> GenResult<()> {
        match result {
            Err(BindgenError::ConstructionRefused { name, reason }) if name == sym.name => {
                self.warn(format!("skipping `{name}`: {reason}"));
                Ok(())
            }
            Err(e) if e.is_recoverable() => {
                self.warn(format!("skipping `{}`: {e}", sym.name));
                Ok(())
            }
            other => other,
        }
    }

    /// Member boundary: only type failures are absorbed here.
    fn recover(&mut self, err: BindgenError, what: String) -> GenResult<()> {
        match err {
            BindgenError::UnrepresentableType(_) => {
                self.warn(format!("skipping {what}: {err}"));
                Ok(())
            }
            other => Err(other),
        }
    }

    fn ident(&self, name: &str) -> Ident {
        Ident::new(name, &self.config.reserved)
    }

    fn resolve(&mut self, ty: &SourceType) -> GenResult<TypeRef> {
        let oracle = self.oracle;
        match oracle.classify(ty) {
            TypeClass::Number => Ok(TypeRef::Primitive(PrimitiveKind::Number)),
            TypeClass::String => Ok(TypeRef::Primitive(PrimitiveKind::String)),
            TypeClass::Boolean => Ok(TypeRef::Primitive(PrimitiveKind::Boolean)),
            TypeClass::Void => Ok(TypeRef::Primitive(PrimitiveKind::Void)),
            TypeClass::ClassLike(sym) => {
                if !self.types.contains_key(&sym.name) {
                    self.pending.push_back(sym);
                }
                Ok(TypeRef::Structured(self.ident(&sym.name)))
            }
            TypeClass::Unrepresentable => Err(BindgenError::UnrepresentableType(ty.to_string())),
        }
    }

    fn resolve_declared(&mut self, ty: Option<&SourceType>) -> GenResult<TypeRef> {
        match ty {
            Some(ty) => self.resolve(ty),
            None => Err(BindgenError::UnrepresentableType("<missing>".to_string())),
        }
    }

    fn params(&mut self, sig: &CallSignature) -> GenResult<Vec<Parameter>> {
        let mut params = Vec::with_capacity(sig.params.len());
        for p in &sig.params {
            let ty = self.resolve(&p.ty)?;
            params.push(Parameter {
                ident: self.ident(&p.name),
                ty,
            });
        }
        Ok(params)
    }

    fn signature(
        &mut self,
        name: &str,
        sig: &CallSignature,
        owner: Option<&Ident>,
        overload: usize,
    ) -> GenResult<Signature> {
        let params = self.params(sig)?;
        let ret = self.resolve(&sig.ret)?;
        Ok(Signature {
            ident: self.ident(name),
            params,
            ret,
            owner: owner.cloned(),
            overload,
        })
    }

    fn variable(&mut self, sym: &Symbol) -> GenResult<Variable> {
        if self.config.is_denied(sym.namespace.as_deref(), &sym.name) {
            return Err(refused!(sym.name, "denylisted"));
        }
        let ty = self.resolve_declared(sym.ty.as_ref())?;
        debug!("variable {}: {}", sym.name, ty.nim_name());
        Ok(Variable {
            ident: self.ident(&sym.name),
            ty,
        })
    }

    /// Each overload stands on its own; one bad signature does not sink the rest.
    fn function(&mut self, sym: &Symbol) -> GenResult<Vec<Signature>> {
        if self.config.is_denied(sym.namespace.as_deref(), &sym.name) {
            return Err(refused!(sym.name, "denylisted"));
        }
        let mut overloads = Vec::new();
        for (i, sig) in sym.signatures.iter().enumerate() {
            match self.signature(&sym.name, sig, None, i) {
                Ok(sig) => overloads.push(sig),
                Err(e) => self.recover(e, format!("overload #{i} of `{}`", sym.name))?,
            }
        }
        debug!("function {}: {} overload(s)", sym.name, overloads.len());
        Ok(overloads)
    }

    /// Build (or fetch) the structured type declared by `sym`.
    pub fn structured(&mut self, sym: &'a Symbol) -> GenResult<Rc<StructuredType>> {
        match self.types.get(&sym.name) {
            Some(TypeState::Built(ty)) => return Ok(Rc::clone(ty)),
            Some(TypeState::Invalid) => {
                return Err(refused!(sym.name, "previously unbuildable"));
            }
            Some(TypeState::Building) => {
                return Err(refused!(
                    sym.name,
                    "still under construction; inheritance is recursive"
                ));
            }
            None => {}
        }

        self.declared_by.insert(sym.name.clone(), sym);
        if self.config.is_denied(sym.namespace.as_deref(), &sym.name) {
            self.types.insert(sym.name.clone(), TypeState::Invalid);
            return Err(refused!(sym.name, "denylisted"));
        }

        self.types.insert(sym.name.clone(), TypeState::Building);
        match self.build_structured(sym) {
            Ok(ty) => {
                let ty = Rc::new(ty);
                self.types
                    .insert(sym.name.clone(), TypeState::Built(Rc::clone(&ty)));
                self.built.push(Rc::clone(&ty));
                debug!("built type {}", sym.name);
                Ok(ty)
            }
            Err(e) => {
                self.types.insert(sym.name.clone(), TypeState::Invalid);
                Err(e)
            }
        }
    }

    fn build_structured(&mut self, sym: &'a Symbol) -> GenResult<StructuredType> {
        let oracle = self.oracle;
        let ident = self.ident(&sym.name);
        let is_abstract = sym.kind == SymbolKind::Interface;

        let parent = match &sym.parent {
            None => None,
            Some(ty) => match oracle.classify(ty) {
                TypeClass::ClassLike(parent) => Some(self.structured(parent)?),
                _ => {
                    return Err(refused!(
                        sym.name,
                        "parent `{ty}` is not a class or interface"
                    ));
                }
            },
        };

        let mut fields: Vec<Field> = Vec::new();
        let mut constructors = Vec::new();
        let mut methods = Vec::new();

        for member in &sym.members {
            match member.kind {
                MemberKind::Constructor if is_abstract => {
                    debug!("{}: ignoring constructor of an interface", sym.name);
                }
                MemberKind::Constructor => {
                    for (i, sig) in member.signatures.iter().enumerate() {
                        match self.params(sig) {
                            Ok(params) => constructors.push(Constructor {
                                owner: ident.clone(),
                                params,
                            }),
                            Err(e) => {
                                self.recover(e, format!("constructor #{i} of `{}`", sym.name))?
                            }
                        }
                    }
                }
                MemberKind::Field => {
                    if self.config.is_member_denied(&sym.name, &member.name) {
                        self.warn(format!(
                            "skipping denylisted field `{}:{}`",
                            sym.name, member.name
                        ));
                        continue;
                    }
                    let inherited = parent
                        .as_ref()
                        .is_some_and(|p| p.declares_field(&member.name));
                    if inherited || fields.iter().any(|f| f.ident.original == member.name) {
                        continue;
                    }
                    match self.field(member) {
                        Ok(field) => fields.push(field),
                        Err(e) => {
                            self.recover(e, format!("field `{}:{}`", sym.name, member.name))?
                        }
                    }
                }
                MemberKind::Method => {
                    if self.config.is_member_denied(&sym.name, &member.name) {
                        self.warn(format!(
                            "skipping denylisted method `{}:{}`",
                            sym.name, member.name
                        ));
                        continue;
                    }
                    for (i, sig) in member.signatures.iter().enumerate() {
                        match self.signature(&member.name, sig, Some(&ident), i) {
                            Ok(method) => methods.push(method),
                            Err(e) => self.recover(
                                e,
                                format!("overload #{i} of `{}:{}`", sym.name, member.name),
                            )?,
                        }
                    }
                }
                MemberKind::Other => {
                    self.warn(format!(
                        "skipping `{}:{}`: unrecognized member kind",
                        sym.name, member.name
                    ));
                }
            }
        }

        if constructors.is_empty() && !is_abstract {
            // parent constructors are reused verbatim, only the constructed type changes
            if let Some(parent) = &parent {
                constructors.extend(parent.constructors.iter().map(|c| c.retarget(&ident)));
            }
            if constructors.is_empty() {
                constructors.push(Constructor {
                    owner: ident.clone(),
                    params: Vec::new(),
                });
            }
        }

        Ok(StructuredType {
            ident,
            is_abstract,
            parent,
            fields,
            constructors,
            methods,
        })
    }

    fn field(&mut self, member: &Member) -> GenResult<Field> {
        let ty = self.resolve_declared(member.ty.as_ref())?;
        Ok(Field {
            ident: self.ident(&member.name),
            ty,
        })
    }
}
