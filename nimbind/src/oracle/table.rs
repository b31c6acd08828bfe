use serde::Deserialize;

use super::symbols::{SourceType, Symbol};
use super::{Oracle, TypeClass};
use crate::error::{BindgenError, GenResult};

use std::collections::HashMap;
use std::path::Path;

/// An [`Oracle`] over a pre-resolved symbol table stored as JSON.
///
/// Symbols are looked up by name. References resolve against classes and
/// interfaces only, so a value declared under the same name as a type does not
/// hide it. A reference to any other name classifies as unrepresentable.
#[derive(Debug, Default, Deserialize)]
pub struct SymbolTable {
    /// Files the table was extracted from, echoed in the output header.
    #[serde(default)]
    sources: Vec<String>,
    symbols: Vec<Symbol>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    #[serde(skip)]
    type_index: HashMap<String, usize>,
}

impl SymbolTable {
    pub fn new(sources: Vec<String>, symbols: Vec<Symbol>) -> Self {
        let mut table = Self {
            sources,
            symbols,
            ..Self::default()
        };
        table.reindex();
        table
    }

    pub fn from_json_str(path: &Path, json: &str) -> GenResult<Self> {
        let mut table: SymbolTable =
            serde_json::from_str(json).map_err(|e| BindgenError::Load {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        if table.sources.is_empty() {
            table.sources.push(path.display().to_string());
        }
        table.reindex();
        Ok(table)
    }

    pub fn load(path: impl AsRef<Path>) -> GenResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| BindgenError::Load {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json_str(path, &json)
    }

    fn reindex(&mut self) {
        self.index.clear();
        self.type_index.clear();
        for (i, sym) in self.symbols.iter().enumerate() {
            // first declaration wins, later duplicates stay reachable only by iteration
            self.index.entry(sym.name.clone()).or_insert(i);
            if sym.kind.is_class_like() {
                self.type_index.entry(sym.name.clone()).or_insert(i);
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name).map(|&i| &self.symbols[i])
    }

    /// The first class or interface called `name`.
    pub fn lookup_type(&self, name: &str) -> Option<&Symbol> {
        self.type_index.get(name).map(|&i| &self.symbols[i])
    }
}

impl Oracle for SymbolTable {
    fn sources(&self) -> &[String] {
        &self.sources
    }

    fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    fn classify(&self, ty: &SourceType) -> TypeClass<'_> {
        match ty {
            SourceType::Number => TypeClass::Number,
            SourceType::String => TypeClass::String,
            SourceType::Boolean => TypeClass::Boolean,
            SourceType::Void => TypeClass::Void,
            SourceType::Reference { name } => match self.lookup_type(name) {
                Some(sym) => TypeClass::ClassLike(sym),
                None => TypeClass::Unrepresentable,
            },
            SourceType::Opaque { .. } => TypeClass::Unrepresentable,
        }
    }
}
