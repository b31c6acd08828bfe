//! The `oracle` module is the boundary to semantic analysis.
//!
//! Symbol discovery and type resolution happen elsewhere; the code generator
//! only ever sees module-scope [`Symbol`]s and asks the [`Oracle`] to classify
//! their types.

pub mod symbols;
pub mod table;

pub use symbols::{CallSignature, Member, MemberKind, ParamSymbol, SourceType, Symbol, SymbolKind};
pub use table::SymbolTable;

/// What the oracle knows about a type.
#[derive(Clone, Copy, Debug)]
pub enum TypeClass<'a> {
    Number,
    String,
    Boolean,
    Void,
    /// A class or interface, together with its declaring symbol.
    ClassLike(&'a Symbol),
    Unrepresentable,
}

/// Semantic analysis of one source unit.
pub trait Oracle {
    /// Names of the original input sources.
    fn sources(&self) -> &[String];

    /// Module-scope symbols, in declaration order.
    fn symbols(&self) -> &[Symbol];

    /// Classify a resolved type.
    fn classify(&self, ty: &SourceType) -> TypeClass<'_>;
}
