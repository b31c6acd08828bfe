//! The `codegen` module is responsible for generating Nim bindings from the
//! symbols the [oracle](crate::oracle) reports.
//!
//! It builds a closed set of declarations from the symbols, orders them by
//! dependency and renders them as Nim source.

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod emitter;
pub mod graph;
pub mod sanitize;
pub use ast::{Constructor, Decl, Field, Parameter, Render, Signature, StructuredType, Variable};
pub use config::Config;
pub use diagnostics::{Diagnostic, DiagnosticKind};

/// Turns oracle symbols into declarations, handling denylists, inheritance
/// and overloads, and downgrading per-item failures to diagnostics.
pub mod builder;

/// Ties the builder and the emitter together into a single generation run.
pub mod frontend;

/// Primitive kinds, dependency keys and resolved type references.
pub mod types;

/// Human-readable dumps of symbols and their type classifications.
pub mod introspect;
