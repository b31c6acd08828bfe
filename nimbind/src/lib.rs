pub mod codegen;
pub mod error;
pub mod oracle;

pub use codegen::frontend::{Bindings, Generator};
pub use codegen::Config;
pub use error::{BindgenError, GenResult};
pub use oracle::{Oracle, SymbolTable};
