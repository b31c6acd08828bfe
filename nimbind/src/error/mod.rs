use std::path::PathBuf;

use thiserror::Error;

pub type GenResult<T> = Result<T, BindgenError>;

#[derive(Error, Debug)]
pub enum BindgenError {
    /// The oracle handed back a type with no rendering rule.
    #[error("unrepresentable type `{0}`")]
    UnrepresentableType(String),

    #[error("refused `{name}`: {reason}")]
    ConstructionRefused { name: String, reason: String },

    #[error("failed to load symbol table {}: {message}", .path.display())]
    Load { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BindgenError {
    /// Whether the builder may downgrade this error to a diagnostic.
    ///
    /// Anything else aborts the run.
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BindgenError::UnrepresentableType(_) | BindgenError::ConstructionRefused { .. }
        )
    }
}

/// Helper macro to create a `BindgenError::ConstructionRefused`
#[macro_export]
macro_rules! refused {
    ( $name:expr, $($arg:tt)* ) => {
        $crate::error::BindgenError::ConstructionRefused {
            name: ::std::string::ToString::to_string(&$name),
            reason: format!($($arg)*),
        }
    };
}
