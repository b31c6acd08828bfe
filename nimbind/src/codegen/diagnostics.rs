use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A single declaration or member was left out.
    Skipped,
    /// A group of mutually dependent declarations was left out.
    Cycle,
}

/// One line on the diagnostics channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Skipped,
            message: message.into(),
        }
    }

    pub fn cycle(names: &[String]) -> Self {
        Self {
            kind: DiagnosticKind::Cycle,
            message: format!("dropping dependency cycle: {}", names.join(", ")),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "warning: {}", self.message)
    }
}
