use std::collections::HashSet;

/// Nim keywords. Identifiers matching one of these are prefixed on output.
const NIM_KEYWORDS: &[&str] = &[
    "addr", "and", "as", "asm", "bind", "block", "break", "case", "cast", "concept", "const",
    "continue", "converter", "defer", "discard", "distinct", "div", "do", "elif", "else", "end",
    "enum", "except", "export", "finally", "for", "from", "func", "if", "import", "in",
    "include", "interface", "is", "isnot", "iterator", "let", "macro", "method", "mixin", "mod",
    "nil", "not", "notin", "object", "of", "or", "out", "proc", "ptr", "raise", "ref", "return",
    "shl", "shr", "static", "template", "try", "tuple", "type", "using", "var", "when", "while",
    "xor", "yield",
];

/// Globals that either clash with Nim's system module or cannot be bound faithfully.
const DEFAULT_DENYLIST: &[&str] = &[
    "undefined",
    "NaN",
    "Infinity",
    "globalThis",
    "eval",
    "Symbol",
    "Object:constructor",
    "Function:apply",
    "Function:bind",
    "Function:call",
];

/// Fixed inputs of a generation run.
///
/// Owned by the caller and lent to the builder, so independent runs never
/// share state.
#[derive(Clone, Debug)]
pub struct Config {
    /// Qualified names and namespaces that are never translated.
    ///
    /// Module-scope symbols match by `name`, `namespace:name` or `namespace`;
    /// members match by `Owner:member`.
    pub denylist: HashSet<String>,
    pub reserved: HashSet<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            denylist: DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
            reserved: NIM_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// A configuration with nothing denied and nothing reserved.
    pub fn empty() -> Self {
        Self {
            denylist: HashSet::new(),
            reserved: HashSet::new(),
        }
    }

    pub fn deny(mut self, names: &[impl AsRef<str>]) -> Self {
        for name in names {
            self.denylist.insert(name.as_ref().to_string());
        }
        self
    }

    pub fn reserve(mut self, words: &[impl AsRef<str>]) -> Self {
        for word in words {
            self.reserved.insert(word.as_ref().to_string());
        }
        self
    }

    pub fn is_denied(&self, namespace: Option<&str>, name: &str) -> bool {
        if self.denylist.contains(name) {
            return true;
        }
        match namespace {
            Some(ns) => {
                self.denylist.contains(ns) || self.denylist.contains(&format!("{ns}:{name}"))
            }
            None => false,
        }
    }

    pub fn is_member_denied(&self, owner: &str, member: &str) -> bool {
        self.denylist.contains(&format!("{owner}:{member}"))
    }
}
