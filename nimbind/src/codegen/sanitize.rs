use std::collections::HashSet;

/// A target-language identifier together with the foreign name it links to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ident {
    /// Name as it appears in the generated Nim code.
    pub name: String,
    /// Name of the foreign symbol.
    pub original: String,
}

impl Ident {
    pub fn new(original: &str, reserved: &HashSet<String>) -> Self {
        Self {
            name: sanitize(original, reserved),
            original: original.to_string(),
        }
    }

    /// The foreign name, if it has to be spelled out because sanitizing changed it.
    pub fn link(&self) -> Option<&str> {
        (self.name != self.original).then_some(self.original.as_str())
    }
}

/// Turn `name` into a legal, non-reserved Nim identifier.
///
/// Runs of underscores collapse into one, a leading underscore becomes a `z`
/// prefix and a reserved word gets an `x` prefix. Both prefixes capitalize the
/// character that follows them.
pub fn sanitize(name: &str, reserved: &HashSet<String>) -> String {
    let mut collapsed = String::with_capacity(name.len());
    let mut prev_underscore = false;
    for c in name.chars() {
        if c == '_' && prev_underscore {
            continue;
        }
        prev_underscore = c == '_';
        collapsed.push(c);
    }

    let mut out = match collapsed.strip_prefix('_') {
        Some(rest) => prefixed('z', rest),
        None => collapsed,
    };

    if reserved.contains(&out) {
        out = prefixed('x', &out);
    }
    out
}

fn prefixed(prefix: char, rest: &str) -> String {
    let mut chars = rest.chars();
    let mut out = String::with_capacity(rest.len() + 1);
    out.push(prefix);
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
    }
    out.push_str(chars.as_str());
    out
}

/// Escape `name` for use inside a quoted `importc` string.
pub fn escape_link(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}

/// Escape `name` for use inside a quoted `importcpp` pattern, where `$` is special.
pub fn escape_pattern(name: &str) -> String {
    escape_link(name).replace('$', "$$")
}
