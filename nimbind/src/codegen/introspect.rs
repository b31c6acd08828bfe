use crate::oracle::{CallSignature, Oracle, SourceType, Symbol, TypeClass};

use std::fmt::Write;

fn classify(oracle: &impl Oracle, ty: &SourceType) -> String {
    match oracle.classify(ty) {
        TypeClass::Number => "number".to_string(),
        TypeClass::String => "string".to_string(),
        TypeClass::Boolean => "boolean".to_string(),
        TypeClass::Void => "void".to_string(),
        TypeClass::ClassLike(sym) => format!("class-like({:?} {})", sym.kind, sym.name),
        TypeClass::Unrepresentable => "unrepresentable".to_string(),
    }
}

fn describe_signature(oracle: &impl Oracle, out: &mut String, label: &str, sig: &CallSignature) {
    let params = sig
        .params
        .iter()
        .map(|p| format!("{}: {} => {}", p.name, p.ty, classify(oracle, &p.ty)))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(
        out,
        "  {label}({params}) -> {} => {}",
        sig.ret,
        classify(oracle, &sig.ret)
    );
}

/// Flags and type classifications of `sym`, one fact per line.
///
/// With `raw` set the full symbol is appended as well.
pub fn describe(oracle: &impl Oracle, sym: &Symbol, raw: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "debug: {} kind={:?} namespace={} members={}",
        sym.name,
        sym.kind,
        sym.namespace.as_deref().unwrap_or("-"),
        sym.members.len()
    );
    if let Some(ty) = &sym.ty {
        let _ = writeln!(out, "  type {ty} => {}", classify(oracle, ty));
    }
    if let Some(parent) = &sym.parent {
        let _ = writeln!(out, "  parent {parent} => {}", classify(oracle, parent));
    }
    for (i, sig) in sym.signatures.iter().enumerate() {
        describe_signature(oracle, &mut out, &format!("signature #{i}"), sig);
    }
    for member in &sym.members {
        let _ = writeln!(out, "  member {} kind={:?}", member.name, member.kind);
        if let Some(ty) = &member.ty {
            let _ = writeln!(out, "    type {ty} => {}", classify(oracle, ty));
        }
        for (i, sig) in member.signatures.iter().enumerate() {
            describe_signature(oracle, &mut out, &format!("  #{i}"), sig);
        }
    }
    if raw {
        let _ = writeln!(out, "{sym:#?}");
    }
    out
}
