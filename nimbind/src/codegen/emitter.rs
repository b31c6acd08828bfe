use super::ast::{Decl, Render};
use super::diagnostics::Diagnostic;
use super::graph::DependencyGraph;
use super::types::DeclKey;

use log::{debug, warn};

use std::collections::HashMap;

/// Declarations in a safe emission order, plus what had to be dropped.
#[derive(Debug)]
pub struct Emission {
    pub decls: Vec<Decl>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Order `decls` so that every declaration follows everything it depends on.
///
/// Members of dependency cycles cannot be written out linearly and are dropped
/// as a group. A later declaration reusing an earlier key is dropped with a
/// diagnostic. Keys that are only ever depended upon, never declared, vanish
/// silently.
pub fn order(decls: Vec<Decl>) -> Emission {
    let mut graph = DependencyGraph::new();
    let mut attached: HashMap<DeclKey, Decl> = HashMap::new();
    let mut diagnostics = Vec::new();

    for decl in decls {
        let Some(key) = decl.key() else {
            debug!("{} does not stand alone, not emitting it", decl.name());
            continue;
        };
        if attached.contains_key(&key) {
            let diagnostic =
                Diagnostic::skipped(format!("skipping duplicate declaration of `{key}`"));
            warn!("{}", diagnostic.message);
            diagnostics.push(diagnostic);
            continue;
        }
        graph.add_node(key.clone());
        for dep in decl.dependencies() {
            graph.add_edge(key.clone(), dep);
        }
        attached.insert(key, decl);
    }

    let mut ordered = Vec::with_capacity(attached.len());

    for component in graph.strongly_connected_components() {
        if let [id] = component.as_slice() {
            let key = graph.key(*id);
            match attached.remove(key) {
                Some(decl) => ordered.push(decl),
                None => debug!("{key} was never built, dropping it"),
            }
            continue;
        }

        let mut names: Vec<String> = component
            .iter()
            .map(|&id| {
                let key = graph.key(id);
                attached.remove(key);
                key.to_string()
            })
            .collect();
        names.sort();
        let diagnostic = Diagnostic::cycle(&names);
        warn!("{}", diagnostic.message);
        diagnostics.push(diagnostic);
    }

    Emission {
        decls: ordered,
        diagnostics,
    }
}

/// Render ordered declarations under a header naming the inputs.
pub fn render(sources: &[String], decls: &[Decl]) -> String {
    let mut out = format!("# Generated by nimbind from: {}\n", sources.join(", "));
    for decl in decls {
        out.push_str(&decl.render());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::ast::{Constructor, Field, Signature, StructuredType, Variable};
    use crate::codegen::diagnostics::DiagnosticKind;
    use crate::codegen::sanitize::Ident;
    use crate::codegen::types::{PrimitiveKind, TypeRef};

    use std::collections::HashSet;
    use std::rc::Rc;

    fn ident(name: &str) -> Ident {
        Ident::new(name, &HashSet::new())
    }

    fn reference(name: &str) -> TypeRef {
        TypeRef::Structured(ident(name))
    }

    fn class(
        name: &str,
        parent: Option<Rc<StructuredType>>,
        fields: &[(&str, TypeRef)],
    ) -> Rc<StructuredType> {
        Rc::new(StructuredType {
            ident: ident(name),
            is_abstract: false,
            parent,
            fields: fields
                .iter()
                .map(|(name, ty)| Field {
                    ident: ident(name),
                    ty: ty.clone(),
                })
                .collect(),
            constructors: vec![Constructor {
                owner: ident(name),
                params: vec![],
            }],
            methods: vec![],
        })
    }

    fn position(decls: &[Decl], name: &str) -> usize {
        decls
            .iter()
            .position(|d| d.name() == name)
            .unwrap_or_else(|| panic!("{name} missing"))
    }

    #[test]
    fn emits_dependencies_first() {
        let base = class("Base", None, &[]);
        let derived = class("Derived", Some(Rc::clone(&base)), &[]);
        let decls = vec![
            Decl::Variable(Variable {
                ident: ident("current"),
                ty: reference("Derived"),
            }),
            Decl::StructuredType(derived),
            Decl::StructuredType(base),
        ];

        let emission = order(decls);
        assert!(emission.diagnostics.is_empty());
        let out = &emission.decls;
        assert_eq!(out.len(), 3);
        assert!(position(out, "Base") < position(out, "Derived"));
        assert!(position(out, "Derived") < position(out, "current"));
    }

    #[test]
    fn drops_mutual_references_as_one_cycle() {
        let a = class("A", None, &[("b", reference("B"))]);
        let b = class("B", None, &[("a", reference("A"))]);
        let user = Decl::Variable(Variable {
            ident: ident("a"),
            ty: reference("A"),
        });
        let loner = Decl::Variable(Variable {
            ident: ident("n"),
            ty: TypeRef::Primitive(PrimitiveKind::Number),
        });

        let emission = order(vec![
            Decl::StructuredType(a),
            Decl::StructuredType(b),
            user,
            loner,
        ]);

        let names: Vec<String> = emission.decls.iter().map(Decl::name).collect();
        assert_eq!(names, ["a", "n"]);
        assert_eq!(emission.diagnostics.len(), 1);
        assert_eq!(
            emission.diagnostics[0].message,
            "dropping dependency cycle: A, B"
        );
    }

    #[test]
    fn self_reference_is_not_a_cycle() {
        let node = class("Node", None, &[("next", reference("Node"))]);
        let emission = order(vec![Decl::StructuredType(node)]);
        assert_eq!(emission.decls.len(), 1);
        assert!(emission.diagnostics.is_empty());
    }

    #[test]
    fn unbuilt_dependencies_drop_silently() {
        let sig = Signature {
            ident: ident("open"),
            params: vec![],
            ret: reference("Missing"),
            owner: None,
            overload: 0,
        };
        let emission = order(vec![Decl::Signature(sig)]);
        assert_eq!(emission.decls.len(), 1);
        assert!(emission.diagnostics.is_empty());
    }

    #[test]
    fn later_duplicates_are_reported() {
        let first = Decl::Variable(Variable {
            ident: ident("x"),
            ty: TypeRef::Primitive(PrimitiveKind::Number),
        });
        let second = Decl::Variable(Variable {
            ident: ident("x"),
            ty: TypeRef::Primitive(PrimitiveKind::String),
        });

        let emission = order(vec![first, second]);
        assert_eq!(emission.decls.len(), 1);
        assert_eq!(emission.decls[0].render(), "var x* {.importc, nodecl.}: float");
        assert_eq!(emission.diagnostics.len(), 1);
        assert_eq!(emission.diagnostics[0].kind, DiagnosticKind::Skipped);
        assert_eq!(
            emission.diagnostics[0].message,
            "skipping duplicate declaration of `x`"
        );
    }

    #[test]
    fn keyless_nodes_are_not_emitted() {
        let emission = order(vec![
            Decl::Primitive(PrimitiveKind::Number),
            Decl::Constructor(Constructor {
                owner: ident("Foo"),
                params: vec![],
            }),
        ]);
        assert!(emission.decls.is_empty());
    }

    #[test]
    fn renders_header_and_declarations() {
        let decls = vec![Decl::Variable(Variable {
            ident: ident("ready"),
            ty: TypeRef::Primitive(PrimitiveKind::Boolean),
        })];
        let text = render(&["a.d.ts".to_string(), "b.d.ts".to_string()], &decls);
        assert_eq!(
            text,
            "# Generated by nimbind from: a.d.ts, b.d.ts\n\
             var ready* {.importc, nodecl.}: bool\n"
        );
    }
}
