use crate::{
    codegen::{builder::Builder, config::Config, diagnostics::Diagnostic, emitter},
    error::GenResult,
    oracle::Oracle,
};
use log::info;

use std::path::Path;

/// Output of one generation run.
#[derive(Debug)]
pub struct Bindings {
    /// Nim source, ready to be piped into the compiler.
    pub text: String,
    /// Every declaration that was left out, and why.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of top-level declarations in `text`.
    pub emitted: usize,
}

impl Bindings {
    pub fn write_to(&self, path: impl AsRef<Path>) -> GenResult<()> {
        std::fs::write(path, &self.text)?;
        Ok(())
    }
}

pub struct Generator<'a, O: Oracle> {
    oracle: &'a O,
    config: &'a Config,
}

impl<'a, O: Oracle> Generator<'a, O> {
    pub fn new(oracle: &'a O, config: &'a Config) -> Self {
        Self { oracle, config }
    }

    pub fn generate(&self) -> GenResult<Bindings> {
        let built = Builder::new(self.oracle, self.config).build_module()?;
        let emission = emitter::order(built.decls);

        let mut diagnostics = built.diagnostics;
        diagnostics.extend(emission.diagnostics);

        info!(
            "emitting {} declarations from {} symbols ({} diagnostics)",
            emission.decls.len(),
            self.oracle.symbols().len(),
            diagnostics.len()
        );

        Ok(Bindings {
            text: emitter::render(self.oracle.sources(), &emission.decls),
            diagnostics,
            emitted: emission.decls.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::diagnostics::DiagnosticKind;
    use crate::oracle::{CallSignature, Member, SourceType, Symbol, SymbolTable};

    use std::collections::BTreeSet;

    fn generate(symbols: Vec<Symbol>) -> Bindings {
        let table = SymbolTable::new(vec!["lib.d.ts".to_string()], symbols);
        let config = Config::default();
        Generator::new(&table, &config).generate().unwrap()
    }

    fn lines(bindings: &Bindings) -> Vec<&str> {
        bindings.text.lines().collect()
    }

    #[test]
    fn generates_single_class() {
        let foo = Symbol::class("Foo")
            .member(Member::constructor(vec![CallSignature::new(
                &[("x", SourceType::Number)],
                SourceType::Void,
            )]))
            .member(Member::method(
                "bar",
                vec![CallSignature::new(&[], SourceType::String)],
            ));
        let bindings = generate(vec![foo]);

        assert!(bindings.diagnostics.is_empty());
        assert_eq!(bindings.emitted, 1);
        assert_eq!(
            lines(&bindings),
            [
                "# Generated by nimbind from: lib.d.ts",
                "type Foo* {.importc.} = ref object of RootObj",
                "proc newFoo*(x: float): Foo {.importcpp: \"new Foo(@)\".}",
                "proc bar*(self: Foo): cstring {.importcpp: \"#.bar(@)\".}",
            ]
        );
    }

    #[test]
    fn mutual_field_references_become_one_cycle_diagnostic() {
        let bindings = generate(vec![
            Symbol::class("A").member(Member::field("b", SourceType::reference("B"))),
            Symbol::class("B").member(Member::field("a", SourceType::reference("A"))),
            Symbol::variable("ok", SourceType::Boolean),
        ]);

        assert_eq!(bindings.emitted, 1);
        assert!(!bindings.text.contains("type A*"));
        assert!(!bindings.text.contains("type B*"));
        let cycles: Vec<&Diagnostic> = bindings
            .diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Cycle)
            .collect();
        assert_eq!(cycles.len(), 1);
        assert!(cycles[0].message.contains("A, B"));
    }

    #[test]
    fn every_emitted_dependency_appears_earlier() {
        let symbols = vec![
            Symbol::function(
                "query",
                vec![CallSignature::new(
                    &[("root", SourceType::reference("Element"))],
                    SourceType::reference("NodeList"),
                )],
            ),
            Symbol::variable("body", SourceType::reference("Element")),
            Symbol::class("Element")
                .extends("Node")
                .member(Member::field("owner", SourceType::reference("Document"))),
            Symbol::class("NodeList").member(Member::field("length", SourceType::Number)),
            Symbol::class("Node").member(Member::field("parent", SourceType::reference("Node"))),
            Symbol::class("Document").extends("Node"),
            Symbol::class("Broken").extends("Missing"),
            Symbol::variable("broken", SourceType::reference("Broken")),
        ];
        let table = SymbolTable::new(vec![], symbols);
        let config = Config::default();
        let built = Builder::new(&table, &config).build_module().unwrap();
        let emission = emitter::order(built.decls);

        let mut seen = std::collections::HashSet::new();
        let mut keys = std::collections::HashSet::new();
        for decl in &emission.decls {
            keys.insert(decl.key().unwrap());
        }
        for decl in &emission.decls {
            for dep in decl.dependencies() {
                assert!(
                    seen.contains(&dep) || !keys.contains(&dep),
                    "{} needs {dep} before it",
                    decl.name()
                );
            }
            seen.insert(decl.key().unwrap());
        }
        assert!(emission.decls.iter().all(|d| d.name() != "Broken"));
    }

    #[test]
    fn interface_merged_with_a_value_stays_referenceable() {
        let bindings = generate(vec![
            Symbol::variable("Node", SourceType::opaque("{ prototype: Node }")),
            Symbol::interface("Node").member(Member::field("nodeName", SourceType::String)),
            Symbol::variable("doc", SourceType::reference("Node")),
        ]);

        assert!(bindings.text.contains("type Node* {.importc.} = ref object of RootObj"));
        assert!(bindings.text.contains("var doc* {.importc, nodecl.}: Node"));
        assert_eq!(bindings.diagnostics.len(), 1);
        assert!(bindings.diagnostics[0].message.starts_with("skipping `Node`"));
    }

    fn module(reverse_members: bool) -> Vec<Symbol> {
        let mut symbols = vec![
            Symbol::class("Base")
                .member(Member::field("id", SourceType::Number))
                .member(Member::field("label", SourceType::String)),
            Symbol::class("Widget")
                .extends("Base")
                .member(Member::field("id", SourceType::Number))
                .member(Member::field("owner", SourceType::reference("Panel")))
                .member(Member::field("width", SourceType::Number))
                .member(Member::field("items", SourceType::opaque("Item[]")))
                .member(Member::field("width", SourceType::Number))
                .member(Member::method("show", vec![CallSignature::new(&[], SourceType::Void)])),
            Symbol::class("Panel")
                .member(Member::field("visible", SourceType::Boolean))
                .member(Member::field("parent", SourceType::reference("Frame"))),
            Symbol::class("Frame")
                .member(Member::field("title", SourceType::String))
                .member(Member::field("panel", SourceType::reference("Panel"))),
            Symbol::variable("root", SourceType::reference("Widget")),
        ];
        if reverse_members {
            for sym in &mut symbols {
                sym.members.reverse();
            }
        }
        symbols
    }

    #[test]
    fn member_order_does_not_change_the_result() {
        let forward = generate(module(false));
        let backward = generate(module(true));

        let line_set = |b: &Bindings| b.text.lines().map(str::to_string).collect::<BTreeSet<_>>();
        assert_eq!(line_set(&forward), line_set(&backward));
        assert_eq!(forward.emitted, backward.emitted);

        let cycles = |b: &Bindings| {
            b.diagnostics
                .iter()
                .filter(|d| d.kind == DiagnosticKind::Cycle)
                .map(|d| d.message.clone())
                .collect::<BTreeSet<_>>()
        };
        assert_eq!(cycles(&forward), cycles(&backward));
        assert_eq!(
            cycles(&forward).into_iter().collect::<Vec<_>>(),
            ["dropping dependency cycle: Frame, Panel"]
        );

        let field_lines = |b: &Bindings| {
            b.text
                .lines()
                .filter(|line| line.starts_with("  "))
                .map(str::to_string)
                .collect::<BTreeSet<_>>()
        };
        assert_eq!(field_lines(&forward), field_lines(&backward));
        for bindings in [&forward, &backward] {
            assert_eq!(bindings.text.matches("  id*: float").count(), 1);
            assert_eq!(bindings.text.matches("  width*: float").count(), 1);
            assert!(bindings.text.contains("  owner*: Panel"));
        }
    }
}
