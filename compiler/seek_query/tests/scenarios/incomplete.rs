//! Queries against a table that failed validation.

use pretty_assertions::assert_eq;
use seek_query::testing::Fixture;
use seek_query::{QueryEngine, QueryError};
use seek_sema::{DefKind, TableProblem};

const SRC: &str = "package p\n\nfunc f(a int) int {\n\treturn a + missing\n}\n";

#[test]
fn unresolved_use_does_not_poison_the_rest() {
    let mut fx = Fixture::new("p");
    let file = fx.file("p.go", SRC).unwrap();
    fx.declaring(file, "p", 0).unwrap();
    let int = fx.builtin("int", DefKind::TypeName);
    fx.def(file, "f", 0, DefKind::Func).unwrap();
    let a = fx.def(file, "a", 0, DefKind::Param).unwrap();
    fx.refer_all(file, "int", int)
        .unwrap()
        .refer_all(file, "a", a)
        .unwrap();

    let (sources, table) = fx.try_build().unwrap();
    let incomplete = table.unwrap_err();
    let source = sources.file(file).unwrap();
    let missing = source
        .identifiers()
        .find(|ident| ident.span.start == 43)
        .unwrap();
    assert_eq!(
        incomplete.problems,
        vec![TableProblem::UnresolvedUse {
            occurrence: missing.occurrence,
            name: missing.name,
            span: missing.span,
        }]
    );

    let engine = QueryEngine::new(&incomplete.table);
    assert_eq!(
        engine.resolve_position(source, 45),
        Err(QueryError::UnresolvedIdentifier {
            occurrence: missing.occurrence,
            name: missing.name,
            span: missing.span,
        })
    );
    assert_eq!(
        engine.find_references(source, 43).unwrap_err(),
        QueryError::UnresolvedIdentifier {
            occurrence: missing.occurrence,
            name: missing.name,
            span: missing.span,
        }
    );

    let param = engine.resolve_position(source, 39).unwrap();
    assert_eq!((param.kind, param.offset()), (DefKind::Param, Some(18)));
    assert!(engine.resolve_position(source, 20).unwrap().is_universe());
}

#[test]
fn use_with_two_definitions_is_unresolved() {
    let mut fx = Fixture::new("p");
    let file = fx.file("p.go", "var v int\nvar w int\n").unwrap();
    let int = fx.builtin("int", DefKind::TypeName);
    let boolean = fx.builtin("bool", DefKind::TypeName);
    fx.def(file, "v", 0, DefKind::Var).unwrap();
    fx.def(file, "w", 0, DefKind::Var).unwrap();
    fx.refer(file, "int", 0, int)
        .unwrap()
        .refer(file, "int", 0, boolean)
        .unwrap()
        .refer(file, "int", 1, int)
        .unwrap();

    let (sources, table) = fx.try_build().unwrap();
    let incomplete = table.unwrap_err();
    let source = sources.file(file).unwrap();
    let first = source
        .identifiers()
        .find(|ident| ident.span.start == 6)
        .unwrap();
    assert_eq!(
        incomplete.problems,
        vec![TableProblem::DuplicateEntry {
            occurrence: first.occurrence,
            first: int,
            second: boolean,
        }]
    );

    let engine = QueryEngine::new(&incomplete.table);
    assert_eq!(
        engine.resolve_position(source, 6),
        Err(QueryError::UnresolvedIdentifier {
            occurrence: first.occurrence,
            name: first.name,
            span: first.span,
        })
    );
    // The second `int` had a single answer
    assert!(engine.resolve_position(source, 16).unwrap().is_universe());
}
