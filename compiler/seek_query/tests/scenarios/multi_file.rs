//! Several files of one package sharing an object table.

use pretty_assertions::assert_eq;
use seek_ir::FileId;
use seek_query::testing::{Fixture, Loaded};
use seek_query::QueryError;
use seek_sema::DefKind;

const A_GO: &str = "package p\n\ntype Config struct{ Port int }\n\nvar Default Config\n";
const B_GO: &str = "package p\n\nfunc Load() Config { return Config{Port: 80} }\n";

fn two_files() -> (Loaded, FileId, FileId) {
    let mut fx = Fixture::new("p");
    let a = fx.file("a.go", A_GO).unwrap();
    let b = fx.file("b.go", B_GO).unwrap();

    let int = fx.builtin("int", DefKind::TypeName);
    fx.declaring(a, "p", 0).unwrap().declaring(b, "p", 0).unwrap();
    let config = fx.def(a, "Config", 0, DefKind::TypeName).unwrap();
    let port = fx.def(a, "Port", 0, DefKind::Field).unwrap();
    fx.def(a, "Default", 0, DefKind::Var).unwrap();
    fx.def(b, "Load", 0, DefKind::Func).unwrap();
    fx.refer(a, "int", 0, int)
        .unwrap()
        .refer_all(a, "Config", config)
        .unwrap()
        .refer_all(b, "Config", config)
        .unwrap()
        .refer(b, "Port", 0, port)
        .unwrap();
    (fx.build().unwrap(), a, b)
}

#[test]
fn use_in_one_file_resolves_into_another() {
    let (loaded, a, b) = two_files();
    let source = loaded.source(b).unwrap();
    let engine = loaded.engine();

    let config = engine.resolve_position(source, 23).unwrap();
    assert_eq!(config.site.map(|site| site.file), Some(a));
    assert_eq!(config.offset(), Some(16));
    assert_eq!(
        engine.render(&loaded.sources, &config).unwrap().to_string(),
        "a.go:3:6"
    );

    let port = engine.resolve_position(source, 46).unwrap();
    assert_eq!(
        engine.render(&loaded.sources, &port).unwrap().to_string(),
        "a.go:3:21"
    );
}

#[test]
fn references_span_files_in_file_order() {
    let (loaded, a, b) = two_files();
    let engine = loaded.engine();

    let refs = engine
        .find_references(loaded.source(b).unwrap(), 39)
        .unwrap();
    let located: Vec<(FileId, u32)> = refs
        .iter()
        .map(|occ| {
            let source = loaded.source(occ.file).unwrap();
            (occ.file, source.identifier(occ.node).unwrap().span.start)
        })
        .collect();
    assert_eq!(located, vec![(a, 55), (b, 23), (b, 39)]);

    // Same list from the declaration in the other file
    let from_decl = engine
        .find_references(loaded.source(a).unwrap(), 16)
        .unwrap();
    assert_eq!(from_decl, refs);
}

#[test]
fn both_package_clauses_resolve_to_themselves() {
    let (loaded, a, b) = two_files();
    let engine = loaded.engine();

    let in_a = engine.resolve_position(loaded.source(a).unwrap(), 8).unwrap();
    let in_b = engine.resolve_position(loaded.source(b).unwrap(), 8).unwrap();
    assert_eq!(in_a.kind, DefKind::Unclassified);
    assert_eq!(in_a.site.map(|site| site.file), Some(a));
    assert_eq!(in_b.site.map(|site| site.file), Some(b));
    assert_ne!(in_a, in_b);
}

#[test]
fn files_of_other_packages_are_out_of_scope() {
    let mut fx = Fixture::new("app");
    let main = fx.file("main.go", "var v = lib.F\n").unwrap();
    let lib = fx
        .external_file("lib/lib.go", "package lib\n\nfunc F() {}\n", "app/lib")
        .unwrap();
    let pkg = fx.def(lib, "lib", 0, DefKind::Package).unwrap();
    let f = fx.def(lib, "F", 0, DefKind::Func).unwrap();
    fx.def(main, "v", 0, DefKind::Var).unwrap();
    fx.refer(main, "lib", 0, pkg)
        .unwrap()
        .refer(main, "F", 0, f)
        .unwrap();
    let loaded = fx.build().unwrap();
    let engine = loaded.engine();

    // Visible through the table...
    let def = engine
        .resolve_position(loaded.source(main).unwrap(), 12)
        .unwrap();
    assert_eq!(
        engine.render(&loaded.sources, &def).unwrap().to_string(),
        "lib/lib.go:3:6"
    );
    // ...but not queryable in place
    let lib_source = loaded.source(lib).unwrap();
    assert_eq!(
        engine.resolve_position(lib_source, 18),
        Err(QueryError::OutOfScope { file: lib })
    );
    assert!(!engine.resolve_position(lib_source, 18).unwrap_err().is_no_result());
}

fn one_type(name: &str, var: &str) -> (Loaded, FileId) {
    let mut fx = Fixture::new("p");
    let text = format!("type {name} int\nvar {var} {name}\n");
    let file = fx.file("p.go", &text).unwrap();
    let int = fx.builtin("int", DefKind::TypeName);
    let ty = fx.def(file, name, 0, DefKind::TypeName).unwrap();
    fx.def(file, var, 0, DefKind::Var).unwrap();
    fx.refer(file, "int", 0, int)
        .unwrap()
        .refer(file, name, 1, ty)
        .unwrap();
    (fx.build().unwrap(), file)
}

#[test]
fn independent_scopes_do_not_answer_for_each_other() {
    let (first, first_file) = one_type("T", "x");
    let (second, second_file) = one_type("Q", "y");
    // Same id, different file sets
    assert_eq!(first_file, second_file);
    let foreign = second.source(second_file).unwrap();

    // `Q` in `var y Q`, asked of the other scope's engine
    assert_eq!(
        first.engine().resolve_position(foreign, 17),
        Err(QueryError::OutOfScope { file: second_file })
    );
    assert_eq!(
        first.engine().find_references(foreign, 17),
        Err(QueryError::OutOfScope { file: second_file })
    );
    // Locating needs no table and still works
    assert!(first.engine().locate(foreign, 17).unwrap().is_some());

    // Each engine answers for its own files
    let q = second.engine().resolve_position(foreign, 17).unwrap();
    assert_eq!(q.offset(), Some(5));
    assert_eq!(second.sources.interner().lookup(q.name), "Q");

    // Sites render only against the map the table was built from
    assert_eq!(first.engine().render(&second.sources, &q), None);
    assert_eq!(
        second.engine().render(&second.sources, &q).unwrap().to_string(),
        "p.go:1:6"
    );
}
