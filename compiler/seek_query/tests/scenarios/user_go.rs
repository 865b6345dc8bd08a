//! Go to definition across `user/user.go`.

use pretty_assertions::assert_eq;
use seek_query::QueryError;
use seek_sema::DefKind;

use crate::common::{user_package, UserPackage};

#[test]
fn type_use_in_receiver_jumps_to_type_declaration() {
    let UserPackage { loaded, user, .. } = user_package().unwrap();
    let source = loaded.source(user).unwrap();
    let engine = loaded.engine();

    // Inside `User` in `func (u *User) Welcome()`
    let def = engine.resolve_position(source, 194).unwrap();
    assert_eq!(def.kind, DefKind::TypeName);
    assert_eq!(def.offset(), Some(39));
    assert_eq!(loaded.sources.interner().lookup(def.name), "User");
    assert!(!def.is_imported(loaded.table.scope()));

    let pos = engine.render(&loaded.sources, &def).unwrap();
    assert_eq!(pos.to_string(), "user/user.go:5:6");
}

#[test]
fn imported_function_jumps_into_the_other_package() {
    let UserPackage {
        loaded,
        user,
        email,
    } = user_package().unwrap();
    let source = loaded.source(user).unwrap();
    let engine = loaded.engine();

    // Inside `Send` in `email.Send(...)`
    let def = engine.resolve_position(source, 219).unwrap();
    assert_eq!(def.kind, DefKind::Func);
    assert_eq!(def.site.map(|site| site.file), Some(email));
    assert!(def.is_imported(loaded.table.scope()));
    assert_eq!(
        loaded.site_path(&def).and_then(|path| path.to_str()),
        Some("email/email.go")
    );
    assert_eq!(
        engine.render(&loaded.sources, &def).unwrap().to_string(),
        "email/email.go:6:6"
    );
}

#[test]
fn package_qualifier_resolves_to_the_package() {
    let UserPackage { loaded, user, .. } = user_package().unwrap();
    let source = loaded.source(user).unwrap();
    let engine = loaded.engine();

    let pkg = engine.resolve_position(source, 212).unwrap();
    assert_eq!(pkg.kind, DefKind::Package);
    assert_eq!(pkg.site.map(|site| site.file), Some(user));
    assert_eq!(
        engine.render(&loaded.sources, &pkg).unwrap().to_string(),
        "user/user.go:3:8"
    );

    // The `email` parameter is a different object with the same spelling
    let param = engine.resolve_position(source, 171).unwrap();
    assert_eq!(param.kind, DefKind::Param);
    assert_eq!(param.offset(), Some(110));
    assert_ne!(pkg, param);
}

#[test]
fn package_clause_name_resolves_to_itself() {
    let UserPackage { loaded, user, .. } = user_package().unwrap();
    let source = loaded.source(user).unwrap();

    let def = loaded.engine().resolve_position(source, 8).unwrap();
    assert_eq!(def.kind, DefKind::Unclassified);
    assert_eq!(def.offset(), Some(8));
    assert_eq!(def.package, Some(loaded.table.scope()));
}

#[test]
fn selectors_and_composite_keys_resolve_to_fields() {
    let UserPackage { loaded, user, .. } = user_package().unwrap();
    let source = loaded.source(user).unwrap();
    let engine = loaded.engine();

    // `u.Email`
    let email = engine.resolve_position(source, 225).unwrap();
    assert_eq!((email.kind, email.offset()), (DefKind::Field, Some(68)));
    // `Name:` in the composite literal
    let name = engine.resolve_position(source, 149).unwrap();
    assert_eq!((name.kind, name.offset()), (DefKind::Field, Some(54)));
    // The parameter `name` on the right of it
    let param = engine.resolve_position(source, 156).unwrap();
    assert_eq!((param.kind, param.offset()), (DefKind::Param, Some(97)));
}

#[test]
fn builtin_types_have_no_location() {
    let UserPackage { loaded, user, .. } = user_package().unwrap();
    let source = loaded.source(user).unwrap();
    let engine = loaded.engine();

    let string = engine.resolve_position(source, 60).unwrap();
    assert!(string.is_universe());
    assert_eq!(engine.render(&loaded.sources, &string), None);
    assert_eq!(engine.resolve_position(source, 116), Ok(string));
}

#[test]
fn references_to_user_in_source_order() {
    let UserPackage { loaded, user, .. } = user_package().unwrap();
    let source = loaded.source(user).unwrap();
    let engine = loaded.engine();

    let starts: Vec<u32> = engine
        .find_references(source, 41)
        .unwrap()
        .iter()
        .map(|occ| source.identifier(occ.node).unwrap().span.start)
        .collect();
    assert_eq!(starts, vec![125, 141, 193]);
}

#[test]
fn every_identifier_resolves() {
    let UserPackage { loaded, user, .. } = user_package().unwrap();
    let source = loaded.source(user).unwrap();
    let engine = loaded.engine();
    let interner = loaded.sources.interner();

    let dump: Vec<(u32, &str, DefKind)> = engine
        .all_identifiers(source)
        .map(|ident| {
            let def = engine.resolve_position(source, ident.span.start).unwrap();
            (ident.span.start, interner.lookup(ident.name), def.kind)
        })
        .collect();
    assert_eq!(
        dump,
        vec![
            (8, "user", DefKind::Unclassified),
            (39, "User", DefKind::TypeName),
            (54, "Name", DefKind::Field),
            (60, "string", DefKind::TypeName),
            (68, "Email", DefKind::Field),
            (74, "string", DefKind::TypeName),
            (89, "NewUser", DefKind::Func),
            (97, "name", DefKind::Param),
            (102, "string", DefKind::TypeName),
            (110, "email", DefKind::Param),
            (116, "string", DefKind::TypeName),
            (125, "User", DefKind::TypeName),
            (141, "User", DefKind::TypeName),
            (149, "Name", DefKind::Field),
            (156, "name", DefKind::Param),
            (164, "Email", DefKind::Field),
            (171, "email", DefKind::Param),
            (190, "u", DefKind::Param),
            (193, "User", DefKind::TypeName),
            (199, "Welcome", DefKind::Method),
            (212, "email", DefKind::Package),
            (218, "Send", DefKind::Func),
            (223, "u", DefKind::Param),
            (225, "Email", DefKind::Field),
        ]
    );
}

#[test]
fn line_and_column_queries() {
    let UserPackage { loaded, user, .. } = user_package().unwrap();
    let source = loaded.source(user).unwrap();
    let engine = loaded.engine();

    // Line 18 starts with a tab; `Send` is at column 8, line 3 column 9 is
    // inside the import path
    let send = engine.resolve_line_col(source, 18, 8).unwrap();
    assert_eq!(send.kind, DefKind::Func);
    assert_eq!(
        engine.resolve_line_col(source, 3, 9),
        Err(QueryError::PositionNotAnIdentifier { offset: 22 })
    );
}
