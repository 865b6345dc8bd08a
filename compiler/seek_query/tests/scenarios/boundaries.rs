//! Offset edge cases.

use pretty_assertions::assert_eq;
use seek_ir::FileId;
use seek_query::testing::{Fixture, Loaded};
use seek_query::QueryError;
use seek_sema::DefKind;

/// `User` declared at 5 and used at exactly 120.
fn padded() -> (Loaded, FileId) {
    let text = format!(
        "type User struct {{ Name string }}\n//{}\nvar u User\n",
        " ".repeat(78)
    );
    let mut fx = Fixture::new("p");
    let file = fx.file("p.go", &text).unwrap();
    assert_eq!(fx.offset(file, "User", 1).unwrap(), 120);

    let string = fx.builtin("string", DefKind::TypeName);
    let user = fx.def(file, "User", 0, DefKind::TypeName).unwrap();
    fx.def(file, "Name", 0, DefKind::Field).unwrap();
    fx.def(file, "u", 0, DefKind::Var).unwrap();
    fx.refer(file, "string", 0, string)
        .unwrap()
        .refer(file, "User", 1, user)
        .unwrap();
    (fx.build().unwrap(), file)
}

#[test]
fn use_at_offset_120_resolves_to_offset_5() {
    let (loaded, file) = padded();
    let source = loaded.source(file).unwrap();
    let engine = loaded.engine();

    for offset in 120..124 {
        let def = engine.resolve_position(source, offset).unwrap();
        assert_eq!(def.offset(), Some(5), "offset {offset}");
        assert_eq!(def.kind, DefKind::TypeName);
    }
}

#[test]
fn identifier_end_is_outside_it() {
    let (loaded, file) = padded();
    let source = loaded.source(file).unwrap();
    let engine = loaded.engine();

    // `User` spans 120..124; 124 is the final newline
    assert_eq!(
        engine.resolve_position(source, 124),
        Err(QueryError::PositionNotAnIdentifier { offset: 124 })
    );
    // `type User` 5..9: 9 is the space before `struct`
    assert_eq!(
        engine.resolve_position(source, 9),
        Err(QueryError::PositionNotAnIdentifier { offset: 9 })
    );
    assert!(engine.resolve_position(source, 8).is_ok());
}

#[test]
fn whitespace_comments_and_keywords_are_not_identifiers() {
    let (loaded, file) = padded();
    let source = loaded.source(file).unwrap();
    let engine = loaded.engine();

    // `type`, `{`, the padded comment, `var`
    for offset in [0, 3, 17, 33, 34, 60, 113, 114] {
        assert_eq!(
            engine.resolve_position(source, offset),
            Err(QueryError::PositionNotAnIdentifier { offset }),
            "offset {offset}"
        );
    }
}

#[test]
fn string_literal_is_not_an_identifier() {
    let mut fx = Fixture::new("p");
    let file = fx.file("p.go", "var s = \"User\"\n").unwrap();
    fx.def(file, "s", 0, DefKind::Var).unwrap();
    let loaded = fx.build().unwrap();
    let source = loaded.source(file).unwrap();

    for offset in 8..14 {
        assert_eq!(
            loaded.engine().resolve_position(source, offset),
            Err(QueryError::PositionNotAnIdentifier { offset })
        );
    }
}

#[test]
fn offsets_zero_through_length_are_valid() {
    let (loaded, file) = padded();
    let source = loaded.source(file).unwrap();
    let engine = loaded.engine();
    let len = source.len();
    assert_eq!(len, 125);

    assert!(engine.locate(source, 0).is_ok());
    assert_eq!(engine.locate(source, len), Ok(None));
    assert_eq!(
        engine.resolve_position(source, len + 1),
        Err(QueryError::InvalidOffset {
            offset: len + 1,
            len
        })
    );
}

#[test]
fn empty_file() {
    let mut fx = Fixture::new("p");
    let file = fx.file("empty.go", "").unwrap();
    let loaded = fx.build().unwrap();
    let source = loaded.source(file).unwrap();
    let engine = loaded.engine();

    assert_eq!(
        engine.resolve_position(source, 0),
        Err(QueryError::PositionNotAnIdentifier { offset: 0 })
    );
    assert_eq!(
        engine.resolve_position(source, 1),
        Err(QueryError::InvalidOffset { offset: 1, len: 0 })
    );
    assert_eq!(engine.all_identifiers(source).count(), 0);
}
