//! Definitions: the declarations identifiers resolve to.

use std::fmt;

use seek_ir::{FileId, Name, Span};

/// Index of a [`Definition`] within its [`ObjectTable`](crate::ObjectTable).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct DefId(u32);

impl DefId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        DefId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for DefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DefId({})", self.0)
    }
}

/// What sort of entity a definition introduces.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefKind {
    /// Imported package name.
    Package,
    Const,
    TypeName,
    Var,
    /// Function parameter or method receiver.
    Param,
    /// Struct field.
    Field,
    Func,
    Method,
    Label,
    /// Predeclared function such as `len` or `append`.
    Builtin,
    /// A declaring occurrence the analyzer attached no object to, such as a
    /// package clause name or the blank identifier.
    Unclassified,
}

impl DefKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DefKind::Package => "package",
            DefKind::Const => "const",
            DefKind::TypeName => "type",
            DefKind::Var => "var",
            DefKind::Param => "param",
            DefKind::Field => "field",
            DefKind::Func => "func",
            DefKind::Method => "method",
            DefKind::Label => "label",
            DefKind::Builtin => "builtin",
            DefKind::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for DefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a definition is declared: the span of its declaring identifier.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeclSite {
    pub file: FileId,
    pub span: Span,
}

impl DeclSite {
    #[inline]
    pub const fn new(file: FileId, span: Span) -> Self {
        DeclSite { file, span }
    }

    /// Byte offset of the declaring identifier.
    #[inline]
    pub const fn offset(self) -> u32 {
        self.span.start
    }
}

/// A declared entity.
///
/// Many identifiers may resolve to the same definition. Universe objects
/// (predeclared types and functions) have no site.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Definition {
    pub name: Name,
    pub kind: DefKind,
    pub site: Option<DeclSite>,
    /// Path of the declaring package; `None` for universe objects.
    pub package: Option<Name>,
}

impl Definition {
    /// A definition declared at `site`, with no package recorded yet.
    pub fn new(name: Name, kind: DefKind, site: DeclSite) -> Self {
        Definition {
            name,
            kind,
            site: Some(site),
            package: None,
        }
    }

    /// A predeclared object with no source position.
    pub fn universe(name: Name, kind: DefKind) -> Self {
        Definition {
            name,
            kind,
            site: None,
            package: None,
        }
    }

    #[must_use]
    pub fn in_package(mut self, package: Name) -> Self {
        self.package = Some(package);
        self
    }

    #[inline]
    pub fn is_universe(&self) -> bool {
        self.site.is_none()
    }

    /// Whether this definition was declared outside `scope`.
    ///
    /// Universe objects belong to no package and are never imported.
    pub fn is_imported(&self, scope: Name) -> bool {
        self.package.is_some_and(|package| package != scope)
    }

    #[inline]
    pub fn offset(&self) -> Option<u32> {
        self.site.map(DeclSite::offset)
    }
}
