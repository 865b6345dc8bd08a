//! Identifier occurrences.
//!
//! An [`Identifier`] is one occurrence of a name in one file. Its
//! [`OccurrenceId`] is stable for the lifetime of the file, so the same name
//! at two offsets is two distinct identifiers.

use std::fmt;

use crate::{FileId, Name, Node, NodeId, NodeKind, Nodes, SourceMapId, Span, SyntaxTree};

/// Whether an identifier introduces a name or refers to one.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum IdentRole {
    /// Refers back to a declaration.
    Use,
    /// The point where a name is introduced.
    Declaring,
}

impl fmt::Display for IdentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentRole::Use => f.write_str("use"),
            IdentRole::Declaring => f.write_str("declaring occurrence"),
        }
    }
}

/// Stable identity of an identifier occurrence.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct OccurrenceId {
    pub file: FileId,
    pub node: NodeId,
}

impl OccurrenceId {
    #[inline]
    pub const fn new(file: FileId, node: NodeId) -> Self {
        OccurrenceId { file, node }
    }
}

/// An identifier occurrence located in a source file.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Identifier {
    pub occurrence: OccurrenceId,
    pub name: Name,
    pub span: Span,
    pub role: IdentRole,
    /// The source map whose file this occurrence is in.
    pub origin: SourceMapId,
}

impl Identifier {
    /// View `node` as an identifier, if it is one.
    pub fn from_node(origin: SourceMapId, file: FileId, id: NodeId, node: &Node) -> Option<Self> {
        match node.kind {
            NodeKind::Ident { name, role } => Some(Identifier {
                occurrence: OccurrenceId::new(file, id),
                name,
                span: node.span,
                role,
                origin,
            }),
            _ => None,
        }
    }

    #[inline]
    pub fn file(&self) -> FileId {
        self.occurrence.file
    }

    #[inline]
    pub fn node(&self) -> NodeId {
        self.occurrence.node
    }

    #[inline]
    pub fn is_use(&self) -> bool {
        self.role == IdentRole::Use
    }

    #[inline]
    pub fn is_declaring(&self) -> bool {
        self.role == IdentRole::Declaring
    }
}

/// Source-order iterator over the identifiers of one file.
///
/// Lazy and finite; clone it (or ask the file again) to restart.
#[derive(Clone, Debug)]
pub struct Identifiers<'a> {
    origin: SourceMapId,
    file: FileId,
    nodes: Nodes<'a>,
}

impl<'a> Identifiers<'a> {
    pub fn new(origin: SourceMapId, file: FileId, tree: &'a SyntaxTree) -> Self {
        Identifiers {
            origin,
            file,
            nodes: tree.iter(),
        }
    }
}

impl Iterator for Identifiers<'_> {
    type Item = Identifier;

    fn next(&mut self) -> Option<Identifier> {
        let (origin, file) = (self.origin, self.file);
        self.nodes
            .find_map(|(id, node)| Identifier::from_node(origin, file, id, node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.nodes.size_hint().1)
    }
}

impl std::iter::FusedIterator for Identifiers<'_> {}
