//! Syntax model consumed from an external parser.
//!
//! # Layout
//!
//! Nodes live in one flat arena indexed by [`NodeId`]. Ids are assigned in
//! preorder, and siblings are sorted by start offset, so id order is source
//! order. Each node's children are a contiguous [`NodeRange`] into a shared
//! child list.
//!
//! # Invariants
//!
//! Enforced by [`TreeBuilder`] while the tree is built:
//! - sibling spans are ordered and non-overlapping (`prev.end <= next.start`)
//! - a child's span is contained in its parent's span
//! - the root span lies within the file text

mod builder;

use std::fmt;

pub use builder::{TreeBuilder, TreeError};

use crate::{IdentRole, Name, Span};

/// Index into a [`SyntaxTree`]'s node arena.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Sentinel used as the parent of the root.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// The root of every tree.
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_some() {
            write!(f, "NodeId({})", self.0)
        } else {
            write!(f, "NodeId::NONE")
        }
    }
}

/// Range of child ids in the shared child list.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct NodeRange {
    start: u32,
    len: u32,
}

impl NodeRange {
    pub const EMPTY: NodeRange = NodeRange { start: 0, len: 0 };

    #[inline]
    fn to_range(self) -> std::ops::Range<usize> {
        self.start as usize..(self.start + self.len) as usize
    }
}

impl fmt::Debug for NodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeRange({}..{})", self.start, self.start + self.len)
    }
}

/// Kind tag of a syntax node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NodeKind {
    /// Whole-file root.
    File,
    /// Top-level declaration.
    Decl,
    /// Bracketed group: block, parameter list, composite literal body.
    Block,
    Stmt,
    Expr,
    Type,
    /// String, number or other literal token.
    Literal,
    Comment,
    /// Identifier occurrence.
    Ident { name: Name, role: IdentRole },
}

impl NodeKind {
    #[inline]
    pub fn is_ident(self) -> bool {
        matches!(self, NodeKind::Ident { .. })
    }
}

/// A syntax node.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    parent: NodeId,
    children: NodeRange,
}

impl Node {
    /// Parent node, `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent.is_some().then_some(self.parent)
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.len == 0
    }
}

/// An immutable, validated syntax tree.
///
/// Always holds at least the root node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    children: Vec<NodeId>,
}

impl SyntaxTree {
    /// Root node id.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Span of the root node.
    #[inline]
    pub fn span(&self) -> Span {
        self.nodes.first().map(|n| n.span).unwrap_or_default()
    }

    /// Get a node by id.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree. Use [`get`](Self::get)
    /// for ids of unknown origin.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Get a node by id, or `None` if the id is out of range.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Children of `id` in source order.
    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id)
            .and_then(|node| self.children.get(node.children.to_range()))
            .unwrap_or_default()
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.get(id).and_then(Node::parent), |&parent| {
            self.get(parent).and_then(Node::parent)
        })
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes in preorder (= source order).
    pub fn iter(&self) -> Nodes<'_> {
        Nodes {
            inner: self.nodes.iter(),
            next: 0,
        }
    }
}

/// Preorder iterator over `(NodeId, &Node)`.
#[derive(Clone, Debug)]
pub struct Nodes<'a> {
    inner: std::slice::Iter<'a, Node>,
    next: u32,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.inner.next()?;
        let id = NodeId::new(self.next);
        self.next += 1;
        Some((id, node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Nodes<'_> {}
