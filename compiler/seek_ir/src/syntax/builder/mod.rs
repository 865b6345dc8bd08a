//! Validating builder for [`SyntaxTree`]s.
//!
//! External parsers feed nodes in preorder: `open` a node, add its children
//! (`leaf` or nested `open`/`close`), then `close` it. Every structural
//! invariant is checked as the node is attached, so a rejected call leaves
//! the builder unchanged.

use smallvec::SmallVec;

use super::{Node, NodeId, NodeKind, NodeRange, SyntaxTree};
use crate::Span;

/// Structural violation reported by [`TreeBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("node span {span} ends before it starts")]
    InvertedSpan { span: Span },
    #[error("node span {span} is not contained in its parent {parent}")]
    NotContained { span: Span, parent: Span },
    #[error("node span {span} overlaps or precedes its previous sibling {previous}")]
    SiblingOverlap { span: Span, previous: Span },
    #[error("root span {span} extends past the end of the text ({len})")]
    OutOfBounds { span: Span, len: u32 },
    #[error("second root node {span}; a tree has exactly one root")]
    MultipleRoots { span: Span },
    #[error("`close` without a matching `open`")]
    UnbalancedClose,
    #[error("{open} node(s) still open")]
    Unclosed { open: usize },
    #[error("tree has no nodes")]
    Empty,
    #[error("too many nodes for a u32 index")]
    TooManyNodes,
}

struct Frame {
    node: NodeId,
    kids: SmallVec<[NodeId; 8]>,
}

/// Incremental builder for a [`SyntaxTree`].
pub struct TreeBuilder {
    text_len: u32,
    nodes: Vec<Node>,
    children: Vec<NodeId>,
    stack: Vec<Frame>,
}

impl TreeBuilder {
    /// Create a builder for a file of `text_len` bytes.
    pub fn new(text_len: u32) -> Self {
        TreeBuilder {
            text_len,
            nodes: Vec::new(),
            children: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// Open a node; subsequent nodes become its children until `close`.
    pub fn open(&mut self, kind: NodeKind, span: Span) -> Result<NodeId, TreeError> {
        let id = self.attach(kind, span)?;
        self.stack.push(Frame {
            node: id,
            kids: SmallVec::new(),
        });
        Ok(id)
    }

    /// Add a node without children.
    pub fn leaf(&mut self, kind: NodeKind, span: Span) -> Result<NodeId, TreeError> {
        self.attach(kind, span)
    }

    /// Close the most recently opened node.
    pub fn close(&mut self) -> Result<NodeId, TreeError> {
        let frame = self.stack.pop().ok_or(TreeError::UnbalancedClose)?;
        let start = u32::try_from(self.children.len()).map_err(|_| TreeError::TooManyNodes)?;
        let len = u32::try_from(frame.kids.len()).map_err(|_| TreeError::TooManyNodes)?;
        self.children.extend_from_slice(&frame.kids);
        self.nodes[frame.node.index()].children = NodeRange { start, len };
        Ok(frame.node)
    }

    /// Number of currently open nodes.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Finish the tree. Every opened node must have been closed.
    pub fn finish(self) -> Result<SyntaxTree, TreeError> {
        if !self.stack.is_empty() {
            return Err(TreeError::Unclosed {
                open: self.stack.len(),
            });
        }
        if self.nodes.is_empty() {
            return Err(TreeError::Empty);
        }
        Ok(SyntaxTree {
            nodes: self.nodes,
            children: self.children,
        })
    }

    fn attach(&mut self, kind: NodeKind, span: Span) -> Result<NodeId, TreeError> {
        if span.is_inverted() {
            return Err(TreeError::InvertedSpan { span });
        }
        let id = u32::try_from(self.nodes.len())
            .ok()
            .filter(|&raw| raw != u32::MAX)
            .map(NodeId::new)
            .ok_or(TreeError::TooManyNodes)?;

        let parent = if let Some(frame) = self.stack.last_mut() {
            let parent_span = self.nodes[frame.node.index()].span;
            if !parent_span.contains_span(span) {
                return Err(TreeError::NotContained {
                    span,
                    parent: parent_span,
                });
            }
            if let Some(&prev) = frame.kids.last() {
                let previous = self.nodes[prev.index()].span;
                if !previous.precedes(span) {
                    return Err(TreeError::SiblingOverlap { span, previous });
                }
            }
            frame.kids.push(id);
            frame.node
        } else {
            if !self.nodes.is_empty() {
                return Err(TreeError::MultipleRoots { span });
            }
            if span.end > self.text_len {
                return Err(TreeError::OutOfBounds {
                    span,
                    len: self.text_len,
                });
            }
            NodeId::NONE
        };

        self.nodes.push(Node {
            kind,
            span,
            parent,
            children: NodeRange::EMPTY,
        });
        Ok(id)
    }
}
