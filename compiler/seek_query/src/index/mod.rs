//! Offset → identifier lookup over one file's syntax tree.
//!
//! Siblings are sorted and non-overlapping, so at each level at most one
//! child contains the offset and binary search finds it. A lookup costs
//! O(depth · log fanout).

use seek_ir::{Identifier, NodeId, SourceFile};

use crate::QueryError;

/// Read-only view of a file for position lookups.
#[derive(Copy, Clone, Debug)]
pub struct PositionIndex<'f> {
    file: &'f SourceFile,
}

impl<'f> PositionIndex<'f> {
    pub fn new(file: &'f SourceFile) -> Self {
        PositionIndex { file }
    }

    /// The identifier occupying `offset`, if any.
    ///
    /// Spans are half-open, so an offset equal to an identifier's end belongs
    /// to whatever follows it. When identifiers nest, the deepest one on the
    /// path to the offset wins. Offsets `0..=len` are valid; anything larger
    /// is [`QueryError::InvalidOffset`].
    pub fn locate(&self, offset: u32) -> Result<Option<Identifier>, QueryError> {
        let len = self.file.len();
        if offset > len {
            return Err(QueryError::InvalidOffset { offset, len });
        }

        let tree = self.file.tree();
        let root = tree.root();
        if !tree.node(root).span.contains(offset) {
            return Ok(None);
        }

        let mut found = self.file.identifier(root);
        let mut current = root;
        while let Some(child) = self.child_containing(current, offset) {
            if let Some(ident) = self.file.identifier(child) {
                found = Some(ident);
            }
            current = child;
        }

        tracing::trace!(
            file = self.file.id().raw(),
            offset,
            found = found.is_some(),
            "locate"
        );
        Ok(found)
    }

    /// The child of `parent` whose span contains `offset`.
    fn child_containing(&self, parent: NodeId, offset: u32) -> Option<NodeId> {
        let tree = self.file.tree();
        let children = tree.children(parent);
        // Ends are non-decreasing across sorted, non-overlapping siblings
        let at = children.partition_point(|&child| tree.node(child).span.end <= offset);
        children
            .get(at)
            .copied()
            .filter(|&child| tree.node(child).span.contains(offset))
    }
}
