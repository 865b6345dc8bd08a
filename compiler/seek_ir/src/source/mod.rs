//! Source files and the file set that owns them.
//!
//! A [`SourceMap`] plays the role of a compiler's file set: it assigns dense
//! [`FileId`]s, owns each file's text together with its syntax tree, and
//! renders byte offsets as `path:line:column` positions.

mod lines;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

pub use lines::{ColumnEncoding, LineOffsetTable};

use crate::{Identifier, Identifiers, NodeId, SharedInterner, Span, SyntaxTree};

/// Index of a file within its [`SourceMap`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct FileId(u32);

impl FileId {
    /// Create a new `FileId`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        FileId(index)
    }

    /// Get the index into the file set.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

/// Counter for generating unique source map ids.
static SOURCE_MAP_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Identity of one [`SourceMap`].
///
/// `FileId`s are dense per map, so two maps both have a `FileId(0)`. The map
/// id tells them apart. Ids are unique among the first 2^32 maps created in
/// a process.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct SourceMapId(u32);

impl SourceMapId {
    fn fresh() -> Self {
        SourceMapId(SOURCE_MAP_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for SourceMapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceMapId({})", self.0)
    }
}

/// Error when adding a file to a [`SourceMap`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The text does not fit the `u32` offset space.
    #[error("`{}` is too large to index ({len} bytes)", .path.display())]
    TooLarge { path: PathBuf, len: usize },
    /// The syntax tree covers bytes past the end of the text.
    #[error("syntax tree for `{}` ends at {tree_end}, past the end of the text ({len})", .path.display())]
    TreeOutOfBounds {
        path: PathBuf,
        tree_end: u32,
        len: u32,
    },
    /// More files than a `FileId` can address.
    #[error("too many source files")]
    TooManyFiles,
}

/// A loaded source file: path, text, line table and syntax tree.
///
/// Immutable once added to a [`SourceMap`]; the tree never outlives it.
#[derive(Debug)]
pub struct SourceFile {
    id: FileId,
    map: SourceMapId,
    path: PathBuf,
    text: String,
    lines: LineOffsetTable,
    tree: SyntaxTree,
}

impl SourceFile {
    #[inline]
    pub fn id(&self) -> FileId {
        self.id
    }

    /// The map this file was added to.
    #[inline]
    pub fn source_map(&self) -> SourceMapId {
        self.map
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the text in bytes.
    #[inline]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "length is checked against u32::MAX when the file is added"
    )]
    pub fn len(&self) -> u32 {
        self.text.len() as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[inline]
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    #[inline]
    pub fn lines(&self) -> &LineOffsetTable {
        &self.lines
    }

    /// Source text covered by `span`, if it lies on character boundaries.
    pub fn slice(&self, span: Span) -> Option<&str> {
        self.text.get(span.to_range())
    }

    /// All identifiers of this file in source order.
    ///
    /// The iterator is lazy and cheap to clone; calling this again restarts
    /// from the beginning.
    pub fn identifiers(&self) -> Identifiers<'_> {
        Identifiers::new(self.map, self.id, &self.tree)
    }

    /// The identifier at `node`, if that node is one.
    pub fn identifier(&self, node: NodeId) -> Option<Identifier> {
        let node_ref = self.tree.get(node)?;
        Identifier::from_node(self.map, self.id, node, node_ref)
    }

    /// 1-based (line, column) of `offset`.
    pub fn line_col(&self, offset: u32, encoding: ColumnEncoding) -> (u32, u32) {
        self.lines.offset_to_line_col(&self.text, offset, encoding)
    }

    /// Byte offset of a 1-based (line, column) position.
    pub fn offset_at(&self, line: u32, column: u32, encoding: ColumnEncoding) -> Option<u32> {
        self.lines
            .line_col_to_offset(&self.text, line, column, encoding)
    }
}

/// A rendered source position, `path:line:column`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub path: PathBuf,
    /// 1-based line.
    pub line: u32,
    /// 1-based column, in the encoding it was rendered with.
    pub column: u32,
    /// Byte offset.
    pub offset: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path.display(), self.line, self.column)
    }
}

/// The set of loaded source files.
pub struct SourceMap {
    id: SourceMapId,
    files: Vec<SourceFile>,
    interner: SharedInterner,
}

impl SourceMap {
    /// Create an empty file set with a fresh interner.
    pub fn new() -> Self {
        Self::with_interner(SharedInterner::new())
    }

    /// Create an empty file set that interns into `interner`.
    pub fn with_interner(interner: SharedInterner) -> Self {
        SourceMap {
            id: SourceMapId::fresh(),
            files: Vec::new(),
            interner,
        }
    }

    /// Identity of this file set, distinct from every other map's.
    #[inline]
    pub fn id(&self) -> SourceMapId {
        self.id
    }

    /// The interner identifier names of this file set are resolved against.
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// The id the next added file will receive.
    pub fn next_id(&self) -> Result<FileId, SourceError> {
        u32::try_from(self.files.len())
            .map(FileId::new)
            .map_err(|_| SourceError::TooManyFiles)
    }

    /// Add a parsed file.
    ///
    /// The tree must lie within the text; it is otherwise taken as built.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn add(
        &mut self,
        path: impl Into<PathBuf>,
        text: impl Into<String>,
        tree: SyntaxTree,
    ) -> Result<FileId, SourceError> {
        let path = path.into();
        let text = text.into();

        let Ok(len) = u32::try_from(text.len()) else {
            return Err(SourceError::TooLarge {
                path,
                len: text.len(),
            });
        };
        let tree_end = tree.span().end;
        if tree_end > len {
            return Err(SourceError::TreeOutOfBounds {
                path,
                tree_end,
                len,
            });
        }

        let id = self.next_id()?;
        tracing::debug!(
            file = id.raw(),
            path = %path.display(),
            len,
            nodes = tree.node_count(),
            "source file added"
        );
        let lines = LineOffsetTable::build(&text);
        self.files.push(SourceFile {
            id,
            map: self.id,
            path,
            text,
            lines,
            tree,
        });
        Ok(id)
    }

    /// Look up a file by id.
    pub fn file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.index())
    }

    /// All files in id order.
    pub fn files(&self) -> std::slice::Iter<'_, SourceFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Render an offset in `file` as a position.
    ///
    /// Returns `None` for unknown files or offsets past the end of the text.
    pub fn position(
        &self,
        file: FileId,
        offset: u32,
        encoding: ColumnEncoding,
    ) -> Option<Position> {
        let source = self.file(file)?;
        if offset > source.len() {
            return None;
        }
        let (line, column) = source.line_col(offset, encoding);
        Some(Position {
            path: source.path.clone(),
            line,
            column,
            offset,
        })
    }
}

impl fmt::Debug for SourceMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceMap")
            .field("id", &self.id)
            .field("files", &self.files.len())
            .finish_non_exhaustive()
    }
}

impl Default for SourceMap {
    fn default() -> Self {
        Self::new()
    }
}
