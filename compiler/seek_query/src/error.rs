//! Query errors.

use seek_ir::{FileId, Name, OccurrenceId, Span};

/// Why a query produced no definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// The offset lies past the end of the file.
    #[error("offset {offset} is outside the file (length {len})")]
    InvalidOffset { offset: u32, len: u32 },
    /// No identifier occupies the offset.
    #[error("no identifier at offset {offset}")]
    PositionNotAnIdentifier { offset: u32 },
    /// A use identifier the object table has no entry for.
    #[error("use of {name:?} at {span:?} has no definition")]
    UnresolvedIdentifier {
        occurrence: OccurrenceId,
        name: Name,
        span: Span,
    },
    /// The file is not part of the object table's scope.
    #[error("{file:?} is not covered by the object table")]
    OutOfScope { file: FileId },
    /// A line/column pair that does not name a position in the file.
    #[error("no position at line {line}, column {column}")]
    InvalidLineColumn { line: u32, column: u32 },
}

impl QueryError {
    /// Whether this is the ordinary "nothing here" outcome rather than a
    /// failure: the caller asked about whitespace, a keyword or a literal.
    pub fn is_no_result(&self) -> bool {
        matches!(self, QueryError::PositionNotAnIdentifier { .. })
    }
}
