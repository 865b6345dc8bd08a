//! Query engine configuration.

use seek_ir::ColumnEncoding;

/// Settings for a [`QueryEngine`](crate::QueryEngine).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueryConfig {
    /// Unit of the column in line/column queries and rendered positions.
    pub column_encoding: ColumnEncoding,
    /// Batches with at least this many offsets are resolved in parallel.
    pub parallel_threshold: usize,
}

impl QueryConfig {
    pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

    #[must_use]
    pub fn with_column_encoding(mut self, encoding: ColumnEncoding) -> Self {
        self.column_encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            column_encoding: ColumnEncoding::Char,
            parallel_threshold: Self::DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}
