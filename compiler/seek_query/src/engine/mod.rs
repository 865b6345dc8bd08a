//! The query surface: position in, definition out.
//!
//! [`QueryEngine`] composes the [`PositionIndex`] and the
//! [`DefinitionResolver`] for one [`ObjectTable`]. It holds nothing but a
//! shared reference to the table and its configuration, so one engine can
//! serve any number of threads.

use rayon::prelude::*;
use seek_ir::{Identifier, Identifiers, OccurrenceId, Position, SourceFile, SourceMap};
use seek_sema::{Definition, ObjectTable};

use crate::{DefinitionResolver, PositionIndex, QueryConfig, QueryError};

/// Answers go-to-definition queries for the files of one scope.
#[derive(Copy, Clone, Debug)]
pub struct QueryEngine<'t> {
    resolver: DefinitionResolver<'t>,
    config: QueryConfig,
}

impl<'t> QueryEngine<'t> {
    pub fn new(table: &'t ObjectTable) -> Self {
        Self::with_config(table, QueryConfig::default())
    }

    pub fn with_config(table: &'t ObjectTable, config: QueryConfig) -> Self {
        QueryEngine {
            resolver: DefinitionResolver::new(table),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    #[inline]
    pub fn table(&self) -> &'t ObjectTable {
        self.resolver.table()
    }

    /// The identifier at `offset` in `file`, without resolving it.
    pub fn locate(&self, file: &SourceFile, offset: u32) -> Result<Option<Identifier>, QueryError> {
        PositionIndex::new(file).locate(offset)
    }

    /// Resolve the identifier at `offset` to its definition.
    ///
    /// Whitespace, keywords, literals and comments are
    /// [`QueryError::PositionNotAnIdentifier`].
    pub fn resolve_position(
        &self,
        file: &SourceFile,
        offset: u32,
    ) -> Result<Definition, QueryError> {
        let ident = self
            .locate(file, offset)?
            .ok_or(QueryError::PositionNotAnIdentifier { offset })?;
        let resolved = self.resolver.resolve(&ident);
        tracing::trace!(
            file = file.id().raw(),
            offset,
            node = ident.node().raw(),
            ok = resolved.is_ok(),
            "resolve_position"
        );
        resolved
    }

    /// Every identifier of `file` in source order.
    ///
    /// Lazy; clone the iterator or call again to restart.
    pub fn all_identifiers<'f>(&self, file: &'f SourceFile) -> Identifiers<'f> {
        file.identifiers()
    }

    /// Resolve the identifier at a 1-based line and column, counted in the
    /// configured [`ColumnEncoding`](seek_ir::ColumnEncoding).
    pub fn resolve_line_col(
        &self,
        file: &SourceFile,
        line: u32,
        column: u32,
    ) -> Result<Definition, QueryError> {
        let offset = file
            .offset_at(line, column, self.config.column_encoding)
            .ok_or(QueryError::InvalidLineColumn { line, column })?;
        self.resolve_position(file, offset)
    }

    /// Resolve many offsets of one file. Results are in input order.
    ///
    /// Batches of at least `parallel_threshold` offsets run on the rayon
    /// thread pool.
    pub fn resolve_batch(
        &self,
        file: &SourceFile,
        offsets: &[u32],
    ) -> Vec<Result<Definition, QueryError>> {
        if offsets.len() >= self.config.parallel_threshold {
            offsets
                .par_iter()
                .map(|&offset| self.resolve_position(file, offset))
                .collect()
        } else {
            offsets
                .iter()
                .map(|&offset| self.resolve_position(file, offset))
                .collect()
        }
    }

    /// Uses of the definition the identifier at `offset` resolves to.
    pub fn find_references(
        &self,
        file: &SourceFile,
        offset: u32,
    ) -> Result<&'t [OccurrenceId], QueryError> {
        let ident = self
            .locate(file, offset)?
            .ok_or(QueryError::PositionNotAnIdentifier { offset })?;
        self.resolver.references(&ident)
    }

    /// Where `def` is declared, as `path:line:column`.
    ///
    /// `None` for universe objects and for a `sources` other than the one the
    /// table was built against.
    pub fn render(&self, sources: &SourceMap, def: &Definition) -> Option<Position> {
        if sources.id() != self.table().source_map() {
            return None;
        }
        let site = def.site?;
        sources.position(site.file, site.offset(), self.config.column_encoding)
    }
}
