//! Identifier → definition lookup against an [`ObjectTable`].

use seek_ir::{IdentRole, Identifier, OccurrenceId};
use seek_sema::{DeclSite, DefId, DefKind, Definition, ObjectTable};

use crate::QueryError;

/// Resolves identifiers of one scope to their definitions.
///
/// A pure lookup: the same identifier always yields the same definition.
#[derive(Copy, Clone, Debug)]
pub struct DefinitionResolver<'t> {
    table: &'t ObjectTable,
}

impl<'t> DefinitionResolver<'t> {
    pub fn new(table: &'t ObjectTable) -> Self {
        DefinitionResolver { table }
    }

    pub fn table(&self) -> &'t ObjectTable {
        self.table
    }

    /// The definition `ident` declares or refers to.
    ///
    /// A declaring occurrence the table has no object for (a package clause
    /// name, the blank identifier) resolves to itself as an
    /// [`Unclassified`](DefKind::Unclassified) definition in this scope.
    pub fn resolve(&self, ident: &Identifier) -> Result<Definition, QueryError> {
        match self.lookup(ident)? {
            Some(id) => self
                .table
                .definition(id)
                .copied()
                .ok_or_else(|| unresolved(ident)),
            None => Ok(self.self_definition(ident)),
        }
    }

    /// Use occurrences of the definition `ident` resolves to, in source
    /// order. Self-resolving declarations have none.
    pub fn references(&self, ident: &Identifier) -> Result<&'t [OccurrenceId], QueryError> {
        Ok(self
            .lookup(ident)?
            .map(|id| self.table.uses_of(id))
            .unwrap_or_default())
    }

    /// Table entry for `ident`; `Ok(None)` for a declaration with no object.
    ///
    /// Identifiers from another source map are out of scope even when their
    /// file id happens to be covered.
    fn lookup(&self, ident: &Identifier) -> Result<Option<DefId>, QueryError> {
        if ident.origin != self.table.source_map() || !self.table.covers(ident.file()) {
            return Err(QueryError::OutOfScope { file: ident.file() });
        }
        match ident.role {
            IdentRole::Use => self
                .table
                .use_of(ident.occurrence)
                .map(Some)
                .ok_or_else(|| unresolved(ident)),
            IdentRole::Declaring => Ok(self.table.def_of(ident.occurrence)),
        }
    }

    fn self_definition(&self, ident: &Identifier) -> Definition {
        Definition::new(
            ident.name,
            DefKind::Unclassified,
            DeclSite::new(ident.file(), ident.span),
        )
        .in_package(self.table.scope())
    }
}

fn unresolved(ident: &Identifier) -> QueryError {
    QueryError::UnresolvedIdentifier {
        occurrence: ident.occurrence,
        name: ident.name,
        span: ident.span,
    }
}
