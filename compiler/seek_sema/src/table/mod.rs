//! The semantic object table for one resolution scope.
//!
//! An [`ObjectTable`] is produced once by semantic analysis of a package and
//! only read afterwards. It keeps two maps keyed by identifier occurrence:
//! `defs` for declaring occurrences and `uses` for references, both pointing
//! at the table's [`Definition`]s.
//!
//! [`TableBuilder::finish`] checks the table against the files it covers.
//! Every use identifier of a covered file must have exactly one `uses` entry;
//! a table that fails this is still handed back inside [`IncompleteTable`] so
//! callers can keep working with what was resolved.
//!
//! A table answers only for the [`SourceMap`] it was finished against;
//! [`ObjectTable::source_map`] names that map.

use rustc_hash::{FxHashMap, FxHashSet};
use seek_ir::{FileId, IdentRole, Name, OccurrenceId, SourceMap, SourceMapId, Span};

use crate::{DefId, Definition};

/// One way a recorded table disagrees with the source it describes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableProblem {
    /// A use identifier in a covered file has no `uses` entry.
    #[error("use of {name:?} at {span:?} in {file:?} has no definition", file = .occurrence.file)]
    UnresolvedUse {
        occurrence: OccurrenceId,
        name: Name,
        span: Span,
    },
    /// An entry names a node that is not an identifier of a covered file.
    #[error("{occurrence:?} is not an identifier in a covered file")]
    UnknownOccurrence { occurrence: OccurrenceId },
    /// A declaring occurrence was recorded as a use, or the other way round.
    #[error("{occurrence:?} is a {found} but was recorded as a {expected}")]
    RoleMismatch {
        occurrence: OccurrenceId,
        expected: IdentRole,
        found: IdentRole,
    },
    /// The same occurrence was recorded twice with different definitions.
    ///
    /// Neither entry is kept.
    #[error("{occurrence:?} recorded as both {first:?} and {second:?}")]
    DuplicateEntry {
        occurrence: OccurrenceId,
        first: DefId,
        second: DefId,
    },
    /// An entry points at a definition that was never declared.
    #[error("{occurrence:?} points at undeclared {def:?}")]
    UnknownDefinition { occurrence: OccurrenceId, def: DefId },
    /// A covered file is not in the source map.
    #[error("covered file {file:?} is not loaded")]
    MissingFile { file: FileId },
    /// More definitions than a `DefId` can address.
    #[error("too many definitions for a u32 index")]
    TooManyDefinitions,
}

/// A table that failed validation, together with everything that did check.
///
/// `table` holds only the entries that passed, so it is safe to query.
#[derive(Debug, thiserror::Error)]
#[error("object table for {scope:?} is incomplete: {} problem(s)", .problems.len(), scope = .table.scope())]
pub struct IncompleteTable {
    pub table: ObjectTable,
    pub problems: Vec<TableProblem>,
}

/// Read-only def/use tables for one scope.
#[derive(Debug, Clone)]
pub struct ObjectTable {
    scope: Name,
    source_map: SourceMapId,
    files: FxHashSet<FileId>,
    definitions: Vec<Definition>,
    defs: FxHashMap<OccurrenceId, DefId>,
    uses: FxHashMap<OccurrenceId, DefId>,
    /// Reverse of `uses`, each list in source order.
    uses_of: FxHashMap<DefId, Vec<OccurrenceId>>,
}

impl ObjectTable {
    /// Package path of the scope this table was built for.
    #[inline]
    pub fn scope(&self) -> Name {
        self.scope
    }

    /// The source map this table was validated against.
    #[inline]
    pub fn source_map(&self) -> SourceMapId {
        self.source_map
    }

    /// Whether `file` belongs to this table's scope.
    ///
    /// File ids are per map; pair this with a [`source_map`](Self::source_map)
    /// check for files of unknown origin.
    #[inline]
    pub fn covers(&self, file: FileId) -> bool {
        self.files.contains(&file)
    }

    #[inline]
    pub fn definition(&self, id: DefId) -> Option<&Definition> {
        self.definitions.get(id.index())
    }

    /// All definitions in declaration order.
    pub fn definitions(&self) -> impl ExactSizeIterator<Item = (DefId, &Definition)> + '_ {
        self.definitions
            .iter()
            .enumerate()
            .map(|(index, def)| (def_id(index), def))
    }

    /// Definition introduced by a declaring occurrence.
    #[inline]
    pub fn def_of(&self, occurrence: OccurrenceId) -> Option<DefId> {
        self.defs.get(&occurrence).copied()
    }

    /// Definition a use occurrence refers to.
    #[inline]
    pub fn use_of(&self, occurrence: OccurrenceId) -> Option<DefId> {
        self.uses.get(&occurrence).copied()
    }

    /// Definition an occurrence declares or refers to, declarations first.
    pub fn object_of(&self, occurrence: OccurrenceId) -> Option<DefId> {
        self.def_of(occurrence).or_else(|| self.use_of(occurrence))
    }

    /// Use occurrences of `id`, in source order.
    pub fn uses_of(&self, id: DefId) -> &[OccurrenceId] {
        self.uses_of
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of definitions.
    #[inline]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "TableBuilder::try_declare keeps the count within u32"
)]
fn def_id(index: usize) -> DefId {
    DefId::new(index as u32)
}

/// Id for the definition at `index`, if a `DefId` can address it.
fn next_def_id(index: usize) -> Result<DefId, TableProblem> {
    u32::try_from(index)
        .map(DefId::new)
        .map_err(|_| TableProblem::TooManyDefinitions)
}

/// Collects the output of semantic analysis for one scope.
///
/// Entries are checked in [`finish`](Self::finish); the only problem caught
/// eagerly is recording the same occurrence twice.
#[derive(Debug)]
pub struct TableBuilder {
    scope: Name,
    files: FxHashSet<FileId>,
    definitions: Vec<Definition>,
    defs: FxHashMap<OccurrenceId, DefId>,
    uses: FxHashMap<OccurrenceId, DefId>,
    /// Occurrences recorded with two different definitions.
    conflicts: FxHashSet<OccurrenceId>,
    problems: Vec<TableProblem>,
}

impl TableBuilder {
    /// Start a table for the package with path `scope`.
    pub fn new(scope: Name) -> Self {
        TableBuilder {
            scope,
            files: FxHashSet::default(),
            definitions: Vec::new(),
            defs: FxHashMap::default(),
            uses: FxHashMap::default(),
            conflicts: FxHashSet::default(),
            problems: Vec::new(),
        }
    }

    /// Add `file` to the scope.
    pub fn cover(&mut self, file: FileId) -> &mut Self {
        self.files.insert(file);
        self
    }

    /// Add a definition.
    ///
    /// Definitions from other packages and the universe are declared the
    /// same way; only their `site` and `package` differ.
    ///
    /// # Panics
    /// Panics past `u32::MAX + 1` definitions. Use
    /// [`try_declare`](Self::try_declare) to handle that case.
    pub fn declare(&mut self, def: Definition) -> DefId {
        self.try_declare(def).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Add a definition, or fail with [`TableProblem::TooManyDefinitions`].
    pub fn try_declare(&mut self, def: Definition) -> Result<DefId, TableProblem> {
        let id = next_def_id(self.definitions.len())?;
        self.definitions.push(def);
        Ok(id)
    }

    /// Record that the declaring `occurrence` introduces `def`.
    pub fn record_def(&mut self, occurrence: OccurrenceId, def: DefId) -> &mut Self {
        if let Some(problem) = record(&mut self.defs, occurrence, def) {
            self.conflicts.insert(occurrence);
            self.problems.push(problem);
        }
        self
    }

    /// Record that the use `occurrence` refers to `def`.
    pub fn record_use(&mut self, occurrence: OccurrenceId, def: DefId) -> &mut Self {
        if let Some(problem) = record(&mut self.uses, occurrence, def) {
            self.conflicts.insert(occurrence);
            self.problems.push(problem);
        }
        self
    }

    /// Validate against `sources` and freeze.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(files = self.files.len(), definitions = self.definitions.len())
    )]
    pub fn finish(self, sources: &SourceMap) -> Result<ObjectTable, IncompleteTable> {
        let TableBuilder {
            scope,
            files,
            definitions,
            mut defs,
            mut uses,
            conflicts,
            mut problems,
        } = self;

        // A conflicting occurrence has no trustworthy answer
        defs.retain(|occurrence, _| !conflicts.contains(occurrence));
        uses.retain(|occurrence, _| !conflicts.contains(occurrence));

        let mut covered: Vec<FileId> = files.iter().copied().collect();
        covered.sort_unstable();
        for &file in &covered {
            if sources.file(file).is_none() {
                problems.push(TableProblem::MissingFile { file });
            }
        }

        let check = Checker {
            sources,
            files: &files,
            definitions: definitions.len(),
        };
        let defs = check.entries(defs, IdentRole::Declaring, &mut problems);
        let uses = check.entries(uses, IdentRole::Use, &mut problems);

        for source in covered.iter().filter_map(|&file| sources.file(file)) {
            for ident in source.identifiers().filter(|ident| ident.is_use()) {
                let occurrence = ident.occurrence;
                if !uses.contains_key(&occurrence) && !conflicts.contains(&occurrence) {
                    problems.push(TableProblem::UnresolvedUse {
                        occurrence: ident.occurrence,
                        name: ident.name,
                        span: ident.span,
                    });
                }
            }
        }

        let mut uses_of: FxHashMap<DefId, Vec<OccurrenceId>> = FxHashMap::default();
        for (&occurrence, &def) in &uses {
            uses_of.entry(def).or_default().push(occurrence);
        }
        for list in uses_of.values_mut() {
            list.sort_unstable();
        }

        let table = ObjectTable {
            scope,
            source_map: sources.id(),
            files,
            definitions,
            defs,
            uses,
            uses_of,
        };
        tracing::debug!(
            defs = table.defs.len(),
            uses = table.uses.len(),
            problems = problems.len(),
            "object table built"
        );

        if problems.is_empty() {
            Ok(table)
        } else {
            Err(IncompleteTable { table, problems })
        }
    }
}

/// Insert an entry; a different definition for a recorded occurrence is a
/// conflict and leaves the map unchanged.
fn record(
    map: &mut FxHashMap<OccurrenceId, DefId>,
    occurrence: OccurrenceId,
    def: DefId,
) -> Option<TableProblem> {
    match map.get(&occurrence) {
        Some(&first) if first != def => Some(TableProblem::DuplicateEntry {
            occurrence,
            first,
            second: def,
        }),
        Some(_) => None,
        None => {
            map.insert(occurrence, def);
            None
        }
    }
}

/// Entry validation shared by the def and use maps.
struct Checker<'a> {
    sources: &'a SourceMap,
    files: &'a FxHashSet<FileId>,
    definitions: usize,
}

impl Checker<'_> {
    /// Keep the entries that point at a declared definition and at an
    /// identifier of the expected role in a covered file.
    fn entries(
        &self,
        map: FxHashMap<OccurrenceId, DefId>,
        expected: IdentRole,
        problems: &mut Vec<TableProblem>,
    ) -> FxHashMap<OccurrenceId, DefId> {
        let mut entries: Vec<(OccurrenceId, DefId)> = map.into_iter().collect();
        entries.sort_unstable();

        let mut kept = FxHashMap::default();
        kept.reserve(entries.len());
        for (occurrence, def) in entries {
            match self.check(occurrence, def, expected) {
                Ok(()) => {
                    kept.insert(occurrence, def);
                }
                Err(problem) => problems.push(problem),
            }
        }
        kept
    }

    fn check(
        &self,
        occurrence: OccurrenceId,
        def: DefId,
        expected: IdentRole,
    ) -> Result<(), TableProblem> {
        if def.index() >= self.definitions {
            return Err(TableProblem::UnknownDefinition { occurrence, def });
        }
        let ident = Some(occurrence.file)
            .filter(|file| self.files.contains(file))
            .and_then(|file| self.sources.file(file))
            .and_then(|source| source.identifier(occurrence.node))
            .ok_or(TableProblem::UnknownOccurrence { occurrence })?;
        if ident.role != expected {
            return Err(TableProblem::RoleMismatch {
                occurrence,
                expected,
                found: ident.role,
            });
        }
        Ok(())
    }
}
