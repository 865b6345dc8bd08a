//! Testing utilities for the query engine.
//!
//! Parsing and semantic analysis are outside this workspace, so tests stand
//! in for both with a [`Fixture`]: it scans Go-like text into a real
//! [`SyntaxTree`](seek_ir::SyntaxTree) and lets the test say, word by word,
//! what each identifier declares or refers to.
//!
//! # Usage
//!
//! ```text
//! let mut fx = Fixture::new("main");
//! let file = fx.file("main.go", "type T int\nvar x T\n")?;
//! let int = fx.builtin("int", DefKind::TypeName);
//! let t = fx.def(file, "T", 0, DefKind::TypeName)?;
//! fx.def(file, "x", 0, DefKind::Var)?;
//! fx.refer(file, "int", 0, int)?.refer(file, "T", 1, t)?;
//!
//! let loaded = fx.build()?;
//! let def = loaded.engine().resolve_position(loaded.source(file)?, 18)?;
//! ```
//!
//! Words are addressed as `(word, nth)`: the `nth` (0-based) identifier
//! spelled `word` in the file. Keywords, literals and comments never count.

mod scan;

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use seek_ir::{
    FileId, Name, OccurrenceId, SharedInterner, SourceError, SourceFile, SourceMap, Span,
    SpanError,
};
use seek_sema::{DeclSite, DefId, DefKind, Definition, IncompleteTable, ObjectTable, TableBuilder};

pub use scan::BuildError;
use scan::{Tok, Token};

use crate::QueryEngine;

/// Error while setting up or building a fixture.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("occurrence {nth} of `{word}` not found in `{}`", .path.display())]
    WordNotFound {
        path: PathBuf,
        word: String,
        nth: usize,
    },
    #[error("{0:?} was not created by this fixture")]
    UnknownFile(FileId),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Span(#[from] SpanError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Incomplete(#[from] Box<IncompleteTable>),
}

struct FixtureFile {
    path: PathBuf,
    text: String,
    tokens: Vec<Token>,
    package: Name,
    /// Part of the fixture's scope; otherwise an imported package's file.
    covered: bool,
    declaring: FxHashSet<usize>,
    referred: FxHashSet<usize>,
}

impl FixtureFile {
    fn word(&self, token: Token) -> &str {
        &self.text[token.start..token.end]
    }

    /// Token index of the `nth` identifier spelled `word`.
    fn find(&self, word: &str, nth: usize) -> Result<usize, FixtureError> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|&(_, &token)| token.tok == Tok::Word && self.word(token) == word)
            .nth(nth)
            .map(|(index, _)| index)
            .ok_or_else(|| FixtureError::WordNotFound {
                path: self.path.clone(),
                word: word.to_owned(),
                nth,
            })
    }
}

/// Builder for a scope of scanned files and its object table.
pub struct Fixture {
    interner: SharedInterner,
    scope: Name,
    files: Vec<FixtureFile>,
    builder: TableBuilder,
    /// `(file, token, definition)` for declaring occurrences in covered files.
    defs: Vec<(usize, usize, DefId)>,
    /// `(file, token, definition)` for uses.
    uses: Vec<(usize, usize, DefId)>,
}

impl Fixture {
    /// Start a fixture for the package `scope`.
    pub fn new(scope: &str) -> Self {
        let interner = SharedInterner::new();
        let scope = interner.intern(scope);
        Fixture {
            interner,
            scope,
            files: Vec::new(),
            builder: TableBuilder::new(scope),
            defs: Vec::new(),
            uses: Vec::new(),
        }
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// Add a file to the scope.
    pub fn file(&mut self, path: impl Into<PathBuf>, text: &str) -> Result<FileId, FixtureError> {
        let id = self.push(path.into(), text, self.scope, true)?;
        self.builder.cover(id);
        Ok(id)
    }

    /// Add a file of another package.
    ///
    /// It is loaded into the source map but not covered by the table, the way
    /// an imported package's source is visible without being analyzed.
    pub fn external_file(
        &mut self,
        path: impl Into<PathBuf>,
        text: &str,
        package: &str,
    ) -> Result<FileId, FixtureError> {
        let package = self.interner.intern(package);
        self.push(path.into(), text, package, false)
    }

    fn push(
        &mut self,
        path: PathBuf,
        text: &str,
        package: Name,
        covered: bool,
    ) -> Result<FileId, FixtureError> {
        let id = u32::try_from(self.files.len())
            .map(FileId::new)
            .map_err(|_| SourceError::TooManyFiles)?;
        self.files.push(FixtureFile {
            path,
            text: text.to_owned(),
            tokens: scan::scan(text),
            package,
            covered,
            declaring: FxHashSet::default(),
            referred: FxHashSet::default(),
        });
        Ok(id)
    }

    fn get(&self, file: FileId) -> Result<&FixtureFile, FixtureError> {
        self.files
            .get(file.index())
            .ok_or(FixtureError::UnknownFile(file))
    }

    fn get_mut(&mut self, file: FileId) -> Result<&mut FixtureFile, FixtureError> {
        self.files
            .get_mut(file.index())
            .ok_or(FixtureError::UnknownFile(file))
    }

    /// Every identifier word of `file`, in source order.
    pub fn words(&self, file: FileId) -> Result<Vec<&str>, FixtureError> {
        let source = self.get(file)?;
        Ok(source
            .tokens
            .iter()
            .filter(|token| token.tok == Tok::Word)
            .map(|&token| source.word(token))
            .collect())
    }

    /// Span of the `nth` identifier spelled `word`.
    pub fn span(&self, file: FileId, word: &str, nth: usize) -> Result<Span, FixtureError> {
        let source = self.get(file)?;
        let token = source.tokens[source.find(word, nth)?];
        Ok(token.span()?)
    }

    /// Start offset of the `nth` identifier spelled `word`.
    pub fn offset(&self, file: FileId, word: &str, nth: usize) -> Result<u32, FixtureError> {
        Ok(self.span(file, word, nth)?.start)
    }

    /// Declare a definition at the `nth` `word` and mark that occurrence as
    /// declaring it.
    pub fn def(
        &mut self,
        file: FileId,
        word: &str,
        nth: usize,
        kind: DefKind,
    ) -> Result<DefId, FixtureError> {
        let span = self.span(file, word, nth)?;
        let name = self.interner.intern(word);
        let source = self.get_mut(file)?;
        let token = source.find(word, nth)?;
        source.declaring.insert(token);
        let (package, covered) = (source.package, source.covered);

        let def = self
            .builder
            .declare(Definition::new(name, kind, DeclSite::new(file, span)).in_package(package));
        if covered {
            self.defs.push((file.index(), token, def));
        }
        Ok(def)
    }

    /// Mark the `nth` `word` as a declaring occurrence with no object, like
    /// a package clause name.
    pub fn declaring(
        &mut self,
        file: FileId,
        word: &str,
        nth: usize,
    ) -> Result<&mut Self, FixtureError> {
        let source = self.get_mut(file)?;
        let token = source.find(word, nth)?;
        source.declaring.insert(token);
        Ok(self)
    }

    /// Declare the package name an `import "path"` introduces.
    ///
    /// The object is sited at the import path literal of `file` and belongs
    /// to the importing package; it is named after the path's last element.
    pub fn import(&mut self, file: FileId, path: &str) -> Result<DefId, FixtureError> {
        let source = self.get(file)?;
        let quoted = format!("\"{path}\"");
        let token = source
            .tokens
            .iter()
            .find(|&&token| token.tok == Tok::Literal && source.word(token) == quoted)
            .copied()
            .ok_or_else(|| FixtureError::WordNotFound {
                path: source.path.clone(),
                word: quoted.clone(),
                nth: 0,
            })?;
        let span = token.span()?;
        let package = source.package;
        let name = self
            .interner
            .intern(path.rsplit('/').next().unwrap_or(path));
        Ok(self.builder.declare(
            Definition::new(name, DefKind::Package, DeclSite::new(file, span)).in_package(package),
        ))
    }

    /// Declare a universe object.
    pub fn builtin(&mut self, name: &str, kind: DefKind) -> DefId {
        let name = self.interner.intern(name);
        self.builder.declare(Definition::universe(name, kind))
    }

    /// Record the `nth` `word` as a use of `def`.
    pub fn refer(
        &mut self,
        file: FileId,
        word: &str,
        nth: usize,
        def: DefId,
    ) -> Result<&mut Self, FixtureError> {
        let source = self.get_mut(file)?;
        let token = source.find(word, nth)?;
        source.referred.insert(token);
        self.uses.push((file.index(), token, def));
        Ok(self)
    }

    /// Record every not yet declared or referred `word` as a use of `def`.
    pub fn refer_all(
        &mut self,
        file: FileId,
        word: &str,
        def: DefId,
    ) -> Result<&mut Self, FixtureError> {
        let index = file.index();
        let source = self.get_mut(file)?;
        let tokens: Vec<usize> = source
            .tokens
            .iter()
            .enumerate()
            .filter(|&(i, &token)| {
                token.tok == Tok::Word
                    && source.word(token) == word
                    && !source.declaring.contains(&i)
                    && !source.referred.contains(&i)
            })
            .map(|(i, _)| i)
            .collect();
        source.referred.extend(tokens.iter().copied());
        self.uses
            .extend(tokens.into_iter().map(|token| (index, token, def)));
        Ok(self)
    }

    /// Build trees and the table, keeping the table even if it is incomplete.
    #[expect(
        clippy::type_complexity,
        reason = "the inner result is the table outcome, the outer one fixture setup"
    )]
    pub fn try_build(
        self,
    ) -> Result<(SourceMap, Result<ObjectTable, IncompleteTable>), FixtureError> {
        let Fixture {
            interner,
            files,
            mut builder,
            defs,
            uses,
            ..
        } = self;

        let mut sources = SourceMap::with_interner(interner.clone());
        let mut nodes = Vec::with_capacity(files.len());
        for file in files {
            let built = scan::build(&file.text, &file.tokens, &file.declaring, &interner)?;
            let id = sources.add(file.path, file.text, built.tree)?;
            nodes.push((id, built.nodes));
        }

        let occurrence = |file: usize, token: usize| {
            nodes.get(file).and_then(|(id, nodes)| {
                nodes
                    .get(token)
                    .copied()
                    .flatten()
                    .map(|node| OccurrenceId::new(*id, node))
            })
        };
        for (file, token, def) in defs {
            if let Some(occ) = occurrence(file, token) {
                builder.record_def(occ, def);
            }
        }
        for (file, token, def) in uses {
            if let Some(occ) = occurrence(file, token) {
                builder.record_use(occ, def);
            }
        }

        let table = builder.finish(&sources);
        Ok((sources, table))
    }

    /// Build trees and a complete table.
    pub fn build(self) -> Result<Loaded, FixtureError> {
        let (sources, table) = self.try_build()?;
        let table = table.map_err(Box::new)?;
        Ok(Loaded { sources, table })
    }
}

/// A built fixture: the file set and its table.
#[derive(Debug)]
pub struct Loaded {
    pub sources: SourceMap,
    pub table: ObjectTable,
}

impl Loaded {
    pub fn source(&self, file: FileId) -> Result<&SourceFile, FixtureError> {
        self.sources
            .file(file)
            .ok_or(FixtureError::UnknownFile(file))
    }

    pub fn engine(&self) -> QueryEngine<'_> {
        QueryEngine::new(&self.table)
    }

    /// Path of the file holding `def`'s site.
    pub fn site_path(&self, def: &Definition) -> Option<&Path> {
        let site = def.site?;
        self.sources.file(site.file).map(SourceFile::path)
    }
}
