//! Seek Sema - the semantic object table
//!
//! Semantic analysis is an outside collaborator: it reports, per resolution
//! scope, which definitions exist and which identifier occurrence declares or
//! uses each of them. This crate stores that report and checks it against the
//! syntax trees it describes.
//!
//! - [`Definition`]: a declared entity and where it was declared
//! - [`ObjectTable`]: read-only `defs` / `uses` maps for one scope
//! - [`TableBuilder`]: collects and validates the analyzer's output

mod definition;
mod table;

pub use definition::{DeclSite, DefId, DefKind, Definition};
pub use table::{IncompleteTable, ObjectTable, TableBuilder, TableProblem};
