//! Seek IR - source files and syntax model
//!
//! This crate holds the data every other seek crate reads:
//! - Spans for half-open byte ranges
//! - Names for interned identifiers
//! - Source files, the file set, and line/column rendering
//! - The flat syntax tree handed over by a parser
//! - Identifier occurrences with stable ids
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifier strings → `Name(u32)`
//! - **Flatten Everything**: nodes live in one arena, addressed by `NodeId(u32)`
//! - **Immutable After Build**: trees and files are validated once, then only read
//!
//! Nothing here knows what an identifier *means*; that is `seek_sema`'s job.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod ident;
mod interner;
mod name;
mod source;
mod span;
mod syntax;

pub use ident::{IdentRole, Identifier, Identifiers, OccurrenceId};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use source::{
    ColumnEncoding, FileId, LineOffsetTable, Position, SourceError, SourceFile, SourceMap,
    SourceMapId,
};
pub use span::{Span, SpanError};
pub use syntax::{Node, NodeId, NodeKind, NodeRange, Nodes, SyntaxTree, TreeBuilder, TreeError};

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{Identifier, NodeId, OccurrenceId};
    crate::static_assert_size!(NodeId, 4);
    crate::static_assert_size!(OccurrenceId, 8);
    crate::static_assert_size!(Identifier, 28);
}
