//! Seek Query - go-to-definition over a syntax tree and an object table
//!
//! Given a file and a byte offset, find the identifier at that offset and
//! the declaration it refers to:
//!
//! ```text
//! offset ──PositionIndex──▶ Identifier ──DefinitionResolver──▶ Definition
//! ```
//!
//! [`QueryEngine`] is the entry point. Everything it reads is immutable, so
//! an engine is `Copy` and may be shared freely across threads.
//!
//! # Tracing
//!
//! Query paths emit `trace` events and table construction a `debug` span.
//! Nothing is printed unless a subscriber is installed; see
//! [`init_tracing`].

mod config;
mod engine;
mod error;
mod index;
mod resolver;
pub mod testing;

use std::sync::Once;

pub use config::QueryConfig;
pub use engine::QueryEngine;
pub use error::QueryError;
pub use index::PositionIndex;
pub use resolver::DefinitionResolver;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=seek_query=trace` or `RUST_LOG=seek_sema=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
