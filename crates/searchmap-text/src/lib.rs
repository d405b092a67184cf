//! searchmap-text
//!
//! Tantivy-backed reference [`searchmap_core::Transport`]. Indexes live in
//! RAM, or on disk under `text.index_dir`.
pub mod filter;
pub mod schema;
pub mod transport;

pub use transport::{TextTransport, DEFAULT_LIMIT};
