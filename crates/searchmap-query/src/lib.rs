//! searchmap-query
//!
//! Compiles caller-facing search arguments ([`SearchArgs`]) into the
//! primitive [`searchmap_core::SearchQuery`] a transport executes: condition
//! and order translation, recursive facet expansion and page resolution.
//! `extract` parses the same arguments from loosely-typed JSON.

pub mod args;
pub mod condition;
pub mod extract;
pub mod facets;
pub mod pagination;
pub mod translate;

pub use args::SearchArgs;
pub use condition::{Key, Operand, Operator, OrderTerm};
pub use extract::{extract_multi, extract_query_data};
pub use pagination::{PageEcho, Pager, PagerParams};
pub use translate::translate;
