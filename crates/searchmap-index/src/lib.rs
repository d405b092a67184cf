//! searchmap-index
//!
//! Binds a [`searchmap_core::Model`] to a search index through a table of
//! attribute mappings. [`Index`] compiles search arguments, hands the
//! normalized query to a [`searchmap_core::Transport`] and hydrates the raw
//! answer into a [`Collection`] of model objects, facets and pager included.
//! Realtime writes go through the same mappings.

pub mod collection;
pub mod hydrate;
pub mod index;
pub mod mapping;

pub use collection::{Collection, ReloadScope};
pub use index::{Index, IndexBuilder};
pub use mapping::{MapOptions, Mapping, MappingTable};
pub use searchmap_query::{Key, Pager, SearchArgs};
