//! Shared vocabulary for the searchmap crates.
//!
//! Holds the attribute [`value::Value`] type, the normalized query and raw
//! result shapes exchanged with a search backend, the collaborator traits
//! (`Model`, `Transport`), configuration loading and the error type.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;
pub mod value;

pub use error::{Error, Result};
pub use traits::{Model, Transport};
pub use types::{
    Direction, Filter, PaginationDefaults, RawResult, Record, SearchQuery, WriteOperation,
    ID_ATTRIBUTE,
};
pub use value::Value;
