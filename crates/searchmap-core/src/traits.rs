use std::collections::BTreeMap;

use crate::types::{PaginationDefaults, RawResult, Record, SearchQuery};
use crate::value::Value;

/// The domain object layer an index hydrates into.
///
/// `property`/`set_property` are the dump/load pair for a named property;
/// they back every mapping registered without explicit accessors.
pub trait Model: Sized {
    fn storage_name() -> &'static str;
    fn primary_key() -> &'static str;
    fn properties() -> &'static [&'static str];

    fn new_instance() -> Self;
    fn property(&self, name: &str) -> Option<Value>;
    fn set_property(&mut self, name: &str, value: Value) -> crate::Result<()>;

    /// Called once per hydrated object, after its mapped values are set.
    fn mark_clean(&mut self);
    fn mark_loaded(&mut self, property: &str);

    /// `None` disables page-based searches for this model.
    fn pagination() -> Option<PaginationDefaults> { Some(PaginationDefaults::default()) }
}

/// The search backend client.
pub trait Transport: Send + Sync {
    fn search(&self, index: &str, query: &SearchQuery) -> anyhow::Result<RawResult>;

    /// Runs several named searches. Backends that can batch should override.
    fn multi_search(
        &self,
        index: &str,
        queries: &BTreeMap<String, SearchQuery>,
    ) -> anyhow::Result<BTreeMap<String, RawResult>> {
        queries
            .iter()
            .map(|(name, query)| Ok((name.clone(), self.search(index, query)?)))
            .collect()
    }

    fn insert(&self, index: &str, id: &Value, record: &Record) -> anyhow::Result<usize>;
    fn update(&self, index: &str, id: &Value, record: &Record) -> anyhow::Result<usize>;
    fn replace(&self, index: &str, id: &Value, record: &Record) -> anyhow::Result<usize>;
    fn delete(&self, index: &str, id: &Value) -> anyhow::Result<usize>;
}
