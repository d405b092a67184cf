use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value as Json;
use tracing::debug;

use searchmap_core::config::Settings;
use searchmap_core::{
    Error, Model, PaginationDefaults, Result, SearchQuery, Transport, Value, WriteOperation,
    ID_ATTRIBUTE,
};
use searchmap_query::facets::{compile, depth};
use searchmap_query::{extract_multi, extract_query_data, pagination, PageEcho, SearchArgs};

use crate::collection::Collection;
use crate::hydrate;
use crate::mapping::{MapOptions, MappingTable};

/// Configures an [`Index`]. The identity attribute is mapped up front to
/// the model's primary key; later `map` calls may override it.
pub struct IndexBuilder<M> {
    transport: Arc<dyn Transport>,
    name: String,
    pagination: Option<PaginationDefaults>,
    table: MappingTable<M>,
}

impl<M: Model + 'static> IndexBuilder<M> {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let mut table = MappingTable::default();
        table.register(ID_ATTRIBUTE, MapOptions::new().with(M::primary_key()));
        Self { transport, name: M::storage_name().to_string(), pagination: M::pagination(), table }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replaces the model's pagination defaults; `None` disables paging.
    pub fn pagination(mut self, defaults: Option<PaginationDefaults>) -> Self {
        self.pagination = defaults;
        self
    }

    /// Applies the index name override and the configured page defaults.
    /// Models without pagination support stay without it.
    pub fn settings(mut self, settings: &Settings) -> Self {
        if let Some(name) = &settings.index.name {
            self.name = name.clone();
        }
        if self.pagination.is_some() {
            self.pagination = Some(settings.pagination.clone());
        }
        self
    }

    pub fn map(mut self, attribute: impl Into<String>, options: MapOptions<M>) -> Self {
        self.table.register(attribute, options);
        self
    }

    pub fn build(self) -> Index<M> {
        debug!(index = %self.name, mappings = self.table.len(), "index built");
        Index {
            transport: self.transport,
            name: self.name,
            pagination: self.pagination,
            table: self.table,
            _model: PhantomData,
        }
    }
}

/// Maps model objects to and from one search index.
pub struct Index<M> {
    transport: Arc<dyn Transport>,
    name: String,
    pagination: Option<PaginationDefaults>,
    table: MappingTable<M>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model + 'static> Index<M> {
    pub fn builder(transport: Arc<dyn Transport>) -> IndexBuilder<M> { IndexBuilder::new(transport) }
}

impl<M: Model> Index<M> {
    pub fn name(&self) -> &str { &self.name }

    pub fn mappings(&self) -> &MappingTable<M> { &self.table }

    pub fn search(&self, args: impl Into<SearchArgs>) -> Result<Collection<M>> {
        let (query, echo) = self.prepare(&args.into())?;
        debug!(
            index = %self.name,
            filters = query.filters.len(),
            facets = query.facets.len(),
            page = echo.as_ref().map(|e| e.page),
            "search"
        );
        let raw = self.transport.search(&self.name, &query)?;
        hydrate::collection(&self.table, raw, echo.as_ref())
    }

    /// Searches with loosely-typed arguments: `"text"`, `{options}` or
    /// `["text", {options}]`.
    pub fn search_json(&self, args: &Json) -> Result<Collection<M>> {
        self.search(extract_query_data(args)?)
    }

    /// Runs every named search in one transport batch.
    pub fn multi_search<I, K>(&self, searches: I) -> Result<BTreeMap<String, Collection<M>>>
    where
        I: IntoIterator<Item = (K, SearchArgs)>,
        K: Into<String>,
    {
        let mut queries = BTreeMap::new();
        let mut echoes = BTreeMap::new();
        for (name, args) in searches {
            let name = name.into();
            let (query, echo) = self.prepare(&args)?;
            queries.insert(name.clone(), query);
            echoes.insert(name, echo);
        }
        debug!(index = %self.name, searches = queries.len(), "multi search");

        let mut raw = self.transport.multi_search(&self.name, &queries)?;
        echoes
            .into_iter()
            .map(|(name, echo)| {
                let result = raw.remove(&name).ok_or_else(|| {
                    Error::Transport(anyhow::anyhow!("no result returned for search '{name}'"))
                })?;
                Ok((name, hydrate::collection(&self.table, result, echo.as_ref())?))
            })
            .collect()
    }

    /// Multi-search over a JSON object of `name => arguments`.
    pub fn multi_search_json(&self, searches: &Json) -> Result<BTreeMap<String, Collection<M>>> {
        self.multi_search(extract_multi(searches)?)
    }

    pub fn insert(&self, resource: &M) -> Result<usize> { self.write(WriteOperation::Insert, resource) }

    pub fn update(&self, resource: &M) -> Result<usize> { self.write(WriteOperation::Update, resource) }

    pub fn replace(&self, resource: &M) -> Result<usize> { self.write(WriteOperation::Replace, resource) }

    pub fn delete(&self, resource: &M) -> Result<usize> {
        let id = self.identity(WriteOperation::Delete, resource)?;
        debug!(index = %self.name, %id, "delete");
        Ok(self.transport.delete(&self.name, &id)?)
    }

    fn prepare(&self, args: &SearchArgs) -> Result<(SearchQuery, Option<PageEcho>)> {
        let mut query = compile(args)?;
        let echo = pagination::resolve(&mut query, args.pager.as_ref(), self.pagination.as_ref());
        tracing::trace!(facet_depth = depth(&query), "prepared query");
        Ok((query, echo))
    }

    fn write(&self, operation: WriteOperation, resource: &M) -> Result<usize> {
        let mut record = self.table.record_for(resource);
        let id = record
            .remove(ID_ATTRIBUTE)
            .ok_or(Error::MissingIdentifier { operation })?;
        debug!(index = %self.name, %operation, %id, attributes = record.len(), "write");
        let affected = match operation {
            WriteOperation::Insert => self.transport.insert(&self.name, &id, &record)?,
            WriteOperation::Update => self.transport.update(&self.name, &id, &record)?,
            WriteOperation::Replace => self.transport.replace(&self.name, &id, &record)?,
            WriteOperation::Delete => self.transport.delete(&self.name, &id)?,
        };
        Ok(affected)
    }

    fn identity(&self, operation: WriteOperation, resource: &M) -> Result<Value> {
        self.table
            .get(ID_ATTRIBUTE, resource)?
            .ok_or(Error::MissingIdentifier { operation })
    }
}
