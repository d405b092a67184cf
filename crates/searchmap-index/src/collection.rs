use std::collections::BTreeMap;
use std::time::Duration;

use searchmap_core::{Model, Value};
use searchmap_query::Pager;

/// The hydrated result of one search.
#[derive(Debug, Clone)]
pub struct Collection<M> {
    pub(crate) resources: Vec<M>,
    pub(crate) total_found: usize,
    pub(crate) facets: BTreeMap<String, Collection<M>>,
    pub(crate) pager: Option<Pager>,
    pub(crate) time: Option<Duration>,
    pub(crate) keywords: BTreeMap<String, u64>,
    pub(crate) fields: Vec<String>,
    pub(crate) ids: Vec<Value>,
}

/// Enough to reload a collection's objects from primary storage.
#[derive(Debug, Clone, PartialEq)]
pub struct ReloadScope {
    pub key: &'static str,
    pub ids: Vec<Value>,
    pub fields: Vec<String>,
}

impl<M> Collection<M> {
    /// Matches ignoring limit and offset.
    pub fn total_found(&self) -> usize { self.total_found }

    /// Objects actually returned.
    pub fn count(&self) -> usize { self.resources.len() }

    pub fn len(&self) -> usize { self.resources.len() }

    pub fn is_empty(&self) -> bool { self.resources.is_empty() }

    pub fn iter(&self) -> std::slice::Iter<'_, M> { self.resources.iter() }

    pub fn get(&self, index: usize) -> Option<&M> { self.resources.get(index) }

    pub fn first(&self) -> Option<&M> { self.resources.first() }

    pub fn facets(&self) -> &BTreeMap<String, Collection<M>> { &self.facets }

    pub fn facet(&self, name: &str) -> Option<&Collection<M>> { self.facets.get(name) }

    /// Present only for page-based searches.
    pub fn pager(&self) -> Option<&Pager> { self.pager.as_ref() }

    pub fn time(&self) -> Option<Duration> { self.time }

    pub fn keywords(&self) -> &BTreeMap<String, u64> { &self.keywords }

    /// Model properties populated on every object.
    pub fn fields(&self) -> &[String] { &self.fields }

    /// Identity values in result order.
    pub fn ids(&self) -> &[Value] { &self.ids }

    pub fn into_vec(self) -> Vec<M> { self.resources }
}

impl<M: Model> Collection<M> {
    pub fn reload_scope(&self) -> ReloadScope {
        ReloadScope { key: M::primary_key(), ids: self.ids.clone(), fields: self.fields.clone() }
    }
}

impl<M> IntoIterator for Collection<M> {
    type Item = M;
    type IntoIter = std::vec::IntoIter<M>;

    fn into_iter(self) -> Self::IntoIter { self.resources.into_iter() }
}

impl<'a, M> IntoIterator for &'a Collection<M> {
    type Item = &'a M;
    type IntoIter = std::slice::Iter<'a, M>;

    fn into_iter(self) -> Self::IntoIter { self.resources.iter() }
}
