//! Attribute <-> property bindings for one index.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use searchmap_core::{Error, Model, Record, Result, Value};

pub type Getter<M> = Arc<dyn Fn(&M) -> Option<Value> + Send + Sync>;
pub type Setter<M> = Arc<dyn Fn(&mut M, Value) -> Result<()> + Send + Sync>;

/// How one index attribute reads from and writes to a model.
pub struct Mapping<M> {
    attribute: String,
    property: String,
    get: Getter<M>,
    set: Setter<M>,
}

impl<M> Mapping<M> {
    pub fn attribute(&self) -> &str { &self.attribute }

    /// Model property this attribute loads, marked loaded after hydration.
    pub fn property(&self) -> &str { &self.property }

    pub fn get(&self, resource: &M) -> Option<Value> { (self.get)(resource) }

    pub fn set(&self, resource: &mut M, value: Value) -> Result<()> { (self.set)(resource, value) }
}

impl<M> Clone for Mapping<M> {
    fn clone(&self) -> Self {
        Self {
            attribute: self.attribute.clone(),
            property: self.property.clone(),
            get: Arc::clone(&self.get),
            set: Arc::clone(&self.set),
        }
    }
}

impl<M> fmt::Debug for Mapping<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapping")
            .field("attribute", &self.attribute)
            .field("property", &self.property)
            .finish_non_exhaustive()
    }
}

/// Options for [`MappingTable::register`].
///
/// Without explicit accessors, the model property named by `with` (or the
/// attribute itself) is read with `Model::property` and written with
/// `Model::set_property`.
pub struct MapOptions<M> {
    with: Option<String>,
    get: Option<Getter<M>>,
    set: Option<Setter<M>>,
}

impl<M> Default for MapOptions<M> {
    fn default() -> Self { Self { with: None, get: None, set: None } }
}

impl<M> MapOptions<M> {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, property: impl Into<String>) -> Self {
        self.with = Some(property.into());
        self
    }

    pub fn get<F>(mut self, get: F) -> Self
    where
        F: Fn(&M) -> Option<Value> + Send + Sync + 'static,
    {
        self.get = Some(Arc::new(get));
        self
    }

    pub fn set<F>(mut self, set: F) -> Self
    where
        F: Fn(&mut M, Value) -> Result<()> + Send + Sync + 'static,
    {
        self.set = Some(Arc::new(set));
        self
    }
}

/// Every mapping of an index, keyed by attribute name.
pub struct MappingTable<M> {
    mappings: BTreeMap<String, Mapping<M>>,
}

impl<M> Default for MappingTable<M> {
    fn default() -> Self { Self { mappings: BTreeMap::new() } }
}

impl<M> fmt::Debug for MappingTable<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.mappings.values()).finish()
    }
}

impl<M: Model + 'static> MappingTable<M> {
    /// Registers (or replaces) the mapping for `attribute`.
    pub fn register(&mut self, attribute: impl Into<String>, options: MapOptions<M>) {
        let attribute = attribute.into();
        let property = options.with.unwrap_or_else(|| attribute.clone());
        let get = options.get.unwrap_or_else(|| {
            let property = property.clone();
            Arc::new(move |resource: &M| resource.property(&property))
        });
        let set = options.set.unwrap_or_else(|| {
            let property = property.clone();
            Arc::new(move |resource: &mut M, value: Value| resource.set_property(&property, value))
        });
        self.mappings.insert(attribute.clone(), Mapping { attribute, property, get, set });
    }
}

impl<M> MappingTable<M> {
    pub fn mapping(&self, attribute: &str) -> Option<&Mapping<M>> { self.mappings.get(attribute) }

    pub fn contains(&self, attribute: &str) -> bool { self.mappings.contains_key(attribute) }

    pub fn iter(&self) -> impl Iterator<Item = &Mapping<M>> { self.mappings.values() }

    pub fn len(&self) -> usize { self.mappings.len() }

    pub fn is_empty(&self) -> bool { self.mappings.is_empty() }

    pub fn get(&self, attribute: &str, resource: &M) -> Result<Option<Value>> {
        Ok(self.lookup(attribute)?.get(resource))
    }

    pub fn set(&self, attribute: &str, resource: &mut M, value: Value) -> Result<()> {
        self.lookup(attribute)?.set(resource, value)
    }

    /// Reads every mapped attribute that has a value.
    pub fn record_for(&self, resource: &M) -> Record {
        self.mappings
            .iter()
            .filter_map(|(attribute, mapping)| mapping.get(resource).map(|v| (attribute.clone(), v)))
            .collect()
    }

    fn lookup(&self, attribute: &str) -> Result<&Mapping<M>> {
        self.mappings
            .get(attribute)
            .ok_or_else(|| Error::UnknownAttribute(attribute.to_string()))
    }
}
