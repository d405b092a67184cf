//! Types exchanged between the query engine and a search transport.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::value::Value;

/// Name of the identity attribute every index carries.
pub const ID_ATTRIBUTE: &str = "id";

/// A raw document: attribute name to value.
pub type Record = BTreeMap<String, Value>;

/// Sort direction of an order term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(other.to_string()),
        }
    }
}

/// Primitive attribute filter understood by the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Equal(Value),
    NotEqual(Value),
    LessThan(Value),
    LessOrEqual(Value),
    GreaterThan(Value),
    GreaterOrEqual(Value),
    Between(Value, Value),
    NotBetween(Value, Value),
    In(Vec<Value>),
    NotIn(Vec<Value>),
}

/// A fully translated query, ready to hand to a [`crate::Transport`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub fulltext: Option<String>,
    pub filters: BTreeMap<String, Filter>,
    pub order: Vec<(String, Direction)>,
    pub attrs: Vec<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub facets: BTreeMap<String, SearchQuery>,
}

impl SearchQuery {
    /// The query a facet actually runs: this query refined by `facet`.
    ///
    /// Facet filters replace filters on the same attribute. A facet fulltext
    /// replaces the parent's, with `%{query}` standing for the parent text.
    /// Order, attrs, limit and offset are taken from the facet when it sets
    /// them. Only the facet's own nested facets carry over.
    pub fn facet_scope(&self, facet: &SearchQuery) -> SearchQuery {
        let parent_text = self.fulltext.as_deref().unwrap_or("");
        let fulltext = match &facet.fulltext {
            Some(text) => {
                let text = text.replace("%{query}", parent_text);
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            None => self.fulltext.clone(),
        };
        let mut filters = self.filters.clone();
        filters.extend(facet.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        SearchQuery {
            fulltext,
            filters,
            order: if facet.order.is_empty() { self.order.clone() } else { facet.order.clone() },
            attrs: if facet.attrs.is_empty() { self.attrs.clone() } else { facet.attrs.clone() },
            limit: facet.limit.or(self.limit),
            offset: facet.offset.or(self.offset),
            facets: facet.facets.clone(),
        }
    }
}

/// What a transport returns for one search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResult {
    pub records: Vec<Record>,
    /// Matches ignoring limit/offset.
    pub total_found: usize,
    pub time: Option<Duration>,
    /// Documents matching each fulltext keyword.
    pub keywords: BTreeMap<String, u64>,
    pub facets: BTreeMap<String, RawResult>,
}

impl RawResult {
    pub fn new(records: Vec<Record>, total_found: usize) -> Self {
        Self { records, total_found, ..Self::default() }
    }

    pub fn returned_count(&self) -> usize { self.records.len() }
}

/// Fallbacks used when a pager block leaves fields out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationDefaults {
    pub per_page: usize,
    pub page_param: String,
}

impl Default for PaginationDefaults {
    fn default() -> Self { Self { per_page: 20, page_param: "page".to_string() } }
}

/// Realtime write kinds, named in missing-identifier errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOperation {
    Insert,
    Update,
    Replace,
    Delete,
}

impl fmt::Display for WriteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Replace => "replace",
            Self::Delete => "delete",
        })
    }
}
