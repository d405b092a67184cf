use std::collections::BTreeMap;

use crate::condition::{Key, Operand, OrderTerm};
use crate::pagination::PagerParams;

/// Everything a caller can say about one search, before translation.
///
/// ```
/// use searchmap_query::{Key, SearchArgs};
///
/// let args = SearchArgs::fulltext("badgers")
///     .filter(Key::gt("views"), 7)
///     .order("id")
///     .facet("popular", SearchArgs::new().filter(Key::gte("views"), 10))
///     .page(2)
///     .per_page(10);
/// assert_eq!(args.conditions.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchArgs {
    pub fulltext: Option<String>,
    pub conditions: Vec<(Key, Operand)>,
    pub order: Vec<OrderTerm>,
    pub attrs: Vec<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub facets: BTreeMap<String, SearchArgs>,
    pub pager: Option<PagerParams>,
}

impl SearchArgs {
    pub fn new() -> Self { Self::default() }

    pub fn fulltext(text: impl Into<String>) -> Self {
        Self { fulltext: Some(text.into()), ..Self::default() }
    }

    pub fn query(mut self, text: impl Into<String>) -> Self {
        self.fulltext = Some(text.into());
        self
    }

    pub fn filter(mut self, key: impl Into<Key>, operand: impl Into<Operand>) -> Self {
        self.conditions.push((key.into(), operand.into()));
        self
    }

    pub fn order(mut self, term: impl Into<OrderTerm>) -> Self {
        self.order.push(term.into());
        self
    }

    pub fn order_by<I, T>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OrderTerm>,
    {
        self.order.extend(terms.into_iter().map(Into::into));
        self
    }

    pub fn attrs<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attrs = attrs.into_iter().map(Into::into).collect();
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn facet(mut self, name: impl Into<String>, facet: SearchArgs) -> Self {
        self.facets.insert(name.into(), facet);
        self
    }

    pub fn page(mut self, page: i64) -> Self {
        self.pager.get_or_insert_with(PagerParams::default).page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: usize) -> Self {
        self.pager.get_or_insert_with(PagerParams::default).per_page = Some(per_page);
        self
    }

    pub fn page_param(mut self, name: impl Into<String>) -> Self {
        self.pager.get_or_insert_with(PagerParams::default).page_param = Some(name.into());
        self
    }
}

impl From<&str> for SearchArgs {
    fn from(text: &str) -> Self { Self::fulltext(text) }
}

impl From<String> for SearchArgs {
    fn from(text: String) -> Self { Self::fulltext(text) }
}
