#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use searchmap_core::config::TextSettings;
use searchmap_core::{Error, Model, RawResult, Record, SearchQuery, Transport, Value};
use searchmap_index::{Index, MapOptions};
use searchmap_text::TextTransport;

pub const INDEX: &str = "posts";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Post {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub views: Option<i64>,
    pub user_id: Option<i64>,
    pub clean: bool,
    pub loaded: BTreeSet<String>,
}

impl Post {
    pub fn new(id: u64, title: &str, views: i64, user_id: i64) -> Self {
        Self {
            id: Some(id),
            title: Some(title.to_string()),
            content: Some(format!("{title} body")),
            views: Some(views),
            user_id: Some(user_id),
            ..Self::default()
        }
    }
}

impl Model for Post {
    fn storage_name() -> &'static str { INDEX }
    fn primary_key() -> &'static str { "id" }
    fn properties() -> &'static [&'static str] { &["id", "title", "content", "views", "user_id"] }

    fn new_instance() -> Self { Self::default() }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "id" => self.id.map(Value::from),
            "title" => self.title.clone().map(Value::from),
            "content" => self.content.clone().map(Value::from),
            "views" => self.views.map(Value::from),
            "user_id" => self.user_id.map(Value::from),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: Value) -> searchmap_core::Result<()> {
        let bad = || Error::conversion(name, format!("unexpected value {value:?}"));
        match name {
            "id" => self.id = Some(value.as_u64().ok_or_else(bad)?),
            "title" => self.title = Some(value.as_str().ok_or_else(bad)?.to_string()),
            "content" => self.content = Some(value.as_str().ok_or_else(bad)?.to_string()),
            "views" => self.views = Some(value.as_i64().ok_or_else(bad)?),
            "user_id" => self.user_id = Some(value.as_i64().ok_or_else(bad)?),
            other => return Err(Error::UnknownAttribute(other.to_string())),
        }
        Ok(())
    }

    fn mark_clean(&mut self) { self.clean = true; }
    fn mark_loaded(&mut self, property: &str) { self.loaded.insert(property.to_string()); }
}

/// Records every call before delegating.
pub struct CountingTransport<T> {
    inner: T,
    calls: AtomicUsize,
    pub log: Mutex<Vec<String>>,
}

impl<T: Transport> CountingTransport<T> {
    pub fn new(inner: T) -> Self { Self { inner, calls: AtomicUsize::new(0), log: Mutex::new(Vec::new()) } }

    pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

    pub fn inner(&self) -> &T { &self.inner }

    fn record(&self, call: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().expect("log").push(call.to_string());
    }
}

impl<T: Transport> Transport for CountingTransport<T> {
    fn search(&self, index: &str, query: &SearchQuery) -> anyhow::Result<RawResult> {
        self.record("search");
        self.inner.search(index, query)
    }

    fn multi_search(
        &self,
        index: &str,
        queries: &BTreeMap<String, SearchQuery>,
    ) -> anyhow::Result<BTreeMap<String, RawResult>> {
        self.record("multi_search");
        self.inner.multi_search(index, queries)
    }

    fn insert(&self, index: &str, id: &Value, record: &Record) -> anyhow::Result<usize> {
        self.record("insert");
        self.inner.insert(index, id, record)
    }

    fn update(&self, index: &str, id: &Value, record: &Record) -> anyhow::Result<usize> {
        self.record("update");
        self.inner.update(index, id, record)
    }

    fn replace(&self, index: &str, id: &Value, record: &Record) -> anyhow::Result<usize> {
        self.record("replace");
        self.inner.replace(index, id, record)
    }

    fn delete(&self, index: &str, id: &Value) -> anyhow::Result<usize> {
        self.record("delete");
        self.inner.delete(index, id)
    }
}

/// Answers every search with the same raw result; refuses writes.
pub struct CannedTransport {
    pub result: RawResult,
    pub last_query: Mutex<Option<SearchQuery>>,
}

impl CannedTransport {
    pub fn new(result: RawResult) -> Self { Self { result, last_query: Mutex::new(None) } }
}

impl Transport for CannedTransport {
    fn search(&self, _index: &str, query: &SearchQuery) -> anyhow::Result<RawResult> {
        *self.last_query.lock().expect("query") = Some(query.clone());
        Ok(self.result.clone())
    }

    fn insert(&self, _: &str, _: &Value, _: &Record) -> anyhow::Result<usize> { anyhow::bail!("read only") }
    fn update(&self, _: &str, _: &Value, _: &Record) -> anyhow::Result<usize> { anyhow::bail!("read only") }
    fn replace(&self, _: &str, _: &Value, _: &Record) -> anyhow::Result<usize> { anyhow::bail!("read only") }
    fn delete(&self, _: &str, _: &Value) -> anyhow::Result<usize> { anyhow::bail!("read only") }
}

pub fn posts_index(transport: Arc<dyn Transport>) -> Index<Post> {
    Index::builder(transport)
        .map("title", MapOptions::new())
        .map("body", MapOptions::new().with("content"))
        .map("views", MapOptions::new())
        .map("user_id", MapOptions::new())
        .build()
}

/// A counted text transport holding `posts`, with its index created.
pub fn text_backend() -> Arc<CountingTransport<TextTransport>> {
    let text = TextTransport::new(TextSettings { fields: vec!["title".into(), "body".into()], ..TextSettings::default() });
    text.create_index(INDEX).expect("create index");
    Arc::new(CountingTransport::new(text))
}

/// Five posts; "badgers" appears in the titles of ids 1..=3.
pub fn seed(index: &Index<Post>) -> Vec<Post> {
    let posts = vec![
        Post::new(1, "Badgers in the wild", 3, 1),
        Post::new(2, "Badgers at night", 7, 1),
        Post::new(3, "Badgers and rabbits", 9, 2),
        Post::new(4, "Rabbits only", 11, 2),
        Post::new(5, "Foxes", 1, 3),
    ];
    for post in &posts {
        assert_eq!(index.insert(post).expect("insert"), 1);
    }
    posts
}
