//! A [`Transport`] over local tantivy indexes.
//!
//! Fulltext matching runs in tantivy; filters, ordering, paging and
//! projection run over the decoded records of the matched documents.
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use anyhow::{anyhow, bail, Context, Result};
use tantivy::collector::{Count, TopDocs};
use tantivy::directory::MmapDirectory;
use tantivy::query::{AllQuery, Query, QueryParser, TermQuery};
use tantivy::schema::{IndexRecordOption, Value as _};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, Searcher, TantivyDocument, Term};
use tracing::{debug, warn};

use searchmap_core::config::{expand_path, TextSettings};
use searchmap_core::{RawResult, Record, SearchQuery, Transport, Value, ID_ATTRIBUTE};

use crate::filter;
use crate::schema::{build_schema, keywords, register_tokenizer, Fields};

/// Window applied when a query sets no limit.
pub const DEFAULT_LIMIT: usize = 20;

struct TextIndex {
	index: Index,
	fields: Fields,
	writer: Mutex<IndexWriter>,
	reader: IndexReader,
}

pub struct TextTransport {
	settings: TextSettings,
	root: Option<PathBuf>,
	indexes: RwLock<HashMap<String, Arc<TextIndex>>>,
}

impl TextTransport {
	pub fn new(settings: TextSettings) -> Self {
		let root = settings.index_dir.as_deref().map(expand_path);
		Self { settings, root, indexes: RwLock::new(HashMap::new()) }
	}

	/// Creates `name`, or opens it when it already exists on disk.
	/// Calling this twice for the same name is a no-op.
	pub fn create_index(&self, name: &str) -> Result<()> {
		let mut indexes = self.indexes.write().map_err(|_| anyhow!("index registry lock poisoned"))?;
		if indexes.contains_key(name) { return Ok(()); }

		let schema = build_schema();
		let index = match &self.root {
			Some(root) => {
				let dir = root.join(name);
				std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
				Index::open_or_create(MmapDirectory::open(&dir)?, schema)?
			}
			None => Index::create_in_ram(schema),
		};
		register_tokenizer(&index);
		let fields = Fields::from_schema(&index.schema())?;
		let writer: IndexWriter = index.writer_with_num_threads(1, self.settings.writer_heap_bytes)?;
		let reader = index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into()?;
		debug!(index = name, on_disk = self.root.is_some(), "opened text index");
		indexes.insert(name.to_string(), Arc::new(TextIndex { index, fields, writer: Mutex::new(writer), reader }));
		Ok(())
	}

	/// Committed documents in `name`.
	pub fn num_docs(&self, name: &str) -> Result<u64> {
		Ok(self.open(name)?.reader.searcher().num_docs())
	}

	/// Every attribute name stored across the documents of `name`.
	pub fn attributes(&self, name: &str) -> Result<BTreeSet<String>> {
		let idx = self.open(name)?;
		let searcher = idx.reader.searcher();
		Ok(idx.matches(&searcher, None)?.into_iter().flat_map(|(_, record)| record.into_keys()).collect())
	}

	fn open(&self, name: &str) -> Result<Arc<TextIndex>> {
		let indexes = self.indexes.read().map_err(|_| anyhow!("index registry lock poisoned"))?;
		indexes.get(name).cloned().ok_or_else(|| anyhow!("unknown index '{name}'"))
	}

	fn run(&self, idx: &TextIndex, searcher: &Searcher, query: &SearchQuery) -> Result<RawResult> {
		let started = Instant::now();
		let mut hits: Vec<(f32, Record)> = idx
			.matches(searcher, query.fulltext.as_deref())?
			.into_iter()
			.filter(|(_, record)| filter::accepts(record, &query.filters))
			.collect();
		let total_found = hits.len();
		filter::sort(&mut hits, &query.order);

		let records = hits
			.into_iter()
			.skip(query.offset.unwrap_or(0))
			.take(query.limit.unwrap_or(DEFAULT_LIMIT))
			.map(|(_, record)| filter::project(record, &query.attrs))
			.collect();
		let facets = query
			.facets
			.iter()
			.map(|(name, facet)| Ok((name.clone(), self.run(idx, searcher, &query.facet_scope(facet))?)))
			.collect::<Result<BTreeMap<_, _>>>()?;
		let keywords = match query.fulltext.as_deref() {
			Some(text) => idx.keyword_counts(searcher, text)?,
			None => BTreeMap::new(),
		};
		Ok(RawResult { records, total_found, time: Some(started.elapsed()), keywords, facets })
	}

	fn body_for(&self, record: &Record) -> String {
		let texts: Vec<&str> = if self.settings.fields.is_empty() {
			record.values().filter_map(Value::as_str).collect()
		} else {
			self.settings.fields.iter().filter_map(|f| record.get(f).and_then(Value::as_str)).collect()
		};
		texts.join("\n")
	}

	fn document(&self, fields: &Fields, id: u64, record: &Record) -> Result<TantivyDocument> {
		let mut stored = record.clone();
		stored.insert(ID_ATTRIBUTE.to_string(), Value::from(id));
		Ok(doc!(
			fields.id => id,
			fields.body => self.body_for(&stored),
			fields.attrs => serde_json::to_string(&stored)?,
		))
	}

	/// Applies one change under the writer lock, then commits and reloads.
	fn write<F>(&self, name: &str, id: &Value, change: F) -> Result<usize>
	where
		F: FnOnce(&TextIndex, &mut IndexWriter, u64, Option<Record>) -> Result<usize>,
	{
		let id = id.as_u64().ok_or_else(|| anyhow!("ids must be non-negative integers, got {id}"))?;
		let idx = self.open(name)?;
		let mut writer = idx.writer.lock().map_err(|_| anyhow!("index writer lock poisoned"))?;
		let existing = idx.lookup(&idx.reader.searcher(), id)?;
		let affected = change(&*idx, &mut *writer, id, existing)?;
		if affected > 0 {
			writer.commit()?;
			idx.reader.reload()?;
		}
		Ok(affected)
	}
}

impl TextIndex {
	fn id_term(&self, id: u64) -> Term { Term::from_field_u64(self.fields.id, id) }

	fn decode(&self, doc: &TantivyDocument) -> Result<Record> {
		let json = doc.get_first(self.fields.attrs).and_then(|v| v.as_str()).ok_or_else(|| anyhow!("document without stored attributes"))?;
		Ok(serde_json::from_str(json)?)
	}

	fn lookup(&self, searcher: &Searcher, id: u64) -> Result<Option<Record>> {
		let query = TermQuery::new(self.id_term(id), IndexRecordOption::Basic);
		match searcher.search(&query, &TopDocs::with_limit(1))?.first() {
			Some((_, addr)) => Ok(Some(self.decode(&searcher.doc(*addr)?)?)),
			None => Ok(None),
		}
	}

	fn matches(&self, searcher: &Searcher, fulltext: Option<&str>) -> Result<Vec<(f32, Record)>> {
		let query: Box<dyn Query> = match fulltext {
			Some(text) => {
				let (query, errors) = QueryParser::for_index(&self.index, vec![self.fields.body]).parse_query_lenient(text);
				if !errors.is_empty() { debug!(fulltext = text, errors = errors.len(), "fulltext parsed leniently"); }
				query
			}
			None => Box::new(AllQuery),
		};
		let limit = usize::try_from(searcher.num_docs()).unwrap_or(usize::MAX).max(1);
		let mut hits = Vec::new();
		for (score, addr) in searcher.search(query.as_ref(), &TopDocs::with_limit(limit))? {
			let doc: TantivyDocument = searcher.doc(addr)?;
			match self.decode(&doc) {
				Ok(record) => hits.push((score, record)),
				Err(err) => warn!(error = %err, "skipping undecodable document"),
			}
		}
		Ok(hits)
	}

	fn keyword_counts(&self, searcher: &Searcher, text: &str) -> Result<BTreeMap<String, u64>> {
		keywords(&self.index, text)
			.into_iter()
			.map(|word| {
				let term = Term::from_field_text(self.fields.body, &word);
				let docs = searcher.search(&TermQuery::new(term, IndexRecordOption::Basic), &Count)?;
				Ok((word, u64::try_from(docs).unwrap_or(u64::MAX)))
			})
			.collect()
	}
}

impl Transport for TextTransport {
	fn search(&self, index: &str, query: &SearchQuery) -> Result<RawResult> {
		let idx = self.open(index)?;
		self.run(&idx, &idx.reader.searcher(), query)
	}

	/// All searches of the batch see the same snapshot.
	fn multi_search(&self, index: &str, queries: &BTreeMap<String, SearchQuery>) -> Result<BTreeMap<String, RawResult>> {
		let idx = self.open(index)?;
		let searcher = idx.reader.searcher();
		queries.iter().map(|(name, query)| Ok((name.clone(), self.run(&idx, &searcher, query)?))).collect()
	}

	fn insert(&self, index: &str, id: &Value, record: &Record) -> Result<usize> {
		self.write(index, id, |idx, writer, id, existing| {
			if existing.is_some() { bail!("document {id} already exists in '{index}'"); }
			writer.add_document(self.document(&idx.fields, id, record)?)?;
			Ok(1)
		})
	}

	fn update(&self, index: &str, id: &Value, record: &Record) -> Result<usize> {
		self.write(index, id, |idx, writer, id, existing| {
			let Some(mut merged) = existing else { return Ok(0) };
			merged.extend(record.iter().map(|(k, v)| (k.clone(), v.clone())));
			writer.delete_term(idx.id_term(id));
			writer.add_document(self.document(&idx.fields, id, &merged)?)?;
			Ok(1)
		})
	}

	fn replace(&self, index: &str, id: &Value, record: &Record) -> Result<usize> {
		self.write(index, id, |idx, writer, id, _| {
			writer.delete_term(idx.id_term(id));
			writer.add_document(self.document(&idx.fields, id, record)?)?;
			Ok(1)
		})
	}

	fn delete(&self, index: &str, id: &Value) -> Result<usize> {
		self.write(index, id, |idx, writer, id, existing| {
			if existing.is_none() { return Ok(0); }
			writer.delete_term(idx.id_term(id));
			Ok(1)
		})
	}
}
