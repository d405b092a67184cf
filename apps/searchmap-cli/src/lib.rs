//! Shared pieces of the searchmap binaries: a schemaless document model,
//! JSON loading, index wiring from configuration and result printing.
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value as Json};
use tracing::warn;
use walkdir::WalkDir;

use searchmap_core::config::{Settings, TextSettings};
use searchmap_core::{Error, Model, Record, Value, ID_ATTRIBUTE};
use searchmap_index::{Collection, Index, MapOptions};
use searchmap_text::TextTransport;

/// Where indexes go when `text.index_dir` is not configured.
pub const DEFAULT_INDEX_DIR: &str = "searchmap_data/indexes";

/// A record with no fixed schema: whatever attributes the index returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
	attrs: Record,
	loaded: HashSet<String>,
}

impl Document {
	/// Keeps the scalar members of `object`; nested values are skipped.
	pub fn from_json(object: &Map<String, Json>) -> Self {
		let mut attrs = Record::new();
		for (key, value) in object {
			match Value::from_json(value) {
				Some(v) => { attrs.insert(key.clone(), v); }
				None => warn!(attribute = %key, "skipping non-scalar attribute"),
			}
		}
		Self { attrs, loaded: HashSet::new() }
	}

	pub fn attrs(&self) -> &Record { &self.attrs }

	pub fn id(&self) -> Option<&Value> { self.attrs.get(ID_ATTRIBUTE) }

	pub fn is_loaded(&self, property: &str) -> bool { self.loaded.contains(property) }

	pub fn to_json(&self) -> Json {
		Json::Object(self.attrs.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
	}
}

impl Model for Document {
	fn storage_name() -> &'static str { "documents" }
	fn primary_key() -> &'static str { ID_ATTRIBUTE }
	fn properties() -> &'static [&'static str] { &[] }

	fn new_instance() -> Self { Self::default() }
	fn property(&self, name: &str) -> Option<Value> { self.attrs.get(name).cloned() }

	fn set_property(&mut self, name: &str, value: Value) -> searchmap_core::Result<()> {
		self.attrs.insert(name.to_string(), value);
		Ok(())
	}

	fn mark_clean(&mut self) { self.loaded.clear(); }
	fn mark_loaded(&mut self, property: &str) { self.loaded.insert(property.to_string()); }
}

pub fn init_tracing() {
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
		.with_writer(std::io::stderr)
		.init();
}

/// Reads every `.json` file under `dir`, in path order. A file holds one
/// object or an array of objects; anything else is skipped with a warning.
pub fn load_documents(dir: &Path) -> anyhow::Result<Vec<Document>> {
	let mut documents = Vec::new();
	for entry in WalkDir::new(dir).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
		if !(entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "json")) { continue; }
		let content = std::fs::read_to_string(entry.path())?;
		let parsed: Json = match serde_json::from_str(&content) {
			Ok(json) => json,
			Err(err) => { warn!(path = %entry.path().display(), error = %err, "skipping unparsable file"); continue; }
		};
		match parsed {
			Json::Object(object) => documents.push(Document::from_json(&object)),
			Json::Array(items) => {
				for item in items {
					match item {
						Json::Object(object) => documents.push(Document::from_json(&object)),
						other => warn!(path = %entry.path().display(), "skipping non-object entry {other}"),
					}
				}
			}
			_ => warn!(path = %entry.path().display(), "skipping file without objects"),
		}
	}
	Ok(documents)
}

/// The on-disk location indexes are kept under.
pub fn index_dir(text: &TextSettings, base: &Path) -> PathBuf {
	text.resolved_index_dir(base).unwrap_or_else(|| base.join(DEFAULT_INDEX_DIR))
}

/// Opens the configured document index on a text transport rooted at `base`.
/// Mapped attributes are the configured ones, those already stored in the
/// index, plus `extra`.
pub fn open_index<I>(settings: &Settings, base: &Path, extra: I) -> anyhow::Result<(Arc<TextTransport>, Index<Document>)>
where
	I: IntoIterator<Item = String>,
{
	let text = TextSettings { index_dir: Some(index_dir(&settings.text, base).to_string_lossy().into_owned()), ..settings.text.clone() };
	let transport = Arc::new(TextTransport::new(text));
	let name = settings.index.name.clone().unwrap_or_else(|| Document::storage_name().to_string());
	transport.create_index(&name)?;

	let attributes: BTreeSet<String> = settings
		.index
		.attributes
		.iter()
		.chain(settings.text.fields.iter())
		.cloned()
		.chain(transport.attributes(&name)?)
		.chain(extra)
		.filter(|a| a != ID_ATTRIBUTE)
		.collect();
	let mut builder = Index::<Document>::builder(transport.clone()).settings(settings).name(name);
	for attribute in attributes {
		builder = builder.map(attribute, MapOptions::new());
	}
	Ok((transport, builder.build()))
}

/// Upserts `documents`; returns how many were written and how many lacked an id.
pub fn index_documents<F>(index: &Index<Document>, documents: &[Document], mut progress: F) -> anyhow::Result<(usize, usize)>
where
	F: FnMut(),
{
	let (mut written, mut skipped) = (0, 0);
	for document in documents {
		match index.replace(document) {
			Ok(_) => written += 1,
			Err(Error::MissingIdentifier { operation }) => {
				skipped += 1;
				warn!(%operation, "document without an id");
			}
			Err(err) => return Err(err.into()),
		}
		progress();
	}
	Ok((written, skipped))
}

/// Human-readable lines for a collection and its facets.
pub fn summary_lines(collection: &Collection<Document>, depth: usize) -> Vec<String> {
	let pad = "  ".repeat(depth);
	let mut lines = vec![format!("{pad}📊 {} returned of {} found", collection.count(), collection.total_found())];
	if let Some(pager) = collection.pager() {
		lines.push(format!("{pad}📄 page {}/{} ({} per page)", pager.current_page(), pager.total_pages(), pager.per_page()));
	}
	if !collection.keywords().is_empty() {
		let words: Vec<String> = collection.keywords().iter().map(|(w, n)| format!("{w}={n}")).collect();
		lines.push(format!("{pad}🔤 keywords: {}", words.join(", ")));
	}
	for (i, document) in collection.iter().enumerate() {
		lines.push(format!("{pad}  {}. {}", i + 1, document.to_json()));
	}
	for (name, facet) in collection.facets() {
		lines.push(format!("{pad}🔎 facet {name}:"));
		lines.extend(summary_lines(facet, depth + 1));
	}
	lines
}
