use tantivy::schema::{Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, INDEXED, STORED};
use tantivy::tokenizer::{LowerCaser, SimpleTokenizer, StopWordFilter, TextAnalyzer, TokenStream};
use tantivy::Index;

pub const ID_FIELD: &str = "id";
pub const BODY_FIELD: &str = "body";
pub const ATTRS_FIELD: &str = "attrs";
pub const TOKENIZER: &str = "text_with_stopwords";

/// Handles to the three fields every searchmap index carries.
#[derive(Debug, Clone, Copy)]
pub struct Fields {
	/// Identity, indexed for exact lookups and deletes.
	pub id: Field,
	/// Concatenated fulltext attributes. Indexed only.
	pub body: Field,
	/// The whole record as JSON. Stored only.
	pub attrs: Field,
}

impl Fields {
	pub fn from_schema(schema: &Schema) -> anyhow::Result<Self> {
		Ok(Self {
			id: schema.get_field(ID_FIELD)?,
			body: schema.get_field(BODY_FIELD)?,
			attrs: schema.get_field(ATTRS_FIELD)?,
		})
	}
}

pub fn build_schema() -> Schema {
	let mut schema_builder = Schema::builder();
	schema_builder.add_u64_field(ID_FIELD, INDEXED | STORED);
	let body_indexing = TextFieldIndexing::default().set_tokenizer(TOKENIZER).set_index_option(IndexRecordOption::WithFreqsAndPositions);
	schema_builder.add_text_field(BODY_FIELD, TextOptions::default().set_indexing_options(body_indexing));
	schema_builder.add_text_field(ATTRS_FIELD, STORED);
	schema_builder.build()
}

pub fn register_tokenizer(index: &Index) {
	let stop_words = vec![
		"a","an","and","are","as","at","be","by","for","from","has","he","in","is","it","its","of","on","that","the","to","was","will","with","or","but","not","this","these","they","them","their","there","then","than","so","if","when","where","why","how","what","which","who","whom","whose","can","could","should","would","may","might","must","shall","do","does","did","have","had","having",
	];
	let tokenizer = TextAnalyzer::builder(SimpleTokenizer::default())
		.filter(LowerCaser)
		.filter(StopWordFilter::remove(stop_words.into_iter().map(|s| s.to_string())))
		.build();
	index.tokenizers().register(TOKENIZER, tokenizer);
}

/// Terms `text` produces under the index tokenizer, deduplicated in order.
pub fn keywords(index: &Index, text: &str) -> Vec<String> {
	let Some(mut analyzer) = index.tokenizers().get(TOKENIZER) else { return Vec::new() };
	let mut stream = analyzer.token_stream(text);
	let mut out: Vec<String> = Vec::new();
	while stream.advance() {
		let term = &stream.token().text;
		if !out.contains(term) { out.push(term.clone()); }
	}
	out
}
