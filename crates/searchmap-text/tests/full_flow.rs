use std::collections::BTreeMap;

use searchmap_core::config::TextSettings;
use searchmap_core::{Record, SearchQuery, Transport, Value};
use searchmap_query::facets::compile;
use searchmap_query::{Key, SearchArgs};
use searchmap_text::TextTransport;

const INDEX: &str = "posts";

fn record(title: &str, views: i64, user_id: i64) -> Record {
    let mut r = Record::new();
    r.insert("title".into(), Value::from(title));
    r.insert("views".into(), Value::Int(views));
    r.insert("user_id".into(), Value::Int(user_id));
    r
}

fn seeded(settings: TextSettings) -> TextTransport {
    let transport = TextTransport::new(settings);
    transport.create_index(INDEX).expect("create");
    let rows = [
        (1, "Badgers in the wild", 3, 1),
        (2, "Badgers at night", 7, 1),
        (3, "Badgers and rabbits", 9, 2),
        (4, "Rabbits only", 11, 2),
        (5, "Foxes", 1, 3),
    ];
    for (id, title, views, user) in rows {
        assert_eq!(transport.insert(INDEX, &Value::Int(id), &record(title, views, user)).expect("insert"), 1);
    }
    transport
}

fn ids(records: &[Record]) -> Vec<i64> {
    records.iter().filter_map(|r| r.get("id").and_then(Value::as_i64)).collect()
}

fn query(args: SearchArgs) -> SearchQuery { compile(&args).expect("compile") }

#[test]
fn fulltext_filters_and_order() {
    let transport = seeded(TextSettings::default());
    let raw = transport
        .search(INDEX, &query(SearchArgs::fulltext("badgers").filter(Key::gte("views"), 5).order(Key::desc("views"))))
        .expect("search");
    assert_eq!(raw.total_found, 2);
    assert_eq!(ids(&raw.records), vec![3, 2]);
    assert_eq!(raw.keywords.get("badgers"), Some(&3));
    assert!(raw.time.is_some());
}

#[test]
fn empty_fulltext_matches_everything_and_paginates() {
    let transport = seeded(TextSettings::default());
    let raw = transport.search(INDEX, &query(SearchArgs::new().order("id").limit(2).offset(2))).expect("search");
    assert_eq!(raw.total_found, 5);
    assert_eq!(ids(&raw.records), vec![3, 4]);
    assert!(raw.keywords.is_empty());
}

#[test]
fn attrs_project_but_keep_id() {
    let transport = seeded(TextSettings::default());
    let raw = transport.search(INDEX, &query(SearchArgs::new().filter("id", 4).attrs(["views"]))).expect("search");
    let keys: Vec<_> = raw.records[0].keys().cloned().collect();
    assert_eq!(keys, vec!["id".to_string(), "views".to_string()]);
}

#[test]
fn facets_refine_the_parent_query() {
    let transport = seeded(TextSettings::default());
    let args = SearchArgs::fulltext("badgers").facet(
        "popular",
        SearchArgs::new()
            .filter(Key::gte("views"), 7)
            .facet("by_two", SearchArgs::new().filter("user_id", 2)),
    );
    let raw = transport.search(INDEX, &query(args)).expect("search");
    assert_eq!(raw.total_found, 3);
    let popular = &raw.facets["popular"];
    assert_eq!(popular.total_found, 2);
    assert_eq!(popular.facets["by_two"].total_found, 1);
    assert_eq!(ids(&popular.facets["by_two"].records), vec![3]);
}

#[test]
fn facet_fulltext_interpolates_parent_text() {
    let transport = seeded(TextSettings::default());
    let args = SearchArgs::fulltext("badgers").facet("both", SearchArgs::fulltext("+%{query} +rabbits"));
    let raw = transport.search(INDEX, &query(args)).expect("search");
    assert_eq!(ids(&raw.facets["both"].records), vec![3]);
}

#[test]
fn multi_search_matches_single_searches() {
    let transport = seeded(TextSettings::default());
    let mut queries = BTreeMap::new();
    queries.insert("badgers".to_string(), query(SearchArgs::fulltext("badgers").order("id")));
    queries.insert("rabbits".to_string(), query(SearchArgs::fulltext("rabbits").order("id")));
    let batch = transport.multi_search(INDEX, &queries).expect("multi");
    for (name, q) in &queries {
        let single = transport.search(INDEX, q).expect("single");
        assert_eq!(batch[name].records, single.records);
        assert_eq!(batch[name].total_found, single.total_found);
    }
}

#[test]
fn realtime_writes() {
    let transport = seeded(TextSettings::default());
    assert!(transport.insert(INDEX, &Value::Int(1), &record("dup", 0, 0)).is_err());

    let mut patch = Record::new();
    patch.insert("views".into(), Value::Int(100));
    assert_eq!(transport.update(INDEX, &Value::Int(1), &patch).expect("update"), 1);
    assert_eq!(transport.update(INDEX, &Value::Int(99), &patch).expect("update missing"), 0);
    let raw = transport.search(INDEX, &query(SearchArgs::new().filter("id", 1))).expect("search");
    assert_eq!(raw.records[0]["views"], Value::Int(100));
    assert_eq!(raw.records[0]["title"], Value::from("Badgers in the wild"));

    assert_eq!(transport.replace(INDEX, &Value::Int(6), &record("Otters", 2, 4)).expect("replace"), 1);
    assert_eq!(transport.num_docs(INDEX).expect("count"), 6);

    assert_eq!(transport.delete(INDEX, &Value::Int(6)).expect("delete"), 1);
    assert_eq!(transport.delete(INDEX, &Value::Int(6)).expect("delete again"), 0);
    assert_eq!(transport.num_docs(INDEX).expect("count"), 5);

    assert!(transport.delete(INDEX, &Value::Int(-1)).is_err());
    assert!(transport.search("missing", &SearchQuery::default()).is_err());
}

#[test]
fn configured_fields_limit_the_fulltext_body() {
    let settings = TextSettings { fields: vec!["title".into()], ..TextSettings::default() };
    let transport = TextTransport::new(settings);
    transport.create_index(INDEX).expect("create");
    let mut r = record("Plain title", 1, 1);
    r.insert("note".into(), Value::from("badgers"));
    transport.insert(INDEX, &Value::Int(1), &r).expect("insert");
    assert_eq!(transport.search(INDEX, &query(SearchArgs::fulltext("badgers"))).expect("search").total_found, 0);
    assert_eq!(transport.search(INDEX, &query(SearchArgs::fulltext("plain"))).expect("search").total_found, 1);
}

#[test]
fn on_disk_index_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = TextSettings { index_dir: Some(dir.path().to_string_lossy().to_string()), ..TextSettings::default() };
    {
        let transport = seeded(settings.clone());
        assert_eq!(transport.num_docs(INDEX).expect("count"), 5);
    }
    let reopened = TextTransport::new(settings);
    reopened.create_index(INDEX).expect("reopen");
    assert_eq!(reopened.num_docs(INDEX).expect("count"), 5);
    assert!(dir.path().join(INDEX).is_dir());
}

#[test]
fn stored_attributes_are_listed() {
    let transport = seeded(TextSettings::default());
    let attributes = transport.attributes(INDEX).expect("attributes");
    for name in ["id", "title", "views", "user_id"] {
        assert!(attributes.contains(name), "{attributes:?}");
    }
    transport.create_index("empty").expect("create");
    assert!(transport.attributes("empty").expect("attributes").is_empty());
}

#[test]
fn malformed_fulltext_still_searches() {
    let transport = seeded(TextSettings::default());
    for text in ["badgers:", "\"badgers at", "(rabbits"] {
        assert!(transport.search(INDEX, &query(SearchArgs::fulltext(text))).is_ok(), "{text}");
    }
}
