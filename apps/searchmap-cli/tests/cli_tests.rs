use std::fs;

use serde_json::json;
use tempfile::TempDir;

use searchmap_cli::{index_documents, load_documents, open_index, summary_lines, Document};
use searchmap_core::config::Config;
use searchmap_core::Value;

fn write_data(dir: &TempDir) {
    let data = dir.path().join("data");
    fs::create_dir_all(data.join("nested")).expect("mkdir");
    fs::write(
        data.join("a.json"),
        json!([
            {"id": 1, "title": "Badgers in the wild", "views": 3, "tags": ["x"]},
            {"id": 2, "title": "Badgers at night", "views": 7},
            "not an object"
        ])
        .to_string(),
    )
    .expect("write");
    fs::write(data.join("nested/b.json"), json!({"id": 3, "title": "Rabbits", "views": 9}).to_string()).expect("write");
    fs::write(data.join("nested/c.json"), json!({"title": "No id"}).to_string()).expect("write");
    fs::write(data.join("notes.txt"), "ignored").expect("write");
    fs::write(data.join("broken.json"), "{").expect("write");
}

#[test]
fn loads_objects_and_arrays_in_path_order() {
    let dir = TempDir::new().expect("tempdir");
    write_data(&dir);
    let documents = load_documents(&dir.path().join("data")).expect("load");
    let ids: Vec<Option<&Value>> = documents.iter().map(Document::id).collect();
    assert_eq!(ids, vec![Some(&Value::Int(1)), Some(&Value::Int(2)), Some(&Value::Int(3)), None]);
    assert!(!documents[0].attrs().contains_key("tags"));
}

#[test]
fn indexes_and_searches_documents() {
    let dir = TempDir::new().expect("tempdir");
    write_data(&dir);
    let settings = Config::from_toml_str("[index]\nname = \"docs\"\n[text]\nindex_dir = \"idx\"\nfields = [\"title\"]\n")
        .settings()
        .expect("settings");
    let documents = load_documents(&dir.path().join("data")).expect("load");
    let attributes = documents.iter().flat_map(|d| d.attrs().keys().cloned());
    let (transport, index) = open_index(&settings, dir.path(), attributes.collect::<Vec<_>>()).expect("open");
    assert_eq!(index.name(), "docs");

    let mut ticks = 0;
    let (written, skipped) = index_documents(&index, &documents, || ticks += 1).expect("index");
    assert_eq!((written, skipped, ticks), (3, 1, 4));
    assert_eq!(transport.num_docs("docs").expect("count"), 3);
    assert!(dir.path().join("idx/docs").is_dir());

    let found = index.search_json(&json!(["badgers", {"views.gt": 5}])).expect("search");
    assert_eq!(found.ids(), &[Value::Int(2)]);
    let doc = found.first().expect("doc");
    assert_eq!(doc.attrs().get("title"), Some(&Value::from("Badgers at night")));
    assert!(doc.is_loaded("views"));

    let lines = summary_lines(&found, 0);
    assert!(lines[0].contains("1 returned of 1 found"), "{lines:?}");
    assert!(lines.iter().any(|l| l.contains("badgers=2")), "{lines:?}");
}

#[test]
fn reopened_index_hydrates_stored_attributes() {
    let dir = TempDir::new().expect("tempdir");
    write_data(&dir);
    let settings = Config::from_toml_str("[index]\nname = \"docs\"\n[text]\nindex_dir = \"idx\"\n").settings().expect("settings");
    let documents = load_documents(&dir.path().join("data")).expect("load");
    {
        let attributes = documents.iter().flat_map(|d| d.attrs().keys().cloned());
        let (_, index) = open_index(&settings, dir.path(), attributes.collect::<Vec<_>>()).expect("open");
        index_documents(&index, &documents, || {}).expect("index");
    }

    let (_, index) = open_index(&settings, dir.path(), Vec::new()).expect("reopen");
    let found = index.search_json(&json!({"id": 3})).expect("search");
    let doc = found.first().expect("doc");
    assert_eq!(doc.attrs().get("title"), Some(&Value::from("Rabbits")));
    assert_eq!(doc.attrs().get("views"), Some(&Value::Int(9)));
}
