use std::collections::BTreeSet;
use std::{env, path::PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use searchmap_cli::{index_documents, init_tracing, load_documents, open_index};
use searchmap_core::config::Config;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    let data_dir = env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| {
        let dir: String = config.get("data.raw_json_dir").unwrap_or_else(|_| "./data/json".to_string());
        PathBuf::from(dir)
    });
    println!("searchmap indexer\n=================");
    println!("Data directory: {}", data_dir.display());

    let documents = load_documents(&data_dir)?;
    let attributes: BTreeSet<String> = documents.iter().flat_map(|d| d.attrs().keys().cloned()).collect();
    let (transport, index) = open_index(&settings, &env::current_dir()?, attributes)?;
    println!("Index '{}' mapping {} attributes", index.name(), index.mappings().len());

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents ({percent}%)")?.progress_chars("#>-"));
    let (written, skipped) = index_documents(&index, &documents, || pb.inc(1))?;
    pb.finish_and_clear();

    println!("\n✅ Indexing completed successfully!");
    println!("📊 Indexed {} documents ({} in index)", written, transport.num_docs(index.name())?);
    if skipped > 0 { println!("⚠️  Skipped {} documents without an id", skipped); }
    println!("\n💡 To search, use: cargo run --bin searchmap-search '<json args>'");
    Ok(())
}
