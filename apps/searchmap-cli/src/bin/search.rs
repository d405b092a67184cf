use std::env;

use serde_json::Value as Json;
use searchmap_cli::{init_tracing, open_index, summary_lines};
use searchmap_core::config::Config;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut multi = false;
    let mut raw: Option<String> = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--multi" | "-m" => multi = true,
            s if s.starts_with('-') => { eprintln!("Unknown flag: {}", s); std::process::exit(2); }
            _ => raw = Some(arg.clone()),
        }
    }
    let Some(raw) = raw else {
        eprintln!("Usage: searchmap-search [--multi] '<json args>'");
        eprintln!("Example: searchmap-search '[\"badgers\", {{\"views.gte\": 7, \"order\": \"id\"}}]'");
        std::process::exit(1);
    };
    // plain text that is not JSON searches as fulltext
    let args: Json = serde_json::from_str(&raw).unwrap_or(Json::String(raw));

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    let (_, index) = open_index(&settings, &env::current_dir()?, Vec::new())?;
    println!("🔍 searchmap-search on '{}'\n==================", index.name());

    if multi {
        for (name, collection) in index.multi_search_json(&args)? {
            println!("\n=== {} ===", name);
            summary_lines(&collection, 0).iter().for_each(|line| println!("{}", line));
        }
    } else {
        let collection = index.search_json(&args)?;
        summary_lines(&collection, 0).iter().for_each(|line| println!("{}", line));
    }
    Ok(())
}
