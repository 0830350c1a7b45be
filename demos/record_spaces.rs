//! Record Spaces Example
//!
//! Saves the UUIDs of every space on every display under a name, so
//! `restore_spaces` can put spaces back on the right displays later.
//!
//! Run with: cargo run --example `record_spaces` --features serde -- <name>
//!
//! Layouts are kept in `~/.ts2_spaces_configs`, a JSON object mapping each
//! name to its layout.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::{env, fs, process};
use totalspaces2::{SpaceLayout, TotalSpaces};
use tracing_subscriber::EnvFilter;

const STORE_FILE: &str = ".ts2_spaces_configs";

fn store_path() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(STORE_FILE)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Some(name) = env::args().nth(1) else {
        eprintln!("Please supply a name for the layout");
        process::exit(1);
    };

    let spaces = TotalSpaces::connect()?;
    let layout = spaces.record_layout();

    let path = store_path();
    // An unreadable or malformed store is replaced.
    let mut layouts: BTreeMap<String, SpaceLayout> = fs::read_to_string(&path)
        .ok()
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or_default();

    for (display, uuids) in layout.iter() {
        println!("Display {display}: {} spaces", uuids.len());
    }
    layouts.insert(name.clone(), layout);
    fs::write(&path, serde_json::to_string(&layouts)?)?;
    println!("Saved layout {name:?} to {}", path.display());
    Ok(())
}
