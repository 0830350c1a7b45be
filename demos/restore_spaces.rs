//! Restore Spaces Example
//!
//! Moves spaces back to the displays and positions saved by `record_spaces`.
//!
//! Run with: cargo run --example `restore_spaces` --features serde -- <name>

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::{env, fs, process};
use totalspaces2::{Error, SpaceLayout, TotalSpaces};
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
        .init();

    let Some(name) = env::args().nth(1) else {
        eprintln!("Please supply the name of the layout to restore");
        process::exit(1);
    };

    let spaces = TotalSpaces::connect()?;

    let mut layouts: BTreeMap<String, SpaceLayout> = fs::read_to_string(store_path())
        .ok()
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or_default();
    let Some(layout) = layouts.remove(&name) else {
        eprintln!("Layout {name:?} not found");
        process::exit(2);
    };

    let report = match spaces.restore_layout(&layout) {
        Ok(report) => report,
        Err(Error::UnknownDisplay { display }) => {
            eprintln!("Display {display} not found, this layout is for different displays");
            process::exit(3);
        }
        Err(e) => return Err(e.into()),
    };

    println!("Moved {} spaces", report.moved.len());
    for uuid in &report.failed {
        println!("Failed to move space {uuid}");
    }
    for uuid in &report.missing {
        println!("Space {uuid} no longer exists");
    }
    Ok(())
}
