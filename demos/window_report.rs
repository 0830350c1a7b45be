//! Window Report Example
//!
//! Lists every window grouped by display and space, frontmost first.
//!
//! Run with: cargo run --example `window_report`

use std::collections::BTreeMap;
use totalspaces2::{SpaceRef, TotalSpaces, Window};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), totalspaces2::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let spaces = TotalSpaces::connect()?;

    let mut by_space: BTreeMap<SpaceRef, Vec<Window>> = BTreeMap::new();
    for window in spaces.windows() {
        by_space
            .entry(SpaceRef::new(window.space_number, window.display_id))
            .or_default()
            .push(window);
    }

    for display in spaces.displays() {
        println!("{display}");
        for number in 1..=spaces.number_of_spaces(display.id) {
            let space = SpaceRef::new(number, display.id);
            println!(
                "  {number}. {} [{}]",
                spaces.space_name(number, display.id),
                spaces.space_type(number, display.id)
            );
            for window in by_space.get(&space).map(Vec::as_slice).unwrap_or_default() {
                let pinned = if window.is_on_all_spaces { " (all spaces)" } else { "" };
                let frame = window
                    .parsed_frame()
                    .map_or_else(|| window.frame.clone(), |f| f.to_string());
                println!(
                    "     #{} {}: {} {frame}{pinned}",
                    window.id, window.app_name, window.title
                );
            }
        }
        println!();
    }
    Ok(())
}
