//! Space Monitor Example
//!
//! Prints every space switch and layout change until interrupted.
//!
//! Run with: cargo run --example `space_monitor`
//!
//! Set `RUST_LOG=totalspaces2=debug` to see the binding's own tracing.

use std::thread;
use std::time::Duration;
use totalspaces2::{DisplayId, TotalSpaces};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), totalspaces2::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let spaces = match TotalSpaces::connect() {
        Ok(spaces) => spaces,
        Err(e) if e.is_load_failure() => {
            println!("TotalSpaces2 is not available: {e}");
            println!("Requires: macOS with TotalSpaces2 installed and running");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    println!("{}", spaces.versions());
    let current = spaces.current_space_number(DisplayId::MAIN);
    println!(
        "Currently on space {current}: {}",
        spaces.space_name(current, DisplayId::MAIN)
    );
    println!();

    let names = spaces.clone();
    spaces.on_space_will_change(move |change| {
        println!(
            "Display {}: {} -> {}",
            change.display,
            names.space_name(change.from, change.display),
            names.space_name(change.to, change.display),
        );
    });

    let layout = spaces.clone();
    spaces.on_layout_changed(move || {
        let count = layout.number_of_spaces(DisplayId::MAIN);
        println!("Layout changed, main display now has {count} spaces");
    });

    println!("Watching for space changes, press Ctrl-C to stop.");
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}
