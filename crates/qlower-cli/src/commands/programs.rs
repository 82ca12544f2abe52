//! Programs command implementation.

use console::style;

use crate::programs::CATALOG;

/// Execute the programs command.
pub fn execute() {
    println!("{}", style("Available programs:").bold());
    for entry in CATALOG {
        println!(
            "  {:<16} {}",
            style(entry.name).cyan(),
            entry.description
        );
    }
}
