//! Inspect command implementation.

use anyhow::{Context, Result};
use console::style;
use std::fs;
use std::path::Path;

use qlower_cqasm::{Listing, ListingInstruction, parse};

/// Execute the inspect command.
pub fn execute(path: &Path) -> Result<()> {
    let listing = load_listing(path)?;

    println!(
        "{} {} ({})",
        style("→").cyan().bold(),
        style(&listing.name).green(),
        path.display()
    );
    println!("  Namespace:   {}", listing.namespace);
    println!("  Sections:    {}", listing.sections().join(", "));

    let instructions = listing.instructions();
    let classical = instructions
        .iter()
        .filter(|inst| !matches!(inst, ListingInstruction::Op(_)))
        .count();
    println!(
        "  Instructions: {} ({} classical)",
        instructions.len(),
        classical
    );

    if listing.is_scheduled() {
        println!("  Bundles:     {}", listing.num_bundles());
        println!("  Skipped:     {} cycles", listing.skipped_cycles());
        println!(
            "  Total:       {}",
            style(format!("{} cycles", listing.total_cycles())).yellow()
        );
    } else {
        println!("  Schedule:    {}", style("none (flat listing)").dim());
    }

    Ok(())
}

/// Read and parse a listing file.
pub fn load_listing(path: &Path) -> Result<Listing> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    parse(&source).with_context(|| format!("Failed to parse listing: {}", path.display()))
}
