//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - quantum control-flow lowering and cycle scheduling",
        style("qlower").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qlower-ir       Program graph, blocks and operations");
    println!("  qlower-compile  Lowering, scheduling and verification passes");
    println!("  qlower-cqasm    Listing emitter and parser");
    println!("  qlower-cli      Command-line interface");
    println!();
    println!("License:    {}", style(env!("CARGO_PKG_LICENSE")).dim());
}
