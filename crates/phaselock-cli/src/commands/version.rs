//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - paired error-rate benchmark for signal-derived phase corrections",
        style("Phaselock").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  phaselock-ir           Circuit intermediate representation");
    println!("  phaselock-hal          Backend abstraction");
    println!("  phaselock-adapter-sim  Statevector simulator");
    println!("  phaselock-bench        Signal, runner and statistics");
    println!("  phaselock-cli          Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
