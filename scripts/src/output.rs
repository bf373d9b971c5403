//! Console helpers shared by the demo binaries.

use serde_json::Value;

/// Print a section header
pub fn print_header(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("  {}", title);
    println!("{}\n", "=".repeat(60));
}

/// Print success message
pub fn print_success(msg: &str) {
    println!("✅ {}", msg);
}

/// Print error message
pub fn print_error(msg: &str) {
    println!("❌ {}", msg);
}

/// Print info message
pub fn print_info(msg: &str) {
    println!("ℹ️  {}", msg);
}

/// Print waiting message
pub fn print_waiting(msg: &str) {
    println!("⏳ {}", msg);
}

/// Print a labelled JSON value (balances, quotes)
pub fn print_json(label: &str, value: &Value) {
    let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    println!("{}:\n{}", label, rendered);
}
