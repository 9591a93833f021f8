//! Display utilities for the CLI

use colored::Colorize;

/// Format a success message
pub fn success(message: &str) -> String {
    format!("✅ {}", message.green().bold())
}

/// Format a warning message
pub fn warning(message: &str) -> String {
    format!("⚠️  {}", message.yellow().bold())
}

/// Format an info message
pub fn info(message: &str) -> String {
    format!("ℹ️  {}", message.blue())
}

/// Format a block dump, 16 bytes per line
pub fn hex_dump(data: &[u8]) -> String {
    data.chunks(16)
        .map(|line| format!("  {}", hex::encode_upper(line)))
        .collect::<Vec<_>>()
        .join("\n")
}
