// Tabstash platform paths for macOS
// Data: ~/Library/Application Support/Tabstash

use std::env;
use std::path::PathBuf;

/// Returns the data directory for Tabstash on macOS.
/// `~/Library/Application Support/Tabstash`
pub fn get_data_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
        .join("Library")
        .join("Application Support")
        .join("Tabstash")
}
