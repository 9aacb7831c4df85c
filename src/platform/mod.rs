// Tabstash platform abstraction
// Provides the platform-specific data directory for Windows, macOS, and Linux.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific implementation at compile time.

use std::env;
use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "TABSTASH_DATA_DIR";

/// Database file name inside the data directory.
pub const DATABASE_FILE: &str = "tabstash.db";

/// Returns the platform-specific data directory for Tabstash.
///
/// - **Linux**: `~/.local/share/tabstash` (or `$XDG_DATA_HOME/tabstash`)
/// - **macOS**: `~/Library/Application Support/Tabstash`
/// - **Windows**: `%APPDATA%/Tabstash`
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
}

/// Data directory honoring `TABSTASH_DATA_DIR`, falling back to the platform default.
pub fn resolve_data_dir() -> PathBuf {
    data_dir_from(env::var(DATA_DIR_ENV).ok())
}

fn data_dir_from(override_dir: Option<String>) -> PathBuf {
    match override_dir {
        Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => get_data_dir(),
    }
}
