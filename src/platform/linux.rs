// Tabstash platform paths for Linux
// Data: ~/.local/share/tabstash

use std::env;
use std::path::PathBuf;

/// Returns the data directory for Tabstash on Linux.
/// Uses `$XDG_DATA_HOME/tabstash` if set, otherwise `~/.local/share/tabstash`.
pub fn get_data_dir() -> PathBuf {
    data_dir_from(env::var("XDG_DATA_HOME").ok(), env::var("HOME").ok())
}

fn data_dir_from(xdg_data_home: Option<String>, home: Option<String>) -> PathBuf {
    match xdg_data_home {
        Some(xdg) => PathBuf::from(xdg).join("tabstash"),
        None => PathBuf::from(home.unwrap_or_else(|| String::from("/tmp")))
            .join(".local")
            .join("share")
            .join("tabstash"),
    }
}
