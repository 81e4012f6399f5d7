//! Error types for the I/O edges (config, style store, window, feed socket).
//!
//! Drawing itself never fails; only loading and presenting can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("style store parse error: {0}")]
    StoreParse(String),

    #[error("style store write error: {0}")]
    StoreWrite(#[from] toml::ser::Error),

    #[error("X11 error: {0}")]
    X11(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("watcher error: {0}")]
    Watch(#[from] notify::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
