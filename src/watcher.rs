//! Style store watcher.
//! Signals a reload whenever the preset file is written from outside.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{RecvTimeoutError, Sender};
use std::time::Duration;

use log::{debug, info};
use notify::{Event, EventKind, RecursiveMode, Watcher};

use crate::error::{Error, Result};

/// The watched store file changed on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreChanged;

/// Watch the store file. Blocks the calling thread. The parent directory is
/// watched so editors that replace the file by rename are still seen.
pub fn watch_store<T: From<StoreChanged>>(path: &Path, tx: Sender<T>) -> Result<()> {
    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;
    let Some(file_name) = path.file_name().map(|n| n.to_os_string()) else {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} names no file", path.display()),
        )));
    };

    let (notify_tx, notify_rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        if let Ok(event) = res {
            let _ = notify_tx.send(event);
        }
    })?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    info!("Watching style store {}", path.display());

    loop {
        let event = match notify_rx.recv_timeout(Duration::from_secs(5)) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "store watcher disconnected",
                )));
            }
        };
        if !touches_store(&event, &file_name) {
            continue;
        }
        debug!("Style store changed: {:?}", event.kind);
        if tx.send(StoreChanged.into()).is_err() {
            return Ok(());
        }
    }
}

fn touches_store(event: &Event, file_name: &std::ffi::OsStr) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event.paths.iter().any(|p| p.file_name() == Some(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn only_store_writes_count() {
        let name = std::ffi::OsStr::new("styles.toml");
        assert!(touches_store(&event(EventKind::Modify(ModifyKind::Any), "/d/styles.toml"), name));
        assert!(touches_store(&event(EventKind::Create(CreateKind::File), "/d/styles.toml"), name));
        assert!(!touches_store(&event(EventKind::Modify(ModifyKind::Any), "/d/other.toml"), name));
        assert!(!touches_store(&event(EventKind::Remove(RemoveKind::File), "/d/styles.toml"), name));
    }
}
