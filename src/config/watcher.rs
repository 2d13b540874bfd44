//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::config::loader::read_config;

/// Drops candidates identical to the last one forwarded.
///
/// A single save commonly raises several modify events (truncate, write,
/// metadata); only the first parse of each distinct content goes through.
#[derive(Debug, Default)]
pub struct ReloadFilter {
    last: Option<Value>,
}

impl ReloadFilter {
    /// Returns `true` if `candidate` differs from the previously accepted one
    /// and records it.
    pub fn accept(&mut self, candidate: &Value) -> bool {
        if self.last.as_ref() == Some(candidate) {
            return false;
        }
        self.last = Some(candidate.clone());
        true
    }
}

/// A watcher that monitors the configuration file for changes.
///
/// Parsed candidates are forwarded unvalidated; acceptance is decided by
/// [`ConfigStore::replace`](crate::config::ConfigStore::replace).
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<Value>,
    filter: ReloadFilter,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for parsed configuration trees.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<Value>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
                filter: ReloadFilter::default(),
            },
            update_rx,
        )
    }

    /// Treat `current` as already delivered, so an event that re-reads the
    /// same content is not forwarded.
    pub fn seeded_with(mut self, current: &Value) -> Self {
        self.filter.accept(current);
        self
    }

    /// Start watching the file on notify's background thread.
    ///
    /// The returned watcher must be kept alive for events to keep flowing.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { path, update_tx, mut filter } = self;
        let watched = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!("Watch error: {:?}", e);
                        return;
                    }
                };
                if !(event.kind.is_modify() || event.kind.is_create()) {
                    return;
                }
                match read_config(&path) {
                    Ok(candidate) if filter.accept(&candidate) => {
                        tracing::info!(path = ?path, "Config file changed, forwarding for validation");
                        let _ = update_tx.send(candidate);
                    }
                    Ok(_) => tracing::debug!(path = ?path, "Config content unchanged, skipping"),
                    // Partial writes land here; the next event re-reads the finished file.
                    Err(e) => tracing::warn!(path = ?path, "Failed to read config: {}", e),
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&watched, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?watched, "Config watcher started");
        Ok(watcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reload_filter_skips_repeats() {
        let mut filter = ReloadFilter::default();
        let first = serde_json::json!({ "edgemicro": { "port": 8000 } });
        let second = serde_json::json!({ "edgemicro": { "port": 9000 } });

        assert!(filter.accept(&first));
        assert!(!filter.accept(&first));
        assert!(filter.accept(&second));
        assert!(!filter.accept(&second));
        assert!(filter.accept(&first));
    }

    #[tokio::test]
    async fn test_forwards_parsed_config_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "edgemicro": { "port": 8000 } }"#).unwrap();

        let (watcher, mut updates) = ConfigWatcher::new(&path);
        let _guard = watcher.run().unwrap();

        let mut file = std::fs::OpenOptions::new().write(true).truncate(true).open(&path).unwrap();
        file.write_all(br#"{ "edgemicro": { "port": 9000 } }"#).unwrap();
        file.sync_all().unwrap();
        drop(file);

        // Editors can emit several events per save; wait for the final content.
        let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
        loop {
            let next = tokio::time::timeout_at(deadline, updates.recv())
                .await
                .expect("no config update received")
                .expect("watcher channel closed");
            if next["edgemicro"]["port"] == 9000 {
                break;
            }
        }
    }
}
