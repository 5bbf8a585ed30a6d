//! Configuration file watcher for hot reload.
//!
//! A single save usually produces several notify events. Each event reloads
//! and validates the file, and only a config that differs from the last one
//! forwarded is sent on.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config as NotifyConfig, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::Config;

/// Monitors the configuration file and emits every valid, changed version.
pub struct ConfigWatcher {
    path: PathBuf,
    current: Config,
    update_tx: mpsc::UnboundedSender<Config>,
}

impl ConfigWatcher {
    /// `current` is the config already in effect; reloads equal to it are
    /// dropped.
    pub fn new(path: &Path, current: Config) -> (Self, mpsc::UnboundedReceiver<Config>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (
            Self {
                path: path.to_path_buf(),
                current,
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self {
            path,
            mut current,
            update_tx,
        } = self;
        let watched = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    match load_config(&path) {
                        Ok(loaded) => {
                            if let Some(next) = changed(&mut current, loaded) {
                                tracing::info!(path = %path.display(), "Config reloaded");
                                let _ = update_tx.send(next);
                            }
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to reload config, keeping current configuration");
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            NotifyConfig::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&watched, RecursiveMode::NonRecursive)?;
        tracing::info!(path = %watched.display(), "Config watcher started");
        Ok(watcher)
    }
}

/// Record `loaded` as current and return it, unless it equals `current`.
fn changed(current: &mut Config, loaded: Config) -> Option<Config> {
    if *current == loaded {
        return None;
    }
    *current = loaded.clone();
    Some(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_reloads_are_dropped() {
        let mut current = Config::default();
        assert!(changed(&mut current, Config::default()).is_none());

        let mut next = Config::default();
        next.server.driver_name = "fake".into();
        assert_eq!(changed(&mut current, next.clone()), Some(next.clone()));
        assert_eq!(current, next);
        assert!(changed(&mut current, next).is_none());
    }
}
