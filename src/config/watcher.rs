//! Configuration file watcher for hot reload.
//!
//! Every change to the watched file is loaded, validated and compiled into a
//! [`GatewayState`] off the request path. Only states that compiled reach the
//! server; a broken edit leaves the running gateway untouched.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::observability::metrics;
use crate::state::GatewayState;

/// Watches the gateway's configuration file and emits compiled states.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<GatewayState>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiver that `HttpServer::run` consumes.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<GatewayState>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    tracing::info!(path = ?path, "Config file change detected, reloading");
                    if let Some(state) = compile_file(&path) {
                        if tx.send(state).is_err() {
                            tracing::debug!("Server stopped; dropping configuration update");
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

fn compile_file(path: &Path) -> Option<GatewayState> {
    let config = match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            metrics::record_reload(false);
            tracing::error!(error = %e, "Failed to reload config, keeping current configuration");
            return None;
        }
    };

    match GatewayState::from_config(config) {
        Ok(state) => {
            metrics::record_reload(true);
            tracing::debug!(rules = state.table.len(), slots = state.form.slots(), "Reloaded configuration compiled");
            Some(state)
        }
        Err(e) => {
            metrics::record_reload(false);
            tracing::error!(error = %e, "Reloaded redirects failed to compile, keeping current configuration");
            None
        }
    }
}
