//! Watch command: rerun the update whenever raw verse files change.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use vvdata_store::{UpdateOptions, Updater};

use crate::commands::update::{log_report, updater};
use crate::watcher::{RawWatcher, WatchEvent};

/// Quiet period used to coalesce bursts of events into one update.
const DEBOUNCE: Duration = Duration::from_millis(300);

async fn update_once(updater: &Arc<Updater>, options: &UpdateOptions) {
    let task_updater = Arc::clone(updater);
    let task_options = options.clone();

    match tokio::task::spawn_blocking(move || task_updater.run(&task_options)).await {
        Ok(Ok(report)) => log_report(updater, &report, options.dry_run),
        Ok(Err(e)) => tracing::error!("Update failed: {}", e),
        Err(e) => tracing::error!("Update task panicked: {}", e),
    }
}

/// Run the watch command.
pub async fn run(root: &Path, config: Option<&Path>, push: bool) -> Result<()> {
    let updater = Arc::new(updater(root, config)?);
    let options = UpdateOptions {
        push,
        ..Default::default()
    };
    let raw_dir = updater.config().raw_dir.clone();

    let (watcher, mut rx) = RawWatcher::new(&raw_dir)
        .with_context(|| format!("Failed to watch {}", raw_dir.display()))?;

    // Catch up on anything that changed while we were not watching
    update_once(&updater, &options).await;

    tracing::info!("Watching {} for changes (Ctrl+C to stop)", raw_dir.display());

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else {
                    tracing::warn!("Watcher stopped");
                    break;
                };

                match event {
                    WatchEvent::Changed(path) => {
                        tracing::debug!("Changed: {}", path.display());
                    }
                    WatchEvent::Removed(path) => {
                        tracing::warn!(
                            "Removed {}; its generated verse is kept",
                            path.display()
                        );
                        continue;
                    }
                }

                tokio::time::sleep(DEBOUNCE).await;
                while rx.try_recv().is_ok() {}

                update_once(&updater, &options).await;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping watcher");
                break;
            }
        }
    }

    drop(watcher);
    Ok(())
}
