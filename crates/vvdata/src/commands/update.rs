//! One-shot update command.

use std::path::Path;

use anyhow::Result;
use vvdata_store::{StoreConfig, UpdateOptions, UpdateOutcome, UpdateReport, Updater};

/// Load configuration and build an updater for a repository.
pub fn updater(root: &Path, config: Option<&Path>) -> Result<Updater> {
    let store_config = StoreConfig::load(root, config)?;
    tracing::debug!("Resolved config: {:?}", store_config);
    Ok(Updater::new(store_config)?)
}

/// Log the summary of a finished run.
pub fn log_report(updater: &Updater, report: &UpdateReport, dry_run: bool) {
    if report.outcome != UpdateOutcome::Updated {
        return;
    }

    let config = updater.config();
    let verb = if dry_run { "Parsed" } else { "Wrote" };

    tracing::info!(
        "{} {} updated verse(s) in {}ms",
        verb,
        report.written,
        report.duration_ms
    );
    if !report.skipped.is_empty() {
        tracing::warn!("Skipped {} unnumbered file(s)", report.skipped.len());
    }
    if let Some(total) = report.total {
        tracing::info!("Collection now lists {} verse(s)", total);
    }
    tracing::info!("Data dir: {}", config.output_dir().display());
    tracing::info!("Manifest: {}", config.manifest_path().display());
    tracing::info!("State:    {}", config.state_path.display());
}

/// Run the update command.
pub async fn run(root: &Path, config: Option<&Path>, options: UpdateOptions) -> Result<()> {
    let updater = updater(root, config)?;

    if options.dry_run {
        tracing::info!("Dry run: no files will be written");
    }

    let report = updater.run(&options)?;
    log_report(&updater, &report, options.dry_run);

    Ok(())
}
