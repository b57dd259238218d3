//! Delta update of the verse store from raw files.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use walkdir::WalkDir;

use vvdata_parse::{
    is_verse_file, output_file_name, verse_number, ParseError, ParserRegistry, VerseRecord,
};

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::git::{self, CommitOutcome};
use crate::hash::sha256_file;
use crate::output::{ensure_headers, now_utc, scan_index, write_json, Manifest};
use crate::state::{FileEntry, RawIndex};

/// Per-run switches.
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Parse and report, but write nothing
    pub dry_run: bool,

    /// Reprocess every raw file regardless of recorded digests
    pub force_all: bool,

    /// Push after committing, even if the config disables it
    pub push: bool,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateOutcome {
    /// The raw directory holds no verse files
    NoVerseFiles,
    /// Every verse file matches its recorded digest
    #[default]
    NoChanges,
    /// Changed files were processed
    Updated,
}

/// Result of an update run.
#[derive(Debug, Default)]
pub struct UpdateReport {
    pub outcome: UpdateOutcome,

    /// Verse files found in the raw directory
    pub candidates: usize,

    /// Raw files selected for processing
    pub changed: Vec<String>,

    /// Verse-named files skipped because their number does not fit in `u32`
    pub skipped: Vec<String>,

    /// Verse records generated (written unless dry-run)
    pub written: usize,

    /// Verses listed in the rebuilt index (None in dry-run)
    pub total: Option<usize>,

    pub commit: CommitOutcome,

    pub duration_ms: u64,
}

/// A verse file discovered in the raw directory.
#[derive(Debug, Clone)]
struct Candidate {
    verse: u32,
    path: PathBuf,
    /// Name relative to the raw directory; the state key
    rel: String,
}

#[derive(Debug)]
struct Change {
    candidate: Candidate,
    digest: String,
}

/// Updates the verse store from raw files.
pub struct Updater {
    config: StoreConfig,
    registry: ParserRegistry,
}

impl Updater {
    /// Create an updater, resolving the configured parser.
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let registry = ParserRegistry::new(&config.parser)?;
        Ok(Self { config, registry })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Run one update.
    pub fn run(&self, options: &UpdateOptions) -> Result<UpdateReport, StoreError> {
        let start = Instant::now();
        let config = &self.config;

        if !config.raw_dir.is_dir() {
            return Err(StoreError::RawDirNotFound(
                config.raw_dir.display().to_string(),
            ));
        }

        let output_dir = config.output_dir();
        let manifests_dir = config.manifests_dir();

        if !options.dry_run {
            fs::create_dir_all(&output_dir).map_err(|e| StoreError::WriteError(e.to_string()))?;
            fs::create_dir_all(&manifests_dir)
                .map_err(|e| StoreError::WriteError(e.to_string()))?;

            if config.write_headers && ensure_headers(&config.headers_path)? {
                tracing::info!("Wrote headers to {}", config.headers_path.display());
            }
        }

        let mut report = UpdateReport::default();

        let (candidates, skipped) = self.discover();
        report.candidates = candidates.len();
        for rel in &skipped {
            tracing::warn!("Skip unnumbered file: {}", rel);
        }
        report.skipped = skipped;
        if candidates.is_empty() {
            tracing::info!("No verse files found in {}", config.raw_dir.display());
            report.outcome = UpdateOutcome::NoVerseFiles;
            report.duration_ms = start.elapsed().as_millis() as u64;
            return Ok(report);
        }

        let mut state = RawIndex::load(&config.state_path)?;

        let changes = detect_changes(candidates, &state, options.force_all)?;
        if changes.is_empty() {
            tracing::info!("No changes detected. Nothing to do.");
            report.outcome = UpdateOutcome::NoChanges;
            report.duration_ms = start.elapsed().as_millis() as u64;
            return Ok(report);
        }

        report.changed = changes.iter().map(|c| c.candidate.rel.clone()).collect();
        tracing::info!(
            "{} file(s) to process: {:?}",
            report.changed.len(),
            report.changed
        );

        // Parse in parallel, then write in raw-name order so that collisions
        // on the same verse number resolve deterministically.
        let now = now_utc();
        let parsed: Vec<Result<VerseRecord, StoreError>> = changes
            .par_iter()
            .map(|change| self.parse_change(change, &now))
            .collect();

        let mut targets: HashMap<String, String> = HashMap::new();

        for (change, result) in changes.iter().zip(parsed) {
            let candidate = &change.candidate;
            let record = result?;
            let verse = candidate.verse;

            let target = output_file_name(verse);
            if let Some(previous) = targets.insert(target.clone(), candidate.rel.clone()) {
                tracing::warn!(
                    "{} and {} both produce {}; keeping {}",
                    previous,
                    candidate.rel,
                    target,
                    candidate.rel
                );
            }

            if options.dry_run {
                tracing::info!("Would write {}", target);
            } else {
                write_json(&output_dir.join(&target), &record)?;
                tracing::debug!("Wrote {}", target);
            }

            report.written += 1;
            state.record(
                candidate.rel.clone(),
                FileEntry {
                    sha256: change.digest.clone(),
                    verse,
                    target,
                },
            );
        }

        report.outcome = UpdateOutcome::Updated;

        if !options.dry_run {
            let index = scan_index(&config.collection, &output_dir);
            let manifest = Manifest::new(&config.base, index.count, &now_utc());
            report.total = Some(index.count);

            write_json(&config.index_path(), &index)?;
            write_json(&config.manifest_path(), &manifest)?;

            if let Some(commit) = git::head_commit(&config.raw_dir) {
                state.last_parsed_commit = commit;
            }
            state.save(&config.state_path)?;

            let push = config.git_autopush || options.push;
            report.commit = git::commit_and_push(
                &config.root,
                &[output_dir.clone(), manifests_dir.clone(), config.state_path.clone()],
                config.git_autocommit,
                push,
            );

            if report.commit.committed {
                tracing::info!("Committed changes to git.");
            }
            if push {
                if report.commit.pushed {
                    tracing::info!("Pushed changes.");
                } else {
                    tracing::warn!("Push failed or nothing to push.");
                }
            }
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        Ok(report)
    }

    /// Find verse files directly inside the raw directory, sorted by name.
    ///
    /// Files whose verse number is unusable are returned separately and never
    /// take part in change detection.
    fn discover(&self) -> (Vec<Candidate>, Vec<String>) {
        let mut skipped = Vec::new();
        let candidates = WalkDir::new(&self.config.raw_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                let name = e.file_name().to_str()?.to_string();
                if !is_verse_file(&name) {
                    return None;
                }
                let Some(verse) = verse_number(&name) else {
                    skipped.push(name);
                    return None;
                };
                Some(Candidate {
                    verse,
                    path: e.path().to_path_buf(),
                    rel: name,
                })
            })
            .collect();

        (candidates, skipped)
    }

    /// Parse and normalize one changed file.
    fn parse_change(&self, change: &Change, now: &str) -> Result<VerseRecord, StoreError> {
        let candidate = &change.candidate;
        let verse = candidate.verse;

        let parse_error = |source: ParseError| StoreError::ParseError {
            path: candidate.path.display().to_string(),
            source,
        };

        let parser = self.registry.for_path(&candidate.path).map_err(parse_error)?;
        let source = read_raw(&candidate.path)?;
        let mut record = parser
            .parse(&source, &output_file_name(verse))
            .map_err(parse_error)?;

        record.normalize(&self.config.collection, verse, now);
        Ok(record)
    }
}

fn read_raw(path: &Path) -> Result<String, StoreError> {
    fs::read_to_string(path).map_err(|e| StoreError::ReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Select the candidates whose content differs from the recorded state.
fn detect_changes(
    candidates: Vec<Candidate>,
    state: &RawIndex,
    force_all: bool,
) -> Result<Vec<Change>, StoreError> {
    let mut changes = Vec::new();

    for candidate in candidates {
        let digest = sha256_file(&candidate.path).map_err(|e| StoreError::ReadError {
            path: candidate.path.display().to_string(),
            message: e.to_string(),
        })?;

        if force_all || state.is_changed(&candidate.rel, &digest) {
            changes.push(Change { candidate, digest });
        }
    }

    Ok(changes)
}
