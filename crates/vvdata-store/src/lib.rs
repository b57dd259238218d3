//! Verse data store.
//!
//! Keeps a directory of generated verse JSON files in step with a directory
//! of raw verse files: detects changed raw files by content digest, parses
//! them, rewrites the collection index and manifest, and commits the result.

pub mod config;
pub mod error;
pub mod git;
pub mod hash;
pub mod output;
pub mod state;
pub mod updater;

pub use config::{
    ConfigError, StoreConfig, CONFIG_ENV_VAR, DEFAULT_CONFIG_PATH, LEGACY_CONFIG_ENV_VAR,
};
pub use error::StoreError;
pub use git::CommitOutcome;
pub use output::{CollectionIndex, IndexItem, Manifest};
pub use state::{FileEntry, RawIndex};
pub use updater::{UpdateOptions, UpdateOutcome, UpdateReport, Updater};
