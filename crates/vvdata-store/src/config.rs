//! Store configuration.
//!
//! Settings come from one file, located in this order:
//! 1. an explicit path (when it exists),
//! 2. the `VVDATA_CONFIG` environment variable, or the older
//!    `VVEDATA_CONFIG` when the former is unset or empty,
//! 3. `tools/vvdata.toml` under the repository root,
//! 4. the legacy `tools/config.env` under the repository root.
//!
//! `.toml` files use the sectioned format below; anything else is read as
//! `KEY=VALUE` lines. Relative paths resolve against the repository root.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "VVDATA_CONFIG";

/// Older spelling of [`CONFIG_ENV_VAR`], still honored as a fallback.
pub const LEGACY_CONFIG_ENV_VAR: &str = "VVEDATA_CONFIG";

/// Default config location, relative to the repository root.
pub const DEFAULT_CONFIG_PATH: &str = "tools/vvdata.toml";

/// Legacy `KEY=VALUE` config location, relative to the repository root.
pub const LEGACY_CONFIG_PATH: &str = "tools/config.env";

/// Resolved configuration for an update run.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Repository root the commit step runs in
    pub root: PathBuf,

    /// Directory holding raw verse files
    pub raw_dir: PathBuf,

    /// Data repository directory
    pub data_dir: PathBuf,

    /// Public base path of the collection, without surrounding slashes
    /// (e.g., "vv/data/mvr/vishnu")
    pub base: String,

    /// Collection identifier (e.g., "mvr/vishnu")
    pub collection: String,

    /// Parser name, or "auto" to pick by extension
    pub parser: String,

    pub manifest_name: String,

    pub index_name: String,

    /// Write the static host `_headers` file
    pub write_headers: bool,

    pub git_autocommit: bool,

    pub git_autopush: bool,

    /// Processed-file state (raw_index.json)
    pub state_path: PathBuf,

    pub headers_path: PathBuf,
}

impl StoreConfig {
    /// Load configuration for a repository.
    ///
    /// A missing config file yields defaults; a malformed one is an error.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let env_value = config_from_env(|key| std::env::var(key).ok());
        let settings = match locate(root, explicit, env_value) {
            Some(path) if path.exists() => {
                let settings = Settings::read(&path)?;
                tracing::info!("Loaded config from {}", path.display());
                settings
            }
            Some(path) => {
                tracing::warn!("Config file not found: {}, using defaults", path.display());
                Settings::default()
            }
            None => Settings::default(),
        };

        Ok(settings.resolve(root))
    }

    /// Directory the verse JSON files and index are written to.
    pub fn output_dir(&self) -> PathBuf {
        self.data_dir.join(&self.base)
    }

    /// Directory holding collection manifests.
    pub fn manifests_dir(&self) -> PathBuf {
        self.data_dir.join("vv").join("manifests")
    }

    pub fn index_path(&self) -> PathBuf {
        self.output_dir().join(&self.index_name)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.manifests_dir().join(&self.manifest_name)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Settings::default().resolve(Path::new("."))
    }
}

/// Config path named by the environment, preferring [`CONFIG_ENV_VAR`].
fn config_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    [CONFIG_ENV_VAR, LEGACY_CONFIG_ENV_VAR]
        .into_iter()
        .filter_map(lookup)
        .find(|value| !value.trim().is_empty())
}

/// Pick the config file to read, if any.
fn locate(root: &Path, explicit: Option<&Path>, env_value: Option<String>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        tracing::warn!(
            "Config file {} does not exist, falling back",
            path.display()
        );
    }

    if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
        return Some(PathBuf::from(value));
    }

    [DEFAULT_CONFIG_PATH, LEGACY_CONFIG_PATH]
        .iter()
        .map(|rel| root.join(rel))
        .find(|path| path.exists())
}

/// Unresolved settings shared by both file formats.
#[derive(Debug, Default, PartialEq)]
struct Settings {
    raw_dir: Option<String>,
    data_dir: Option<String>,
    base: Option<String>,
    collection: Option<String>,
    parser: Option<String>,
    manifest_name: Option<String>,
    index_name: Option<String>,
    write_headers: Option<bool>,
    git_autocommit: Option<bool>,
    git_autopush: Option<bool>,
    state_path: Option<String>,
    headers_path: Option<String>,
}

impl Settings {
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

        if is_toml {
            let file: ConfigFile = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            Ok(file.into())
        } else {
            Ok(Self::from_env_pairs(&parse_env_file(&content)))
        }
    }

    fn from_env_pairs(raw: &HashMap<String, String>) -> Self {
        let get = |key: &str| raw.get(key).cloned();
        let flag = |key: &str| raw.get(key).map(|v| parse_bool(v));

        Self {
            raw_dir: get("RAW_DIR"),
            data_dir: get("DATA_DIR"),
            base: get("BASE"),
            collection: get("COLLECTION"),
            parser: get("PARSER"),
            manifest_name: get("MANIFEST_NAME"),
            index_name: get("INDEX_NAME"),
            write_headers: flag("WRITE_HEADERS"),
            git_autocommit: flag("GIT_AUTOCOMMIT"),
            git_autopush: flag("GIT_AUTOPUSH"),
            state_path: get("STATE_PATH"),
            headers_path: get("HEADERS_PATH"),
        }
    }

    fn resolve(self, root: &Path) -> StoreConfig {
        let path = |value: Option<String>, default: &str| {
            let p = PathBuf::from(non_empty(value).unwrap_or_else(|| default.to_string()));
            if p.is_absolute() {
                p
            } else {
                root.join(p)
            }
        };
        let text = |value: Option<String>, default: &str| {
            non_empty(value).unwrap_or_else(|| default.to_string())
        };

        StoreConfig {
            root: root.to_path_buf(),
            raw_dir: path(self.raw_dir, "../veda-vedanta-raw/raw_data/mvr/vishnu"),
            data_dir: path(self.data_dir, "."),
            base: text(self.base, "/vv/data/mvr/vishnu")
                .trim_matches('/')
                .to_string(),
            collection: text(self.collection, "mvr/vishnu"),
            parser: text(self.parser, "markers"),
            manifest_name: text(self.manifest_name, "vishnu.json"),
            index_name: text(self.index_name, "index.json"),
            write_headers: self.write_headers.unwrap_or(true),
            git_autocommit: self.git_autocommit.unwrap_or(true),
            git_autopush: self.git_autopush.unwrap_or(false),
            state_path: path(self.state_path, "vv/state/raw_index.json"),
            headers_path: path(self.headers_path, "_headers"),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Parse a boolean the way shell-style config files spell them.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// Parse simple `KEY=VALUE` lines. Comments, blank lines and lines
/// without `=` are skipped; only the first `=` splits.
pub fn parse_env_file(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}

/// Configuration file structure (vvdata.toml).
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    paths: PathsSection,
    #[serde(default)]
    collection: CollectionSection,
    #[serde(default)]
    output: OutputSection,
    #[serde(default)]
    git: GitSection,
}

#[derive(Debug, Deserialize, Default)]
struct PathsSection {
    raw_dir: Option<String>,
    data_dir: Option<String>,
    state: Option<String>,
    headers: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct CollectionSection {
    name: Option<String>,
    base: Option<String>,
    parser: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct OutputSection {
    manifest_name: Option<String>,
    index_name: Option<String>,
    write_headers: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct GitSection {
    autocommit: Option<bool>,
    autopush: Option<bool>,
}

impl From<ConfigFile> for Settings {
    fn from(file: ConfigFile) -> Self {
        Self {
            raw_dir: file.paths.raw_dir,
            data_dir: file.paths.data_dir,
            base: file.collection.base,
            collection: file.collection.name,
            parser: file.collection.parser,
            manifest_name: file.output.manifest_name,
            index_name: file.output.index_name,
            write_headers: file.output.write_headers,
            git_autocommit: file.git.autocommit,
            git_autopush: file.git.autopush,
            state_path: file.paths.state,
            headers_path: file.paths.headers,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to parse config {path}: {message}")]
    ParseError { path: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn defaults_resolve_against_root() {
        let root = Path::new("/repo");
        let config = Settings::default().resolve(root);

        assert_eq!(config.base, "vv/data/mvr/vishnu");
        assert_eq!(config.collection, "mvr/vishnu");
        assert_eq!(config.parser, "markers");
        assert_eq!(
            config.raw_dir,
            PathBuf::from("/repo/../veda-vedanta-raw/raw_data/mvr/vishnu")
        );
        assert_eq!(
            config.state_path,
            PathBuf::from("/repo/vv/state/raw_index.json")
        );
        assert!(config.write_headers);
        assert!(config.git_autocommit);
        assert!(!config.git_autopush);
        assert_eq!(
            config.manifest_path(),
            PathBuf::from("/repo/./vv/manifests/vishnu.json")
        );
    }

    #[test]
    fn parses_env_lines() {
        let raw = parse_env_file(
            "# comment\n\nRAW_DIR = raw/vishnu\nBASE=/vv/data/a=b/\nnot a pair\n",
        );

        assert_eq!(raw.get("RAW_DIR").map(String::as_str), Some("raw/vishnu"));
        assert_eq!(raw.get("BASE").map(String::as_str), Some("/vv/data/a=b/"));
        assert_eq!(raw.len(), 2);
    }

    #[test]
    fn parses_booleans() {
        for yes in ["1", "true", "YES", "y", " On "] {
            assert!(parse_bool(yes), "{yes}");
        }
        for no in ["0", "false", "off", "", "enabled"] {
            assert!(!parse_bool(no), "{no}");
        }
    }

    #[test]
    fn loads_legacy_env_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.env");
        fs::write(
            &path,
            "RAW_DIR=/abs/raw\nBASE=/vv/data/gita/\nCOLLECTION=gita/main\nGIT_AUTOCOMMIT=no\nWRITE_HEADERS=0\n",
        )
        .unwrap();

        let config = StoreConfig::load(temp.path(), Some(path.as_path())).unwrap();

        assert_eq!(config.raw_dir, PathBuf::from("/abs/raw"));
        assert_eq!(config.base, "vv/data/gita");
        assert_eq!(config.collection, "gita/main");
        assert!(!config.git_autocommit);
        assert!(!config.write_headers);
        assert_eq!(config.manifest_name, "vishnu.json");
    }

    #[test]
    fn loads_toml_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("vvdata.toml");
        fs::write(
            &path,
            r#"
[paths]
raw_dir = "raw"

[collection]
name = "mvr/shiva"
base = "vv/data/mvr/shiva"
parser = "auto"

[output]
manifest_name = "shiva.json"

[git]
autopush = true
"#,
        )
        .unwrap();

        let config = StoreConfig::load(temp.path(), Some(path.as_path())).unwrap();

        assert_eq!(config.raw_dir, temp.path().join("raw"));
        assert_eq!(config.collection, "mvr/shiva");
        assert_eq!(config.parser, "auto");
        assert_eq!(config.manifest_name, "shiva.json");
        assert!(config.git_autopush);
        assert!(config.git_autocommit);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("vvdata.toml");
        fs::write(&path, "[paths\nraw_dir = ").unwrap();

        let result = StoreConfig::load(temp.path(), Some(path.as_path()));

        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn locate_prefers_explicit_then_env_then_defaults() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        let explicit = root.join("alt.env");
        fs::write(&explicit, "").unwrap();

        assert_eq!(
            locate(root, Some(explicit.as_path()), Some("/env/path.env".into())),
            Some(explicit.clone())
        );
        assert_eq!(
            locate(root, Some(root.join("missing.env").as_path()), Some("/env/path.env".into())),
            Some(PathBuf::from("/env/path.env"))
        );
        assert_eq!(locate(root, None, None), None);

        fs::create_dir_all(root.join("tools")).unwrap();
        fs::write(root.join(LEGACY_CONFIG_PATH), "").unwrap();
        assert_eq!(locate(root, None, None), Some(root.join(LEGACY_CONFIG_PATH)));

        fs::write(root.join(DEFAULT_CONFIG_PATH), "").unwrap();
        assert_eq!(locate(root, None, None), Some(root.join(DEFAULT_CONFIG_PATH)));
    }

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn env_lookup_falls_back_to_legacy_variable() {

        assert_eq!(
            config_from_env(env(&[("VVEDATA_CONFIG", "/legacy.env")])),
            Some("/legacy.env".to_string())
        );
        assert_eq!(
            config_from_env(env(&[
                ("VVDATA_CONFIG", "/new.toml"),
                ("VVEDATA_CONFIG", "/legacy.env")
            ])),
            Some("/new.toml".to_string())
        );
        assert_eq!(
            config_from_env(env(&[("VVDATA_CONFIG", ""), ("VVEDATA_CONFIG", "/legacy.env")])),
            Some("/legacy.env".to_string())
        );
        assert_eq!(config_from_env(env(&[])), None);
    }
}
