//! Initialize a data repository.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use vvdata_store::{StoreConfig, DEFAULT_CONFIG_PATH};

/// Run the init command.
pub async fn run(root: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing vvdata in {}", root.display());

    let config_path = root.join(DEFAULT_CONFIG_PATH);

    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
    } else {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create tools directory")?;
        }
        fs::write(&config_path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        tracing::info!("Created {}", config_path.display());
    }

    // Lay out the directories the update step writes into
    let config = StoreConfig::load(root, Some(config_path.as_path()))?;
    let state_dir = config.state_path.parent().unwrap_or(root).to_path_buf();

    for dir in [config.output_dir(), config.manifests_dir(), state_dir] {
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            tracing::info!("Created {}", dir.display());
        }
    }

    if !config.raw_dir.exists() {
        tracing::warn!(
            "Raw directory {} does not exist yet; set paths.raw_dir in {}",
            config.raw_dir.display(),
            config_path.display()
        );
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'vvdata update --dry-run' to preview the first import.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# vvdata configuration

[paths]
# Directory with raw verse files (verse-001.txt, verse_2.md, verse3.json, ...)
raw_dir = "../veda-vedanta-raw/raw_data/mvr/vishnu"

# Root of the data repository
data_dir = "."

# Processed-file state
state = "vv/state/raw_index.json"

# Static host headers file
headers = "_headers"

[collection]
# Collection identifier, used for record ids
name = "mvr/vishnu"

# Public path the verse files are served under
base = "/vv/data/mvr/vishnu"

# Raw file parser: "markers", "json" or "auto" (by extension)
parser = "markers"

[output]
manifest_name = "vishnu.json"
index_name = "index.json"
write_headers = true

[git]
autocommit = true
autopush = false
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn scaffolds_config_and_directories() {
        let temp = tempdir().unwrap();

        run(temp.path(), false).await.unwrap();

        assert!(temp.path().join(DEFAULT_CONFIG_PATH).exists());
        assert!(temp.path().join("vv/data/mvr/vishnu").is_dir());
        assert!(temp.path().join("vv/manifests").is_dir());
        assert!(temp.path().join("vv/state").is_dir());
    }

    #[tokio::test]
    async fn keeps_existing_config_without_yes() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join(DEFAULT_CONFIG_PATH);
        fs::create_dir_all(config_path.parent().unwrap()).unwrap();
        fs::write(&config_path, "[collection]\nname = \"custom\"\n").unwrap();

        run(temp.path(), false).await.unwrap();
        assert!(fs::read_to_string(&config_path).unwrap().contains("custom"));

        run(temp.path(), true).await.unwrap();
        assert!(fs::read_to_string(&config_path).unwrap().contains("mvr/vishnu"));
    }

    #[test]
    fn default_config_matches_built_in_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("vvdata.toml");
        fs::write(&path, DEFAULT_CONFIG).unwrap();

        let config = StoreConfig::load(temp.path(), Some(path.as_path())).unwrap();

        assert_eq!(config.base, "vv/data/mvr/vishnu");
        assert_eq!(config.collection, "mvr/vishnu");
        assert_eq!(config.parser, "markers");
        assert_eq!(config.manifest_name, "vishnu.json");
        assert!(config.write_headers);
        assert!(config.git_autocommit);
        assert!(!config.git_autopush);
    }
}
