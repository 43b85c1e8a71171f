use anyhow::{Context, Result};
use pageidmap_source::TomlConfigStore;
use pageidmap_source::config_store::DEFAULT_CONFIG;
use std::path::PathBuf;

pub fn run(output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            TomlConfigStore::new(&path)
                .write_template()
                .with_context(|| format!("Failed to write config to '{}'", path.display()))?;
            tracing::info!(path = %path.display(), "Wrote default configuration");
        }
        None => print!("{DEFAULT_CONFIG}"),
    }
    Ok(())
}
