use crate::archive::warn;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Per-user configuration: a single `location` entry naming the watched
/// archive root. Anything unreadable counts as "no config" and the caller
/// falls back to the default root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    pub location: PathBuf,
}

pub fn read(path: &Path) -> Option<ArchiveConfig> {
    if !path.exists() {
        return None;
    }
    let raw = fs::read_to_string(path).ok()?;
    match toml::from_str::<ArchiveConfig>(&raw) {
        Ok(config) => Some(config),
        Err(err) => {
            warn::emit(
                "CONFIG_MALFORMED",
                &path.display().to_string(),
                &err.to_string(),
            );
            None
        }
    }
}

pub fn write(path: &Path, location: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let config = ArchiveConfig {
        location: location.to_path_buf(),
    };
    let data = toml::to_string(&config).context("failed to render config")?;
    fs::write(path, data).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_then_read_round_trips_the_location() {
        let tmp = tempdir().expect("tempdir");
        let config_path = tmp.path().join("conf/config.toml");

        write(&config_path, Path::new("/data/arkiv")).expect("write");
        let config = read(&config_path).expect("read");
        assert_eq!(config.location, PathBuf::from("/data/arkiv"));
    }

    #[test]
    fn absent_config_reads_as_none() {
        let tmp = tempdir().expect("tempdir");
        assert!(read(&tmp.path().join("missing.toml")).is_none());
    }

    #[test]
    fn malformed_config_reads_as_none() {
        let tmp = tempdir().expect("tempdir");
        let config_path = tmp.path().join("config.toml");
        fs::write(&config_path, "location = [broken").expect("write");
        assert!(read(&config_path).is_none());
    }
}
