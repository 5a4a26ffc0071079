use crate::archive::config;
use anyhow::Result;
use std::env;
use std::path::{Path, PathBuf};

pub const WORKBOOK_FILE_NAME: &str = "_arkiv.xlsx";

/// Resolved locations for one invocation: the per-user config file, the
/// watched archive root, and the workbook plus its backup inside that root.
#[derive(Debug, Clone)]
pub struct ArchivePaths {
    pub config_path: PathBuf,
    pub root: PathBuf,
    pub workbook: PathBuf,
    pub backup: PathBuf,
}

fn env_or_default_path(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback,
    }
}

fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("HOME directory could not be resolved"))?;
    Ok(home.join(".notearkiv").join("config.toml"))
}

pub fn workbook_in(root: &Path) -> PathBuf {
    root.join(WORKBOOK_FILE_NAME)
}

pub fn backup_for(workbook: &Path) -> PathBuf {
    let mut name = workbook.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Resolve all paths for this invocation. The watched root comes from
/// `NOTEARKIV_ROOT`, then the config file, then the system temp directory;
/// the config file location itself honors `NOTEARKIV_CONFIG_PATH`.
pub fn resolve_paths() -> Result<ArchivePaths> {
    let config_path = env_or_default_path("NOTEARKIV_CONFIG_PATH", default_config_path()?);
    let root = env_or_default_path(
        "NOTEARKIV_ROOT",
        config::read(&config_path)
            .map(|c| c.location)
            .unwrap_or_else(env::temp_dir),
    );
    let workbook = workbook_in(&root);
    let backup = backup_for(&workbook);

    Ok(ArchivePaths {
        config_path,
        root,
        workbook,
        backup,
    })
}
