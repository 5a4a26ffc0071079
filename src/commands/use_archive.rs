use crate::archive::config;
use crate::archive::index::ArchiveIndex;
use crate::archive::paths::{resolve_paths, workbook_in};
use crate::archive::workbook;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct UseOptions {
    pub location: PathBuf,
}

/// Make `location` the active archive root: seed an empty workbook there when
/// none exists yet (an existing catalog is left alone) and point the per-user
/// config at it.
pub fn run(opts: &UseOptions) -> Result<()> {
    if !opts.location.is_dir() {
        bail!("{} is not a directory", opts.location.display());
    }
    let location = fs::canonicalize(&opts.location)
        .with_context(|| format!("failed to resolve {}", opts.location.display()))?;

    let workbook_path = workbook_in(&location);
    if !workbook_path.exists() {
        workbook::save_as(&mut ArchiveIndex::new(), &workbook_path)
            .with_context(|| format!("failed to create {}", workbook_path.display()))?;
    }

    let paths = resolve_paths()?;
    config::write(&paths.config_path, &location)?;

    println!("archive folder set to {}", location.display());
    Ok(())
}
