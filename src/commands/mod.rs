pub mod add;
pub mod delete;
pub mod print;
pub mod sync;
pub mod update;
pub mod use_archive;

use crate::archive::index::ArchiveIndex;
use crate::archive::paths::ArchivePaths;
use crate::archive::workbook;
use anyhow::{Context, Result};

/// Load the catalog from the workbook of the active archive.
pub(crate) fn load_current(paths: &ArchivePaths) -> Result<ArchiveIndex> {
    workbook::load(&paths.workbook)
        .with_context(|| format!("failed to load {}", paths.workbook.display()))
}

/// Persist the catalog back to the workbook it was loaded from.
pub(crate) fn save_current(index: &ArchiveIndex) -> Result<()> {
    workbook::save(index).context("failed to save the archive workbook")
}
