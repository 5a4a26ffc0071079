use crate::archive::index::{ArchiveIndex, Piece};
use crate::archive::paths::ArchivePaths;
use crate::archive::sections;
use crate::archive::warn;
use crate::archive::workbook;
use anyhow::{Context, Result};
use std::fs;
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOutcome {
    pub folders_scanned: usize,
    pub pieces_added: usize,
    pub pieces_total: usize,
}

/// Grow the catalog from the watched root.
///
/// Every immediate subdirectory becomes a candidate row (name from the folder,
/// section flags from its PDFs, no composer/arranger). Candidates merge into
/// the loaded catalog through insert-if-absent, so the pass is strictly
/// additive: it never refreshes flags or metadata of pieces already cataloged
/// and never drops rows whose folders disappeared. The merged rows are copied
/// into a fresh index before persisting, and the previous workbook is kept as
/// a best-effort `.bak` copy.
pub fn sync(paths: &ArchivePaths) -> Result<SyncOutcome> {
    let mut merged = workbook::load(&paths.workbook)
        .with_context(|| format!("failed to load {}", paths.workbook.display()))?;

    let mut out = SyncOutcome::default();
    for entry in WalkDir::new(&paths.root).min_depth(1).max_depth(1) {
        let entry =
            entry.with_context(|| format!("failed to walk {}", paths.root.display()))?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            warn::emit(
                "FOLDER_SKIPPED",
                &entry.file_name().to_string_lossy(),
                "folder name is not valid unicode",
            );
            continue;
        };

        out.folders_scanned += 1;
        let candidate = Piece::new(name, "", "", sections::probe(entry.path(), name));
        if merged.insert(candidate) {
            out.pieces_added += 1;
        }
    }

    let mut fresh = ArchiveIndex::new();
    for piece in merged.pieces() {
        fresh.insert(piece.clone());
    }

    backup_workbook(paths);
    workbook::save_as(&mut fresh, &paths.workbook)
        .with_context(|| format!("failed to save {}", paths.workbook.display()))?;

    out.pieces_total = fresh.len();
    Ok(out)
}

fn backup_workbook(paths: &ArchivePaths) {
    if !paths.workbook.exists() {
        return;
    }
    if let Err(err) = fs::copy(&paths.workbook, &paths.backup) {
        warn::emit(
            "BACKUP_FAILED",
            &paths.backup.display().to_string(),
            &err.to_string(),
        );
    }
}
