use crate::archive::paths::resolve_paths;
use crate::archive::reconcile;
use anyhow::Result;

pub fn run() -> Result<()> {
    let paths = resolve_paths()?;
    let out = reconcile::sync(&paths)?;
    println!(
        "synced {}: {} folders scanned, {} pieces added, {} cataloged",
        paths.root.display(),
        out.folders_scanned,
        out.pieces_added,
        out.pieces_total,
    );
    Ok(())
}
