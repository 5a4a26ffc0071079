use crate::archive::index::Piece;
use crate::archive::paths::resolve_paths;
use crate::archive::sections;
use crate::archive::warn;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct AddOptions {
    /// Folder the piece's PDFs currently live in; its basename becomes the
    /// piece name.
    pub location: PathBuf,
    pub composer: String,
    pub arranger: String,
}

pub fn run(opts: &AddOptions) -> Result<()> {
    if !opts.location.is_dir() {
        bail!("{} is not a directory", opts.location.display());
    }
    let Some(raw_name) = opts.location.file_name().and_then(|n| n.to_str()) else {
        bail!(
            "cannot derive a piece name from {}",
            opts.location.display()
        );
    };

    let paths = resolve_paths()?;
    let mut index = crate::commands::load_current(&paths)?;

    let piece = Piece::new(
        raw_name,
        opts.composer.clone(),
        opts.arranger.clone(),
        sections::probe(&opts.location, raw_name),
    );
    let name = piece.name().to_string();
    index.insert(piece);
    crate::commands::save_current(&index)?;

    copy_section_files(&opts.location, raw_name, &paths.root.join(&name), &name)?;
    Ok(())
}

/// Place the piece's section PDFs into its folder under the watched root.
/// Individual copy failures are warnings; the piece is already cataloged.
fn copy_section_files(
    source_dir: &Path,
    source_name: &str,
    destination_dir: &Path,
    name: &str,
) -> Result<()> {
    fs::create_dir_all(destination_dir)
        .with_context(|| format!("failed to create {}", destination_dir.display()))?;

    for section in sections::ALL {
        let source = section.file_path(source_dir, source_name);
        if !source.is_file() {
            continue;
        }
        let destination = destination_dir.join(section.file_name(name));
        match fs::copy(&source, &destination) {
            Ok(_) => println!("copied {}", destination.display()),
            Err(err) => warn::emit(
                "COPY_FAILED",
                &destination.display().to_string(),
                &err.to_string(),
            ),
        }
    }
    Ok(())
}
