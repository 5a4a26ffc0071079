use crate::archive::paths::resolve_paths;
use crate::archive::sections;
use anyhow::Result;

#[derive(Debug, Clone)]
pub struct UpdateOptions {
    pub name: String,
    pub composer: Option<String>,
    pub arranger: Option<String>,
    /// Overwrite composer and arranger with the given values even when empty.
    pub force: bool,
}

pub fn run(opts: &UpdateOptions) -> Result<()> {
    let paths = resolve_paths()?;
    let mut index = crate::commands::load_current(&paths)?;

    let mut piece = index.get(&opts.name)?;
    if opts.force {
        piece.composer = opts.composer.clone().unwrap_or_default();
        piece.arranger = opts.arranger.clone().unwrap_or_default();
    } else {
        if let Some(composer) = opts.composer.as_deref().filter(|c| !c.is_empty()) {
            piece.composer = composer.to_string();
        }
        if let Some(arranger) = opts.arranger.as_deref().filter(|a| !a.is_empty()) {
            piece.arranger = arranger.to_string();
        }
    }

    // Section flags always track the piece folder's current contents.
    let name = piece.name().to_string();
    let folder = paths.root.join(&name);
    let [has_score, has_woodwind, has_brass, has_percussion] = sections::probe(&folder, &name);
    piece.has_score = has_score;
    piece.has_woodwind = has_woodwind;
    piece.has_brass = has_brass;
    piece.has_percussion = has_percussion;

    index.update(&piece)?;
    crate::commands::save_current(&index)
}
