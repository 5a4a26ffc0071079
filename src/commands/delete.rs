use crate::archive::paths::resolve_paths;
use anyhow::Result;

#[derive(Debug, Clone)]
pub struct DeleteOptions {
    pub name: String,
}

pub fn run(opts: &DeleteOptions) -> Result<()> {
    let paths = resolve_paths()?;
    let mut index = crate::commands::load_current(&paths)?;
    index.remove(&opts.name)?;
    crate::commands::save_current(&index)
}
