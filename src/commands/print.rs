use crate::archive::index::Piece;
use crate::archive::name;
use crate::archive::paths::resolve_paths;
use crate::archive::workbook::{COLUMNS, bool_token};
use anyhow::Result;

#[derive(Debug, Clone, Default)]
pub struct PrintOptions {
    /// When set, print only the piece with this (normalized) name.
    pub name: Option<String>,
}

pub fn run(opts: &PrintOptions) -> Result<()> {
    let paths = resolve_paths()?;
    let index = crate::commands::load_current(&paths)?;

    let mut header = String::new();
    for (i, column) in COLUMNS.iter().enumerate() {
        if i < 3 {
            header.push_str(&format!("{column:<26}"));
        } else {
            header.push_str(&format!("{column:>10} "));
        }
    }
    println!("{}", header.trim_end());

    let filter = opts.name.as_deref().map(name::comparable);
    for piece in index.pieces() {
        if let Some(filter) = &filter {
            if piece.comparable() != filter {
                continue;
            }
        }
        println!("{}", render_row(piece));
    }

    println!("\nNumber of rows: {}", index.len());
    Ok(())
}

fn render_row(piece: &Piece) -> String {
    let [score, woodwind, brass, percussion] = piece.sections();
    format!(
        "{:<25.25} {:<25.25} {:<25.25} {:>10} {:>10} {:>10} {:>10}",
        piece.name(),
        piece.composer,
        piece.arranger,
        bool_token(score),
        bool_token(woodwind),
        bool_token(brass),
        bool_token(percussion),
    )
}

#[cfg(test)]
mod tests {
    use super::render_row;
    use crate::archive::index::Piece;

    #[test]
    fn rows_render_with_tokens_and_truncation() {
        let piece = Piece::new(
            "A very very very long piece name indeed",
            "Composer",
            "",
            [true, false, true, false],
        );
        let row = render_row(&piece);
        assert!(row.starts_with("A very very very long pie "));
        assert!(row.contains("Ja"));
        assert!(row.contains("Nei"));
    }
}
