use crate::commands;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sheet music archive CLI.
///
/// Pieces live as folders inside a watched archive root, each holding up to
/// four section PDFs (`<name> - partitur|treblås|messing|slagverk.pdf`). The
/// catalog is persisted as `_arkiv.xlsx` in the same root, with the name
/// column hyperlinking back to the piece's folder.
#[derive(Parser)]
#[command(
    name = "notearkiv",
    about = "Catalog sheet music folders into a hyperlinked xlsx overview",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set the active archive folder (seeds an empty catalog when needed).
    Use {
        /// Archive root directory.
        path: PathBuf,
    },
    /// Print the catalog, or a single piece when a name is given.
    Print {
        /// Piece name to look up (case- and accent-normalized).
        name: Option<String>,
    },
    /// Add a piece from a folder of section PDFs.
    Add {
        /// Folder holding the piece's PDFs; its basename becomes the name.
        path: PathBuf,
        /// Composer of the piece.
        #[arg(short, long, default_value = "")]
        composer: String,
        /// Arranger of the piece.
        #[arg(short, long, default_value = "")]
        arranger: String,
    },
    /// Update a cataloged piece's metadata and re-probe its section files.
    Update {
        /// Name of the piece to update.
        name: String,
        /// Composer of the piece.
        #[arg(short, long)]
        composer: Option<String>,
        /// Arranger of the piece.
        #[arg(short, long)]
        arranger: Option<String>,
        /// Overwrite composer and arranger even with empty values.
        #[arg(short, long)]
        force: bool,
    },
    /// Delete a piece from the catalog.
    Delete {
        /// Name of the piece to delete.
        name: String,
    },
    /// Catalog archive folders not yet in the workbook.
    Sync,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Use { path } => commands::use_archive::run(&commands::use_archive::UseOptions {
            location: path,
        }),
        Commands::Print { name } => commands::print::run(&commands::print::PrintOptions { name }),
        Commands::Add {
            path,
            composer,
            arranger,
        } => commands::add::run(&commands::add::AddOptions {
            location: path,
            composer,
            arranger,
        }),
        Commands::Update {
            name,
            composer,
            arranger,
            force,
        } => commands::update::run(&commands::update::UpdateOptions {
            name,
            composer,
            arranger,
            force,
        }),
        Commands::Delete { name } => {
            commands::delete::run(&commands::delete::DeleteOptions { name })
        }
        Commands::Sync => commands::sync::run(),
    }
}
