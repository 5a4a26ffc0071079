use crate::archive::name::{self, NormalizedName};
use crate::error::ArchiveError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One catalog row. The comparable key is fixed at construction; every other
/// field is plain data the caller may edit before handing the piece back to
/// [`ArchiveIndex::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    name: String,
    comparable: String,
    pub composer: String,
    pub arranger: String,
    pub has_score: bool,
    pub has_woodwind: bool,
    pub has_brass: bool,
    pub has_percussion: bool,
}

impl Piece {
    pub fn new(
        raw_name: &str,
        composer: impl Into<String>,
        arranger: impl Into<String>,
        sections: [bool; 4],
    ) -> Self {
        let NormalizedName {
            display,
            comparable,
        } = name::normalize(raw_name);
        let [has_score, has_woodwind, has_brass, has_percussion] = sections;
        Self {
            name: display,
            comparable,
            composer: composer.into(),
            arranger: arranger.into(),
            has_score,
            has_woodwind,
            has_brass,
            has_percussion,
        }
    }

    /// Display name, NFC-normalized.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The equality/ordering key: lowercased NFC name.
    pub fn comparable(&self) -> &str {
        &self.comparable
    }

    pub fn sections(&self) -> [bool; 4] {
        [
            self.has_score,
            self.has_woodwind,
            self.has_brass,
            self.has_percussion,
        ]
    }
}

/// The archive index: catalog rows ordered and deduplicated by comparable
/// key, plus the binding to the workbook the rows were loaded from (if any).
///
/// Two invariants hold at every point: iteration is ascending by comparable
/// key, and no two rows share one. Both fall out of the backing `BTreeMap`
/// and the insert-if-absent policy.
#[derive(Debug, Default)]
pub struct ArchiveIndex {
    rows: BTreeMap<String, Piece>,
    source: Option<PathBuf>,
}

impl ArchiveIndex {
    /// Fresh, empty, unbound index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Workbook this index reads from and saves to, once loaded or saved-as.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub(crate) fn bind(&mut self, path: &Path) {
        self.source = Some(path.to_path_buf());
    }

    /// Insert-if-absent. When a row with the same comparable key already
    /// exists the call leaves it untouched and returns `false`; a duplicate
    /// is a defined no-op, not an error.
    pub fn insert(&mut self, piece: Piece) -> bool {
        match self.rows.entry(piece.comparable.clone()) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(piece);
                true
            }
        }
    }

    /// Replace composer, arranger, and section flags of the row sharing
    /// `piece`'s comparable key. The stored name and key are never altered;
    /// changing a piece's identity takes a delete followed by an insert.
    pub fn update(&mut self, piece: &Piece) -> Result<(), ArchiveError> {
        let row = self
            .rows
            .get_mut(&piece.comparable)
            .ok_or_else(|| ArchiveError::NotFound(piece.name.clone()))?;
        row.composer = piece.composer.clone();
        row.arranger = piece.arranger.clone();
        row.has_score = piece.has_score;
        row.has_woodwind = piece.has_woodwind;
        row.has_brass = piece.has_brass;
        row.has_percussion = piece.has_percussion;
        Ok(())
    }

    /// Look up a row by (raw) name and return a copy of it.
    pub fn get(&self, raw_name: &str) -> Result<Piece, ArchiveError> {
        self.rows
            .get(&name::comparable(raw_name))
            .cloned()
            .ok_or_else(|| ArchiveError::NotFound(raw_name.to_string()))
    }

    /// Remove a row by (raw) name.
    pub fn remove(&mut self, raw_name: &str) -> Result<(), ArchiveError> {
        self.rows
            .remove(&name::comparable(raw_name))
            .map(|_| ())
            .ok_or_else(|| ArchiveError::NotFound(raw_name.to_string()))
    }

    /// All rows in comparable-key order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
