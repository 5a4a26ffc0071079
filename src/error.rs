use thiserror::Error;

/// Failures the archive core reports to callers instead of aborting.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("no piece named `{0}` in the archive")]
    NotFound(String),
    #[error("row {row}: {reason}")]
    MalformedCell { row: u32, reason: String },
    #[error("archive is not backed by a workbook; load one or save-as first")]
    Unbound,
    #[error("workbook unreadable: {0}")]
    Workbook(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ArchiveError {
    pub fn malformed_cell(row: u32, reason: impl Into<String>) -> Self {
        Self::MalformedCell {
            row,
            reason: reason.into(),
        }
    }
}
