use thiserror::Error;

/// Base URL of the shared Dropbox folder the piece folders live under.
pub const ARCHIVE_BASE_URL: &str = "https://www.dropbox.com/home/Note arkivet";

/// The value packed into a name cell: a link target plus the label shown in
/// the sheet. Persisted as a two-argument `HYPERLINK` formula; the label is
/// the authoritative display name when reading the workbook back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCell {
    pub target: String,
    pub label: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseLinkError {
    #[error("empty name cell")]
    Empty,
    #[error("expected 2 quoted segments in name cell, found {0}")]
    QuoteCount(usize),
}

impl LinkCell {
    /// Link cell for a piece folder under the archive's base URL.
    pub fn for_piece(name: &str) -> Self {
        Self {
            target: format!("{ARCHIVE_BASE_URL}/{name}"),
            label: name.to_string(),
        }
    }

    /// Textual form stored in the workbook.
    pub fn formula(&self) -> String {
        format!("HYPERLINK(\"{}\", \"{}\")", self.target, self.label)
    }

    /// Decompose a formula string. The grammar is deliberately loose about
    /// everything except the quoted segments: exactly two must be present,
    /// the first is the target and the second the label.
    pub fn parse(formula: &str) -> Result<Self, ParseLinkError> {
        if formula.is_empty() {
            return Err(ParseLinkError::Empty);
        }

        let mut segments = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        for ch in formula.chars() {
            if ch == '"' {
                if in_quotes {
                    segments.push(std::mem::take(&mut current));
                }
                in_quotes = !in_quotes;
            } else if in_quotes {
                current.push(ch);
            }
        }

        if segments.len() != 2 {
            return Err(ParseLinkError::QuoteCount(segments.len()));
        }

        let mut segments = segments.into_iter();
        Ok(Self {
            target: segments.next().unwrap_or_default(),
            label: segments.next().unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula_round_trips() {
        let cell = LinkCell::for_piece("Gammel Jegermarsj");
        assert_eq!(
            cell.formula(),
            "HYPERLINK(\"https://www.dropbox.com/home/Note arkivet/Gammel Jegermarsj\", \"Gammel Jegermarsj\")"
        );
        assert_eq!(LinkCell::parse(&cell.formula()).expect("parse"), cell);
    }

    #[test]
    fn label_is_the_second_segment() {
        let parsed = LinkCell::parse("HYPERLINK(\"https://example/x\", \"X\")").expect("parse");
        assert_eq!(parsed.target, "https://example/x");
        assert_eq!(parsed.label, "X");
    }

    #[test]
    fn rejects_empty_cells() {
        assert_eq!(LinkCell::parse(""), Err(ParseLinkError::Empty));
    }

    #[test]
    fn rejects_wrong_segment_counts() {
        assert_eq!(
            LinkCell::parse("HYPERLINK(\"only one\")"),
            Err(ParseLinkError::QuoteCount(1))
        );
        assert_eq!(
            LinkCell::parse("CONCAT(\"a\", \"b\", \"c\")"),
            Err(ParseLinkError::QuoteCount(3))
        );
        assert_eq!(LinkCell::parse("Plain text"), Err(ParseLinkError::QuoteCount(0)));
    }
}
