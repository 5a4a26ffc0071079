use unicode_normalization::UnicodeNormalization;

/// A piece name in its two canonical forms: the display form shown to users
/// and persisted in the workbook, and the comparable form used as the sole
/// equality/ordering key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedName {
    pub display: String,
    pub comparable: String,
}

/// Canonicalize a raw piece name. The display form is the NFC composition of
/// the input; the comparable form lowercases the display form. Total over all
/// strings, including the empty one.
pub fn normalize(raw: &str) -> NormalizedName {
    let display: String = raw.nfc().collect();
    let comparable = display.to_lowercase();
    NormalizedName {
        display,
        comparable,
    }
}

/// Shortcut for callers that only need the lookup key.
pub fn comparable(raw: &str) -> String {
    normalize(raw).comparable
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn composes_decomposed_input() {
        // "Ødegård" with the å spelled as a + combining ring above.
        let decomposed = "Ødega\u{030a}rd";
        let n = normalize(decomposed);
        assert_eq!(n.display, "Ødegård");
        assert_eq!(n.comparable, "ødegård");
    }

    #[test]
    fn comparable_is_lowercased_display() {
        let n = normalize("Gammel Jegermarsj");
        assert_eq!(n.display, "Gammel Jegermarsj");
        assert_eq!(n.comparable, "gammel jegermarsj");
    }

    #[test]
    fn empty_input_is_legal() {
        let n = normalize("");
        assert_eq!(n.display, "");
        assert_eq!(n.comparable, "");
    }

    #[test]
    fn case_variants_share_a_key() {
        assert_eq!(normalize("Ødegård").comparable, normalize("ødegård").comparable);
    }
}
