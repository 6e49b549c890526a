use sha2::{Digest, Sha256};

use crate::helpers::compact_text;

/// Canonicalized payload fields for one verse record, in fingerprint
/// field order. Building this first keeps the canonicalization rules in
/// one place and makes equality-of-content checks cheap for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalPayload {
    pub book_code: String,
    pub chapter: u32,
    pub designator: String,
    pub sanskrit: String,
    pub glosses: String,
    pub translation: String,
    pub commentary: String,
}

impl CanonicalPayload {
    pub fn new(
        book_code: &str,
        chapter: u32,
        designator: &str,
        sanskrit: Option<&str>,
        glosses: Option<&str>,
        translation: &str,
        commentary: Option<&str>,
    ) -> Self {
        CanonicalPayload {
            book_code: book_code.trim().to_uppercase(),
            chapter,
            designator: compact_text(designator),
            sanskrit: compact_text(sanskrit.unwrap_or("")),
            glosses: compact_text(glosses.unwrap_or("")),
            translation: compact_text(translation),
            commentary: compact_text(commentary.unwrap_or("")),
        }
    }

    /// The exact byte sequence that is hashed. Field order and the '|'
    /// separator are fixed; absent optional fields are empty strings.
    pub fn canonical_string(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}|{}",
            self.book_code,
            self.chapter,
            self.designator,
            self.sanskrit,
            self.glosses,
            self.translation,
            self.commentary,
        )
    }

    /// SHA-256 over the canonical string, lowercase hex.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_string().as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_string_field_order() {
        let p = CanonicalPayload::new(
            "bg",
            2,
            "13",
            Some("dehino 'smin"),
            Some("dehinah—of the embodied"),
            "As the embodied soul",
            None,
        );
        assert_eq!(
            p.canonical_string(),
            "BG|2|13|dehino 'smin|dehinah—of the embodied|As the embodied soul|"
        );
    }

    #[test]
    fn test_fingerprint_stable_across_whitespace_variants() {
        let a = CanonicalPayload::new("BG", 2, "13", Some("dehino 'smin"), None, "As  the\n embodied soul ", None);
        let b = CanonicalPayload::new("BG", 2, "13", Some("dehino 'smin"), None, "As the embodied soul", None);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_distinguishes_content() {
        let a = CanonicalPayload::new("BG", 2, "13", None, None, "one translation", None);
        let b = CanonicalPayload::new("BG", 2, "14", None, None, "one translation", None);
        let c = CanonicalPayload::new("BG", 3, "13", None, None, "one translation", None);
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_ne!(b.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_fingerprint_is_lowercase_hex() {
        let p = CanonicalPayload::new("BG", 1, "1", None, None, "text", None);
        let fp = p.fingerprint();
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
