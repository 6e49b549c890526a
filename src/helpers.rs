use regex::Regex;
use lazy_static::lazy_static;
use html_escape::decode_html_entities;

lazy_static! {
    static ref RE_DOCTYPE: Regex = Regex::new(r"(?i)<!doctype html>").unwrap();
    static ref RE_HEAD: Regex = Regex::new(r"(?s)<head(.*?)</head>").unwrap();
    static ref RE_STYLE: Regex = Regex::new(r"(?s)<style(.*?)</style>").unwrap();
    static ref RE_SCRIPT: Regex = Regex::new(r"(?s)<script(.*?)</script>").unwrap();
    static ref RE_COMMENT: Regex = Regex::new(r"(?s)<!--(.*?)-->").unwrap();
    static ref RE_TAG: Regex = Regex::new(r"</*\w[^>]*>").unwrap();
    // \s also catches no-break spaces left over from &nbsp; entities.
    static ref RE_SPACES: Regex = Regex::new(r"\s+").unwrap();

    // Respect word boundaries for <b> <strong> <i> <em> so that
    // jñā<i>na</i> becomes jñāna, not jñā na.
    static ref RE_TAG_BOUNDARY: Regex = Regex::new(r"(\w*)<(/?)(b|strong|i|em)([^>]*)>(\w*)").unwrap();

    // Longest names first, so that FOURTEEN is not matched as FOUR.
    static ref RE_CHAPTER_MARKER: Regex = Regex::new(
        r"(?i)\bCHAPTER\s+(EIGHTEEN|SEVENTEEN|SIXTEEN|FIFTEEN|FOURTEEN|THIRTEEN|TWELVE|ELEVEN|TEN|NINE|EIGHT|SEVEN|SIX|FIVE|FOUR|THREE|TWO|ONE|\d+)\b"
    ).unwrap();

    // "TEXT 7" or "TEXTS 16-18"; tolerate spaces around the dash.
    static ref RE_DESIGNATOR: Regex = Regex::new(r"(\d+)(?:\s*-\s*(\d+))?").unwrap();
}

/// Strip markup tags, scripts, styles, comments, and decode entities.
pub fn strip_markup(text: &str) -> String {
    // Decode entities first (e.g., &amp; -> &)
    let mut s = decode_html_entities(text).to_string();
    s = RE_DOCTYPE.replace_all(&s, "").to_string();
    s = RE_HEAD.replace_all(&s, "").to_string();
    s = RE_STYLE.replace_all(&s, "").to_string();
    s = RE_SCRIPT.replace_all(&s, "").to_string();
    s = RE_COMMENT.replace_all(&s, "").to_string();
    s = RE_TAG_BOUNDARY.replace_all(&s, |caps: &regex::Captures| {
        format!("{}{}", &caps[1], &caps[5])
    }).to_string();
    // Space before the remaining tags so removing them doesn't join words
    // across elements.
    s = s.replace('<', " <");
    s = RE_TAG.replace_all(&s, " ").to_string();
    compact_text(&s)
}

/// Collapse whitespace runs to a single space and trim.
pub fn compact_text(text: &str) -> String {
    let s = RE_SPACES.replace_all(text, " ").to_string();
    s.trim().to_string()
}

/// Resolve a spelled-out English chapter number. The table covers the
/// book's full chapter range (ONE through EIGHTEEN).
pub fn chapter_word_to_number(word: &str) -> Option<u32> {
    let n = match word.to_uppercase().as_str() {
        "ONE" => 1,
        "TWO" => 2,
        "THREE" => 3,
        "FOUR" => 4,
        "FIVE" => 5,
        "SIX" => 6,
        "SEVEN" => 7,
        "EIGHT" => 8,
        "NINE" => 9,
        "TEN" => 10,
        "ELEVEN" => 11,
        "TWELVE" => 12,
        "THIRTEEN" => 13,
        "FOURTEEN" => 14,
        "FIFTEEN" => 15,
        "SIXTEEN" => 16,
        "SEVENTEEN" => 17,
        "EIGHTEEN" => 18,
        _ => return None,
    };
    Some(n)
}

/// Find a "CHAPTER <N>" marker in plain text and resolve its number.
///
/// Returns `Some((payload, number))` where `number` is `None` when the
/// payload text could not be resolved within the known chapter range.
pub fn match_chapter_marker(text: &str) -> Option<(String, Option<u32>)> {
    let caps = RE_CHAPTER_MARKER.captures(text)?;
    let payload = caps.get(1).map(|m| m.as_str().to_string())?;
    Some((payload.clone(), resolve_chapter_payload(&payload)))
}

/// Digit or word payload to chapter number, bounded to the known range.
pub fn resolve_chapter_payload(payload: &str) -> Option<u32> {
    let n = if let Some(n) = chapter_word_to_number(payload) {
        n
    } else {
        payload.parse::<u32>().ok()?
    };
    if n >= 1 && n <= crate::GITA_CHAPTER_COUNT {
        Some(n)
    } else {
        None
    }
}

/// Iterator over all chapter markers in a fragment, with byte offsets.
pub fn chapter_markers(text: &str) -> Vec<(usize, String, Option<u32>)> {
    RE_CHAPTER_MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let m = caps.get(0)?;
            let payload = caps.get(1)?.as_str().to_string();
            let num = resolve_chapter_payload(&payload);
            Some((m.start(), payload, num))
        })
        .collect()
}

/// Parse a verse designator out of label text, e.g. "TEXT 7" -> "7",
/// "TEXTS 16-18" -> "16-18". Returns None when the label has no number.
pub fn parse_designator(label: &str) -> Option<String> {
    let caps = RE_DESIGNATOR.captures(label)?;
    let start = caps.get(1)?.as_str();
    match caps.get(2) {
        Some(end) => Some(format!("{}-{}", start, end.as_str())),
        None => Some(start.to_string()),
    }
}

/// Expand a designator into the verse numbers it covers ("2-3" -> [2, 3]).
/// An inverted or malformed range yields only the parseable start number.
pub fn designator_numbers(designator: &str) -> Vec<u32> {
    let mut parts = designator.splitn(2, '-');
    let start = match parts.next().and_then(|p| p.trim().parse::<u32>().ok()) {
        Some(n) => n,
        None => return Vec::new(),
    };
    match parts.next().and_then(|p| p.trim().parse::<u32>().ok()) {
        Some(end) if end >= start => (start..=end).collect(),
        _ => vec![start],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup() {
        let html = "<div class=\"data-trs\">My dear <i>Arjuna</i>,&nbsp;now hear.</div>";
        assert_eq!(strip_markup(html), "My dear Arjuna, now hear.");

        // inline emphasis must not split words
        let html = "<div>jñā<i>na</i> and word<b>s</b><!-- note --></div>";
        assert_eq!(strip_markup(html), "jñāna and words");
    }

    #[test]
    fn test_compact_text() {
        assert_eq!(compact_text("  a \n\t b   c "), "a b c");
    }

    #[test]
    fn test_chapter_word_lookup() {
        assert_eq!(chapter_word_to_number("ELEVEN"), Some(11));
        assert_eq!(chapter_word_to_number("fourteen"), Some(14));
        assert_eq!(chapter_word_to_number("TWENTY"), None);
    }

    #[test]
    fn test_match_chapter_marker() {
        assert_eq!(
            match_chapter_marker("CHAPTER ELEVEN The Universal Form"),
            Some(("ELEVEN".to_string(), Some(11)))
        );
        assert_eq!(
            match_chapter_marker("Chapter 18"),
            Some(("18".to_string(), Some(18)))
        );
        // FOURTEEN must not resolve as FOUR
        assert_eq!(
            match_chapter_marker("CHAPTER FOURTEEN"),
            Some(("FOURTEEN".to_string(), Some(14)))
        );
        // Out of the known range: marker found, number unresolved
        assert_eq!(
            match_chapter_marker("CHAPTER 99"),
            Some(("99".to_string(), None))
        );
        assert_eq!(match_chapter_marker("no marker here"), None);
    }

    #[test]
    fn test_parse_designator() {
        assert_eq!(parse_designator("TEXT 1"), Some("1".to_string()));
        assert_eq!(parse_designator("TEXTS 16-18"), Some("16-18".to_string()));
        assert_eq!(parse_designator("TEXTS 2 - 3"), Some("2-3".to_string()));
        assert_eq!(parse_designator("TEXT"), None);
    }

    #[test]
    fn test_designator_numbers() {
        assert_eq!(designator_numbers("7"), vec![7]);
        assert_eq!(designator_numbers("16-18"), vec![16, 17, 18]);
        assert_eq!(designator_numbers("18-16"), vec![18]);
        assert!(designator_numbers("x").is_empty());
    }
}
