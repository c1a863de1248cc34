//! Normalization keys used by the external lookup tools.

/// First whitespace-separated token, with `/()\=|+^_` and digits
/// stripped, lowercased.
///
/// ```
/// use tlgcorpus::normalize::normalize_strict;
///
/// assert_eq!(normalize_strict("a)/nqrwpos"), "anqrwpos");
/// ```
pub fn normalize_strict(s: &str) -> String {
    let Some(first) = s.split_whitespace().next() else {
        return String::new();
    };
    first
        .chars()
        .filter(|c| !matches!(c, '/' | '(' | ')' | '\\' | '=' | '|' | '+' | '^' | '_') && !c.is_ascii_digit())
        .flat_map(char::to_lowercase)
        .collect()
}

/// [`normalize_strict`] with `e`, `h`, `o`, `w` folded to `a`.
///
/// ```
/// use tlgcorpus::normalize::normalize_fuzzy;
///
/// assert_eq!(normalize_fuzzy("a)/nqrwpos"), "anqrapas");
/// ```
pub fn normalize_fuzzy(s: &str) -> String {
    normalize_strict(s)
        .chars()
        .map(|c| match c {
            'e' | 'h' | 'o' | 'w' => 'a',
            other => other,
        })
        .collect()
}

/// Reparse a decimal string, stripping leading zeros when possible;
/// otherwise returned unchanged.
///
/// ```
/// use tlgcorpus::normalize::normalize_id;
///
/// assert_eq!(normalize_id("001"), "1");
/// assert_eq!(normalize_id("abc"), "abc");
/// ```
pub fn normalize_id(s: &str) -> String {
    match s.parse::<i64>() {
        Ok(n) => n.to_string(),
        Err(_) => s.to_string(),
    }
}

/// Latin-context strict key: like [`normalize_strict`] but without the
/// diacritic-marker strip (Latin titles carry no Beta Code diacritics).
pub fn normalize_latin(s: &str) -> String {
    let Some(first) = s.split_whitespace().next() else {
        return String::new();
    };
    first.to_lowercase()
}
