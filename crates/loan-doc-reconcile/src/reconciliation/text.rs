//! Canonical text forms used by every comparator.

const THAI_BLOCK: std::ops::RangeInclusive<char> = '\u{0E00}'..='\u{0E7F}';

/// Honorific prefixes and their canonical form. Longer spellings sit before the
/// shorter ones they share a prefix with so the most specific form wins.
const TITLE_PREFIXES: &[(&str, &str)] = &[
    ("นางสาว", "นางสาว"),
    ("น.ส.", "นางสาว"),
    ("น.ส", "นางสาว"),
    ("นส.", "นางสาว"),
    ("เด็กชาย", "เด็กชาย"),
    ("ด.ช.", "เด็กชาย"),
    ("ด.ช", "เด็กชาย"),
    ("เด็กหญิง", "เด็กหญิง"),
    ("ด.ญ.", "เด็กหญิง"),
    ("ด.ญ", "เด็กหญิง"),
    ("นาง", "นาง"),
    ("นาย", "นาย"),
];

pub fn is_thai(c: char) -> bool {
    THAI_BLOCK.contains(&c)
}

/// Lowercases, drops everything outside Thai/ASCII letters/digits/whitespace and
/// collapses whitespace runs. Idempotent.
pub fn normalize(text: &str) -> String {
    let filtered: String = text
        .chars()
        .filter(|c| is_thai(*c) || c.is_ascii_alphanumeric() || c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keeps only ASCII digits, mapping Thai digits onto them first.
pub fn digits_only(text: &str) -> String {
    text.chars().filter_map(ascii_digit).collect()
}

pub(crate) fn ascii_digit(c: char) -> Option<char> {
    match c {
        '0'..='9' => Some(c),
        '\u{0E50}'..='\u{0E59}' => char::from_u32(c as u32 - 0x0E50 + '0' as u32),
        _ => None,
    }
}

/// Replaces Thai digits with ASCII digits, leaving everything else untouched.
pub(crate) fn arabic_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{0E50}'..='\u{0E59}' => ascii_digit(c).unwrap_or(c),
            other => other,
        })
        .collect()
}

/// Splits a leading honorific off a name, returning its canonical form and the rest.
pub fn split_title(name: &str) -> (Option<&'static str>, &str) {
    let trimmed = name.trim();
    for (prefix, canonical) in TITLE_PREFIXES {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            return (Some(canonical), rest.trim_start());
        }
    }
    (None, trimmed)
}

/// Rewrites a leading honorific to its canonical spelling: `"น.ส. สมหญิง"` and
/// `"นางสาวสมหญิง"` both become `"นางสาว สมหญิง"`.
pub fn strip_title(name: &str) -> String {
    match split_title(name) {
        (Some(title), rest) if rest.is_empty() => title.to_string(),
        (Some(title), rest) => format!("{title} {rest}"),
        (None, rest) => rest.to_string(),
    }
}

/// Name equality tolerant of honorific spelling, spacing and partial names.
/// A name that is only a title counts as blank.
pub fn compare_names(extracted: &str, profile: &str) -> bool {
    names_overlap(&bare_name(extracted), &bare_name(profile))
}

/// Name with any honorific removed, normalized.
pub(crate) fn bare_name(name: &str) -> String {
    normalize(split_title(name).1)
}

/// Whole-word containment between two bare names, either direction.
pub(crate) fn names_overlap(left: &str, right: &str) -> bool {
    if left.is_empty() || right.is_empty() {
        return false;
    }
    if left == right || left.replace(' ', "") == right.replace(' ', "") {
        return true;
    }
    contains_words(left, right) || contains_words(right, left)
}

fn contains_words(haystack: &str, needle: &str) -> bool {
    let haystack: Vec<&str> = haystack.split(' ').collect();
    let needle: Vec<&str> = needle.split(' ').collect();
    needle.len() <= haystack.len() && haystack.windows(needle.len()).any(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_and_filters() {
        assert_eq!(normalize("  Hello,   WORLD!! "), "hello world");
        assert_eq!(normalize("สมชาย\t\tใจดี."), "สมชาย ใจดี");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\u{200b}"), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for sample in [
            "  นาย สมชาย   ใจดี ",
            "123/45 ม.4 ต.คลองเนื้อ",
            "Mixed CASE\u{2014}dash and_underscore",
            "\u{feff}\u{200b}  ",
        ] {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn abbreviated_and_full_miss_titles_agree() {
        assert_eq!(strip_title("น.ส. สมหญิง ใจดี"), strip_title("นางสาวสมหญิง ใจดี"));
        assert_eq!(strip_title("นางสาวสมหญิง ใจดี"), "นางสาว สมหญิง ใจดี");
    }

    #[test]
    fn married_title_is_not_confused_with_unmarried() {
        assert_eq!(split_title("นางสาวสมศรี").0, Some("นางสาว"));
        assert_eq!(split_title("นางสมศรี").0, Some("นาง"));
        assert_eq!(split_title("ด.ญ.มะลิ").0, Some("เด็กหญิง"));
        assert_eq!(split_title("สมศรี").0, None);
    }

    #[test]
    fn names_match_across_title_spellings() {
        assert!(compare_names("น.ส. สมหญิง ใจดี", "นางสาวสมหญิง ใจดี"));
        assert!(compare_names("นายสมชาย ใจดี", "สมชาย ใจดี"));
        assert!(!compare_names("นายสมชาย ใจดี", "สมศักดิ์ ใจดี"));
        assert!(!compare_names("", "สมชาย"));
    }

    #[test]
    fn title_only_or_partial_word_names_do_not_match() {
        assert!(!compare_names("นาง", "นางสาวสมหญิง ใจดี"));
        assert!(!compare_names("น.ส.", "นางสาวสมหญิง ใจดี"));
        assert!(!compare_names("นาย สม", "นายสมศักดิ์ ใจดี"));
        assert!(compare_names("นายสมศักดิ์", "นายสมศักดิ์ ใจดี"));
        assert!(compare_names("สมหญิงใจดี", "นางสาวสมหญิง ใจดี"));
    }

    #[test]
    fn thai_digits_are_mapped() {
        assert_eq!(digits_only("๑-๒๓๔"), "1234");
        assert_eq!(arabic_digits("ภาคเรียนที่ ๒"), "ภาคเรียนที่ 2");
    }
}
