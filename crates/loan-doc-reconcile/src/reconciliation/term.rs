//! Semester and academic-year extraction from free text.

use std::sync::OnceLock;

use regex::Regex;

use super::text::arabic_digits;

struct TermPatterns {
    phrased: Vec<Regex>,
    word_then_digit: Regex,
    digit_then_word: Regex,
    explicit_year: Regex,
    year_range: Regex,
    buddhist_year: Regex,
}

fn patterns() -> &'static TermPatterns {
    static PATTERNS: OnceLock<TermPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| TermPatterns {
        phrased: [
            r"ภาคเรียนที่\s*([1-3])",
            r"ภาคการศึกษาที่\s*([1-3])",
            r"ภาคการเรียนที่\s*([1-3])",
            r"เทอมที่\s*([1-3])",
            r"ภาค\s*([1-3])\s*/",
            r"เทอม\s*([1-3])",
            r"(?i)semester\s*([1-3])",
            r"(?i)term\s*([1-3])",
            r"(?:^|\D)([1-3])\s*/\s*25\d{2}(?:\D|$)",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("term pattern"))
        .collect(),
        word_then_digit: Regex::new(r"(?i)(?:เทอม|ภาค|term|semester)\D{0,12}?([1-3])")
            .expect("word-then-digit pattern"),
        digit_then_word: Regex::new(r"(?i)([1-3])\s*(?:เทอม|ภาค|term|semester)")
            .expect("digit-then-word pattern"),
        explicit_year: Regex::new(r"(?i)(?:ปีการศึกษา|academic\s+year)\s*(\d{4})")
            .expect("explicit year pattern"),
        year_range: Regex::new(r"(\d{4})\s*[-\x{2013}/]\s*\d{4}").expect("year range pattern"),
        buddhist_year: Regex::new(r"(?:^|\D)(25\d{2})(?:\D|$)").expect("buddhist year pattern"),
    })
}

/// Semester number (`"1"`, `"2"` or `"3"`) mentioned in the text.
pub fn extract_term(text: &str) -> Option<String> {
    let text = arabic_digits(text);
    let trimmed = text.trim();
    if matches!(trimmed, "1" | "2" | "3") {
        return Some(trimmed.to_string());
    }

    let patterns = patterns();
    patterns
        .phrased
        .iter()
        .chain([&patterns.word_then_digit, &patterns.digit_then_word])
        .find_map(|pattern| pattern.captures(trimmed))
        .map(|caps| caps[1].to_string())
}

/// Academic year mentioned in the text, as written (usually Buddhist Era).
pub fn extract_academic_year(text: &str) -> Option<String> {
    let text = arabic_digits(text);
    let patterns = patterns();
    [
        &patterns.explicit_year,
        &patterns.year_range,
        &patterns.buddhist_year,
    ]
    .into_iter()
    .find_map(|pattern| pattern.captures(&text))
    .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_digit_is_a_term() {
        assert_eq!(extract_term(" 2 ").as_deref(), Some("2"));
        assert_eq!(extract_term("4"), None);
    }

    #[test]
    fn thai_phrasings_yield_the_term() {
        assert_eq!(extract_term("ภาคเรียนที่ 1 ปีการศึกษา 2567").as_deref(), Some("1"));
        assert_eq!(extract_term("ภาคการศึกษาที่ ๒/๒๕๖๖").as_deref(), Some("2"));
        assert_eq!(extract_term("เทอม 3").as_deref(), Some("3"));
        assert_eq!(extract_term("2/2567").as_deref(), Some("2"));
        assert_eq!(extract_term("Semester 1, 2024").as_deref(), Some("1"));
    }

    #[test]
    fn digit_near_term_word_is_last_resort() {
        assert_eq!(extract_term("ค่าเทอม สำหรับ 2 ภาค").as_deref(), Some("2"));
        assert_eq!(extract_term("ไม่มีข้อมูล"), None);
    }

    #[test]
    fn academic_year_patterns_in_order() {
        assert_eq!(
            extract_academic_year("ภาคเรียนที่ 1 ปีการศึกษา 2567").as_deref(),
            Some("2567")
        );
        assert_eq!(
            extract_academic_year("Academic Year 2024").as_deref(),
            Some("2024")
        );
        assert_eq!(extract_academic_year("2566-2567").as_deref(), Some("2566"));
        assert_eq!(extract_academic_year("1/2567").as_deref(), Some("2567"));
        assert_eq!(extract_academic_year("ไม่ระบุ"), None);
    }
}
