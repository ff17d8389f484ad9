//! Address normalization and two-tier matching.
//!
//! Tier 1 compares the normalized strings directly (equality or containment).
//! Tier 2 falls back to the geographic components: sub-district, district,
//! province and postal code. A component passes when either side lacks it or
//! both sides agree; the address matches when all four pass.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::domain::RawValue;
use super::text::normalize;

const BANGKOK: &str = "กรุงเทพมหานคร";

/// Abbreviations written with a trailing period, expanded before punctuation is stripped.
const DOTTED_ABBREVIATIONS: &[(&str, &str)] = &[
    ("กทม", BANGKOK),
    ("ปณ", "รหัสไปรษณีย์"),
    ("ถ", "ถนน"),
    ("ซ", "ซอย"),
    ("ม", "หมู่"),
    ("ต", "ตำบล"),
    ("ข", "แขวง"),
    ("อ", "อำเภอ"),
    ("จ", "จังหวัด"),
];

/// Abbreviations written as standalone tokens without a period.
const BARE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("กทม", BANGKOK),
    ("กรุงเทพฯ", BANGKOK),
    ("ปณ", "รหัสไปรษณีย์"),
    ("ถ", "ถนน"),
    ("ซ", "ซอย"),
    ("ม", "หมู่"),
    ("ต", "ตำบล"),
    ("ข", "แขวง"),
    ("อ", "อำเภอ"),
    ("จ", "จังหวัด"),
];

struct AddressPatterns {
    dotted: Regex,
    sub_district: Regex,
    district: Regex,
    province: Regex,
    postal_code: Regex,
}

fn patterns() -> &'static AddressPatterns {
    static PATTERNS: OnceLock<AddressPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let abbreviations = DOTTED_ABBREVIATIONS
            .iter()
            .map(|(short, _)| regex::escape(short))
            .collect::<Vec<_>>()
            .join("|");
        AddressPatterns {
            dotted: Regex::new(&format!(r"(^|\s)({abbreviations})\."))
                .expect("dotted abbreviation pattern"),
            sub_district: Regex::new(r"(?:ตำบล|แขวง)\s*([\p{Thai}a-z0-9]+)")
                .expect("sub-district pattern"),
            district: Regex::new(r"(?:อำเภอ|เขต)\s*([\p{Thai}a-z0-9]+)")
                .expect("district pattern"),
            province: Regex::new(r"จังหวัด\s*([\p{Thai}a-z]+)").expect("province pattern"),
            postal_code: Regex::new(r"(?:^|\D)(\d{5})(?:\D|$)").expect("postal code pattern"),
        }
    })
}

/// Flattens structured addresses; text passes through untouched.
fn flatten(address: &RawValue) -> String {
    match address {
        RawValue::Address(parts) => parts.flatten(),
        other => other.display(),
    }
}

fn expand_dotted(text: &str) -> String {
    patterns()
        .dotted
        .replace_all(text, |caps: &Captures| {
            let expansion = DOTTED_ABBREVIATIONS
                .iter()
                .find(|(short, _)| *short == &caps[2])
                .map(|(_, full)| *full)
                .unwrap_or("");
            format!("{}{}", &caps[1], expansion)
        })
        .into_owned()
}

fn expand_bare(normalized: &str) -> String {
    normalized
        .split(' ')
        .map(|token| {
            BARE_ABBREVIATIONS
                .iter()
                .find(|(short, _)| *short == token)
                .map(|(_, full)| *full)
                .unwrap_or(token)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canonical comparable form of an address. Idempotent.
pub fn normalize_address(address: &RawValue) -> String {
    normalize_address_text(&flatten(address))
}

pub fn normalize_address_text(text: &str) -> String {
    expand_bare(&normalize(&expand_dotted(text)))
}

#[derive(Debug, Default, PartialEq, Eq)]
struct AddressComponents {
    sub_district: Option<String>,
    district: Option<String>,
    province: Option<String>,
    postal_code: Option<String>,
}

impl AddressComponents {
    fn extract(normalized: &str) -> Self {
        let patterns = patterns();
        let capture = |pattern: &Regex| {
            pattern
                .captures(normalized)
                .map(|caps| caps[1].to_string())
        };

        let province = capture(&patterns.province)
            .map(|province| {
                if province.starts_with("กรุงเทพ") {
                    BANGKOK.to_string()
                } else {
                    province
                }
            })
            .or_else(|| normalized.contains("กรุงเทพ").then(|| BANGKOK.to_string()));

        Self {
            sub_district: capture(&patterns.sub_district),
            district: capture(&patterns.district),
            province,
            postal_code: patterns
                .postal_code
                .captures_iter(normalized)
                .last()
                .map(|caps| caps[1].to_string()),
        }
    }

    fn pairs<'a>(&'a self, other: &'a Self) -> [(&'a Option<String>, &'a Option<String>); 4] {
        [
            (&self.sub_district, &other.sub_district),
            (&self.district, &other.district),
            (&self.province, &other.province),
            (&self.postal_code, &other.postal_code),
        ]
    }

    /// A missing component on either side is a wildcard.
    fn compatible_with(&self, other: &Self) -> bool {
        self.pairs(other).iter().all(|(left, right)| match (left, right) {
            (Some(left), Some(right)) => left == right,
            _ => true,
        })
    }
}

/// Symmetric address comparison with the two-tier fallback.
pub fn compare_addresses(left: &RawValue, right: &RawValue) -> bool {
    compare_normalized(&normalize_address(left), &normalize_address(right))
}

fn compare_normalized(left: &str, right: &str) -> bool {
    if left.is_empty() || right.is_empty() {
        return false;
    }
    if left == right || left.contains(right) || right.contains(left) {
        return true;
    }

    AddressComponents::extract(left).compatible_with(&AddressComponents::extract(right))
}
