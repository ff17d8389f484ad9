//! Date resolution across the representations the extractor and profile store emit.

use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use regex::Regex;

use super::domain::{RawValue, TimestampValue};
use super::text::arabic_digits;

/// Years above this are Buddhist Era.
const BUDDHIST_ERA_THRESHOLD: i32 = 2500;
const BUDDHIST_ERA_OFFSET: i32 = 543;
/// Calendar days are taken in Indochina Time (UTC+7, no DST).
const LOCAL_OFFSET_SECONDS: i32 = 7 * 3600;

const THAI_MONTHS: &[(&str, u32)] = &[
    ("มกราคม", 1),
    ("กุมภาพันธ์", 2),
    ("มีนาคม", 3),
    ("เมษายน", 4),
    ("พฤษภาคม", 5),
    ("มิถุนายน", 6),
    ("กรกฎาคม", 7),
    ("สิงหาคม", 8),
    ("กันยายน", 9),
    ("ตุลาคม", 10),
    ("พฤศจิกายน", 11),
    ("ธันวาคม", 12),
    ("ม.ค.", 1),
    ("ก.พ.", 2),
    ("มี.ค.", 3),
    ("เม.ย.", 4),
    ("พ.ค.", 5),
    ("มิ.ย.", 6),
    ("ก.ค.", 7),
    ("ส.ค.", 8),
    ("ก.ย.", 9),
    ("ต.ค.", 10),
    ("พ.ย.", 11),
    ("ธ.ค.", 12),
];

struct DatePatterns {
    iso: Regex,
    day_first: Regex,
    thai_month: Regex,
    embedded_day_first: Regex,
    embedded_thai_month: Regex,
    embedded_iso: Regex,
}

fn patterns() -> &'static DatePatterns {
    static PATTERNS: OnceLock<DatePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let mut months: Vec<&str> = THAI_MONTHS.iter().map(|(name, _)| *name).collect();
        months.sort_by_key(|name| std::cmp::Reverse(name.chars().count()));
        let months = months
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");
        let thai_month = format!(r"(\d{{1,2}})\s*({months})\s*(?:พ\.ศ\.|ค\.ศ\.)?\s*(\d{{4}})");

        DatePatterns {
            iso: Regex::new(r"^(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})(?:$|[T\s])")
                .expect("iso date pattern"),
            day_first: Regex::new(r"^(\d{1,2})[/\-.\s]+(\d{1,2})[/\-.\s]+(\d{4})$")
                .expect("day-first date pattern"),
            thai_month: Regex::new(&format!("^{thai_month}$")).expect("thai month pattern"),
            embedded_day_first: Regex::new(r"(?:^|\D)(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{4})(?:\D|$)")
                .expect("embedded day-first pattern"),
            embedded_thai_month: Regex::new(&thai_month).expect("embedded thai month pattern"),
            embedded_iso: Regex::new(r"(?:^|\D)(\d{4})-(\d{1,2})-(\d{1,2})(?:\D|$)")
                .expect("embedded iso pattern"),
        }
    })
}

fn local_offset() -> Option<FixedOffset> {
    FixedOffset::east_opt(LOCAL_OFFSET_SECONDS)
}

/// Converts a Buddhist Era year to the common era; other years pass through.
pub fn to_common_era(year: i32) -> i32 {
    if year > BUDDHIST_ERA_THRESHOLD {
        year - BUDDHIST_ERA_OFFSET
    } else {
        year
    }
}

fn build_date(year: &str, month: u32, day: &str) -> Option<NaiveDate> {
    let year = to_common_era(year.parse().ok()?);
    let day = day.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn thai_month_number(name: &str) -> Option<u32> {
    THAI_MONTHS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, month)| *month)
}

/// Calendar day of an epoch-seconds instant in local time.
pub fn from_epoch_seconds(seconds: i64, nanoseconds: u32) -> Option<NaiveDate> {
    let instant = DateTime::from_timestamp(seconds, nanoseconds)?;
    Some(instant.with_timezone(&local_offset()?).date_naive())
}

/// Current calendar day in local time.
pub fn local_today() -> NaiveDate {
    let now = Utc::now();
    match local_offset() {
        Some(offset) => now.with_timezone(&offset).date_naive(),
        None => now.date_naive(),
    }
}

fn from_timestamp(timestamp: &TimestampValue) -> Option<NaiveDate> {
    from_epoch_seconds(timestamp.seconds, timestamp.nanoseconds)
}

/// Resolves any supported representation to a calendar date. Returns `None`
/// rather than failing when nothing yields a valid date.
pub fn resolve(value: &RawValue) -> Option<NaiveDate> {
    match value {
        RawValue::Timestamp(timestamp) => from_timestamp(timestamp),
        RawValue::Number(seconds) if seconds.is_finite() => {
            from_epoch_seconds(seconds.trunc() as i64, 0)
        }
        RawValue::Text(text) => resolve_text(text),
        _ => None,
    }
}

/// Resolves a whole string as a date (ISO, day-first, Thai month name, or epoch digits).
pub fn resolve_text(text: &str) -> Option<NaiveDate> {
    let text = arabic_digits(text.trim());
    if text.is_empty() {
        return None;
    }
    let patterns = patterns();

    if let Some(caps) = patterns.iso.captures(&text) {
        let year: i32 = caps[1].parse().ok()?;
        if year <= BUDDHIST_ERA_THRESHOLD {
            if let Ok(instant) = DateTime::parse_from_rfc3339(&text) {
                return Some(instant.with_timezone(&local_offset()?).date_naive());
            }
        }
        return build_date(&caps[1], caps[2].parse().ok()?, &caps[3]);
    }

    if let Some(caps) = patterns.day_first.captures(&text) {
        return build_date(&caps[3], caps[2].parse().ok()?, &caps[1]);
    }

    if let Some(caps) = patterns.thai_month.captures(&text) {
        return build_date(&caps[3], thai_month_number(&caps[2])?, &caps[1]);
    }

    if text.len() >= 9 && text.chars().all(|c| c.is_ascii_digit()) {
        return from_epoch_seconds(text.parse().ok()?, 0);
    }

    None
}

/// Scans free text for the first embedded date substring.
pub fn resolve_embedded(text: &str) -> Option<NaiveDate> {
    if let Some(date) = resolve_text(text) {
        return Some(date);
    }

    let text = arabic_digits(text);
    let patterns = patterns();

    let day_first = patterns
        .embedded_day_first
        .captures_iter(&text)
        .find_map(|caps| build_date(&caps[3], caps[2].parse().ok()?, &caps[1]));
    if day_first.is_some() {
        return day_first;
    }

    let thai_month = patterns
        .embedded_thai_month
        .captures_iter(&text)
        .find_map(|caps| build_date(&caps[3], thai_month_number(&caps[2])?, &caps[1]));
    if thai_month.is_some() {
        return thai_month;
    }

    patterns
        .embedded_iso
        .captures_iter(&text)
        .find_map(|caps| build_date(&caps[1], caps[2].parse().ok()?, &caps[3]))
}

/// Same calendar day on both sides; time of day is ignored.
pub fn compare_dates(left: &RawValue, right: &RawValue) -> bool {
    match (resolve(left), resolve(right)) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}
