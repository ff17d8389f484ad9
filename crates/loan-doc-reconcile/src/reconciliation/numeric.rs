//! Tolerance-banded comparison for income and other approximate amounts.

use super::domain::RawValue;
use super::engine::ToleranceBands;
use super::text::digits_only;

/// Outcome of comparing an extracted amount with the profile amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericVerdict {
    /// Inside the match band.
    Within,
    /// Outside the match band but inside the warning band.
    WithinWarning { difference: u64 },
    Outside { difference: u64 },
    /// Extracted side has no digits.
    Unreadable,
    /// Profile side is zero or unreadable, so no tolerance can be computed.
    NoBaseline,
}

impl NumericVerdict {
    pub fn matched(self) -> bool {
        matches!(
            self,
            NumericVerdict::Within | NumericVerdict::WithinWarning { .. }
        )
    }

    pub fn warns(self) -> bool {
        matches!(self, NumericVerdict::WithinWarning { .. })
    }
}

/// Drops a trailing one- or two-digit decimal fraction (satang) before digits are kept.
fn integer_part(text: &str) -> &str {
    if let Some(position) = text.rfind('.') {
        let tail = &text[position + 1..];
        let fraction = tail.chars().take_while(|c| c.is_ascii_digit()).count();
        let more_digits = tail.chars().skip(fraction).any(|c| c.is_ascii_digit());
        if (1..=2).contains(&fraction) && !more_digits {
            return &text[..position];
        }
    }
    text
}

/// Reads an amount, ignoring separators, currency words and satang.
pub fn parse_amount(value: &RawValue) -> Option<u64> {
    match value {
        RawValue::Number(number) if number.is_finite() && *number >= 0.0 => {
            Some(number.trunc() as u64)
        }
        RawValue::Text(text) => {
            let digits = digits_only(integer_part(text.trim()));
            if digits.is_empty() {
                None
            } else {
                digits.parse().ok()
            }
        }
        _ => None,
    }
}

pub fn compare_numeric(
    extracted: &RawValue,
    profile: &RawValue,
    bands: &ToleranceBands,
) -> NumericVerdict {
    let baseline = match parse_amount(profile) {
        Some(amount) if amount > 0 => amount,
        _ => return NumericVerdict::NoBaseline,
    };
    let Some(amount) = parse_amount(extracted) else {
        return NumericVerdict::Unreadable;
    };

    let difference = amount.abs_diff(baseline);
    let baseline = baseline as f64;
    if difference as f64 <= baseline * bands.match_ratio {
        NumericVerdict::Within
    } else if difference as f64 <= baseline * bands.warn_ratio {
        NumericVerdict::WithinWarning { difference }
    } else {
        NumericVerdict::Outside { difference }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(extracted: &str, profile: f64) -> NumericVerdict {
        compare_numeric(
            &RawValue::text(extracted),
            &RawValue::Number(profile),
            &ToleranceBands::default(),
        )
    }

    #[test]
    fn tolerance_bands_classify_income() {
        assert_eq!(verdict("216000", 240000.0), NumericVerdict::Within);
        assert_eq!(
            verdict("180,000 บาท", 240000.0),
            NumericVerdict::WithinWarning { difference: 60000 }
        );
        assert_eq!(
            verdict("100000", 240000.0),
            NumericVerdict::Outside { difference: 140000 }
        );
    }

    #[test]
    fn band_edges_are_inclusive() {
        assert_eq!(verdict("192000", 240000.0), NumericVerdict::Within);
        assert!(verdict("168000", 240000.0).matched());
        assert!(!verdict("167999", 240000.0).matched());
    }

    #[test]
    fn zero_or_blank_profile_has_no_baseline() {
        assert_eq!(verdict("1000", 0.0), NumericVerdict::NoBaseline);
        assert_eq!(
            compare_numeric(
                &RawValue::text("1000"),
                &RawValue::text("ไม่ระบุ"),
                &ToleranceBands::default()
            ),
            NumericVerdict::NoBaseline
        );
    }

    #[test]
    fn satang_fraction_is_dropped_rather_than_read_as_extra_digits() {
        assert_eq!(parse_amount(&RawValue::text("240,000.50")), Some(240000));
        assert_ne!(parse_amount(&RawValue::text("240,000.50")), Some(24000050));
        assert_eq!(parse_amount(&RawValue::text("240,000.00")), Some(240000));
        assert_eq!(parse_amount(&RawValue::text("฿ 20,000.5")), Some(20000));
        assert_eq!(parse_amount(&RawValue::text("1.234.567")), Some(1234567));
        assert_eq!(parse_amount(&RawValue::text("ไม่มี")), None);
        assert_eq!(verdict("ไม่มี", 240000.0), NumericVerdict::Unreadable);
    }
}
