use super::config::ToleranceBands;
use crate::reconciliation::address::compare_addresses;
use crate::reconciliation::dates::resolve;
use crate::reconciliation::domain::{ComparisonKind, FieldRule, RawValue};
use crate::reconciliation::numeric::{compare_numeric, NumericVerdict};
use crate::reconciliation::occupation::{compare_occupation, OccupationVerdict};
use crate::reconciliation::text::{compare_names, digits_only, normalize};

/// Outcome of comparing one populated field pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldVerdict {
    Match,
    MatchWithWarning(String),
    Mismatch(Option<String>),
    /// The profile value cannot serve as a baseline (e.g. a zero income).
    NotComparable,
}

fn has_letters(normalized: &str) -> bool {
    normalized.chars().any(char::is_alphabetic)
}

fn exact_match(extracted: &str, profile: &str) -> bool {
    let left = normalize(extracted);
    let right = normalize(profile);
    if !left.is_empty() && left == right {
        return true;
    }
    if has_letters(&left) || has_letters(&right) {
        return false;
    }
    let left = digits_only(extracted);
    !left.is_empty() && left == digits_only(profile)
}

/// Dispatches one field pair to the comparator named by the rule.
pub fn compare_field(
    rule: &FieldRule,
    extracted: &RawValue,
    profile: &RawValue,
    bands: &ToleranceBands,
) -> FieldVerdict {
    let label = &rule.label;
    let extracted_text = extracted.display();
    let profile_text = profile.display();

    match rule.kind {
        ComparisonKind::Exact => verdict(exact_match(&extracted_text, &profile_text)),
        ComparisonKind::FuzzyName => verdict(compare_names(&extracted_text, &profile_text)),
        ComparisonKind::Address => verdict(compare_addresses(extracted, profile)),
        ComparisonKind::Date => match (resolve(extracted), resolve(profile)) {
            (Some(left), Some(right)) => verdict(left == right),
            (None, _) => FieldVerdict::Mismatch(Some(format!(
                "{label}: could not read date '{extracted_text}' from document"
            ))),
            (_, None) => FieldVerdict::Mismatch(Some(format!(
                "{label}: could not read profile date '{profile_text}'"
            ))),
        },
        ComparisonKind::NumericTolerant => match compare_numeric(extracted, profile, bands) {
            NumericVerdict::Within => FieldVerdict::Match,
            NumericVerdict::WithinWarning { difference } => {
                FieldVerdict::MatchWithWarning(format!(
                    "{label}: document value {extracted_text} differs from profile value {profile_text} by {difference} (within {:.0}% tolerance)",
                    bands.warn_ratio * 100.0
                ))
            }
            NumericVerdict::Outside { .. } => FieldVerdict::Mismatch(None),
            NumericVerdict::Unreadable => FieldVerdict::Mismatch(Some(format!(
                "{label}: could not read amount '{extracted_text}' from document"
            ))),
            NumericVerdict::NoBaseline => FieldVerdict::NotComparable,
        },
        ComparisonKind::FlexibleOccupation => {
            match compare_occupation(&extracted_text, &profile_text) {
                OccupationVerdict::Same => FieldVerdict::Match,
                OccupationVerdict::Related => FieldVerdict::MatchWithWarning(format!(
                    "{label}: '{extracted_text}' accepted as related to profile occupation '{profile_text}'"
                )),
                OccupationVerdict::Different => FieldVerdict::Mismatch(None),
            }
        }
    }
}

fn verdict(matched: bool) -> FieldVerdict {
    if matched {
        FieldVerdict::Match
    } else {
        FieldVerdict::Mismatch(None)
    }
}
