//! Document age checks against a freshness threshold.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dates::{resolve, resolve_embedded};
use super::domain::RawValue;

/// Age of a document relative to a caller-supplied "today".
///
/// `is_valid` is `None` when the issue date could not be resolved, which is
/// distinct from a date that resolved but falls outside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeCheck {
    pub is_valid: Option<bool>,
    pub age_in_days: Option<i64>,
    pub resolved_date: Option<NaiveDate>,
    pub max_age_days: u32,
}

impl AgeCheck {
    pub fn unknown(max_age_days: u32) -> Self {
        Self {
            is_valid: None,
            age_in_days: None,
            resolved_date: None,
            max_age_days,
        }
    }
}

fn resolve_issue_date(raw: &RawValue) -> Option<NaiveDate> {
    resolve(raw).or_else(|| raw.as_text().and_then(resolve_embedded))
}

pub fn check_age(issue_date: &RawValue, max_age_days: u32, today: NaiveDate) -> AgeCheck {
    let Some(resolved) = resolve_issue_date(issue_date) else {
        return AgeCheck::unknown(max_age_days);
    };

    let age_in_days = today.signed_duration_since(resolved).num_days();
    AgeCheck {
        is_valid: Some((0..=i64::from(max_age_days)).contains(&age_in_days)),
        age_in_days: Some(age_in_days),
        resolved_date: Some(resolved),
        max_age_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
    }

    #[test]
    fn recent_buddhist_era_document_is_valid() {
        let check = check_age(&RawValue::text("15/01/2567"), 90, today());
        assert_eq!(check.is_valid, Some(true));
        assert_eq!(check.age_in_days, Some(46));
        assert_eq!(
            check.resolved_date,
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }

    #[test]
    fn stale_and_future_documents_are_invalid() {
        let stale = check_age(&RawValue::text("01/01/2566"), 90, today());
        assert_eq!(stale.is_valid, Some(false));

        let future = check_age(&RawValue::text("2024-03-02"), 90, today());
        assert_eq!(future.is_valid, Some(false));
        assert_eq!(future.age_in_days, Some(-1));
    }

    #[test]
    fn free_text_is_scanned_for_a_date() {
        let check = check_age(
            &RawValue::text("ให้ไว้ ณ วันที่ 1 ก.พ. 2567"),
            90,
            today(),
        );
        assert_eq!(check.is_valid, Some(true));
        assert_eq!(check.age_in_days, Some(29));
    }

    #[test]
    fn unresolvable_date_is_unknown_not_invalid() {
        let check = check_age(&RawValue::text("ไม่ปรากฏ"), 90, today());
        assert_eq!(check.is_valid, None);
        assert_eq!(check.age_in_days, None);
        assert_eq!(check.resolved_date, None);
    }
}
