use crate::reconciliation::domain::{ComparisonDetails, MatchStatus};

const GOOD_MATCH_WARNING_LIMIT: usize = 2;
const GOOD_MATCH_PERCENTAGE: u32 = 70;
const PARTIAL_MATCH_PERCENTAGE: u32 = 50;

/// Overall verdict as a pure function of the counts.
pub fn classify(details: &ComparisonDetails, mismatches: usize, warnings: usize) -> MatchStatus {
    if details.fields_compared == 0 {
        return MatchStatus::InsufficientData;
    }

    if mismatches == 0 {
        return match warnings {
            0 => MatchStatus::FullMatch,
            n if n <= GOOD_MATCH_WARNING_LIMIT => MatchStatus::GoodMatch,
            _ => MatchStatus::PartialMatch,
        };
    }

    let percentage = details.match_percentage();
    if percentage >= GOOD_MATCH_PERCENTAGE {
        MatchStatus::GoodMatch
    } else if percentage >= PARTIAL_MATCH_PERCENTAGE {
        MatchStatus::PartialMatch
    } else {
        MatchStatus::Mismatch
    }
}
