//! Field reconciliation between AI-extracted loan documents and stored
//! applicant profiles.
//!
//! The engine is synchronous and stateless. Data problems never surface as
//! errors; they end up as a [`MatchStatus`] plus warnings in the returned
//! [`ComparisonResult`].

pub mod address;
pub mod catalog;
pub mod dates;
pub mod domain;
pub mod engine;
pub mod freshness;
pub mod numeric;
pub mod occupation;
pub mod role;
pub mod router;
pub mod service;
pub mod term;
pub mod text;

#[cfg(test)]
mod tests;

pub use address::{compare_addresses, normalize_address};
pub use catalog::{
    CatalogError, CategoryRules, CategorySummary, FreshnessRule, RoleSelector, RulesetCatalog,
};
pub use dates::{compare_dates, resolve as resolve_date, to_common_era};
pub use domain::{
    AddressParts, ApplicantProfiles, ComparisonDetails, ComparisonKind, ComparisonResult,
    ComparisonRuleset, ExtractedFieldSet, FieldOutcome, FieldPresence, FieldRule, FieldSource,
    MatchStatus, PersonRole, ProfileRecord, RawValue, Severity, TimestampValue,
};
pub use engine::{
    ReconcileConfig, ReconciliationEngine, SinglePersonComparison, ToleranceBands,
};
pub use freshness::{check_age, AgeCheck};
pub use numeric::{compare_numeric, NumericVerdict};
pub use occupation::{compare_occupation, OccupationVerdict};
pub use role::{RoleInference, RoleQuery, RoleSource};
pub use router::reconciliation_router;
pub use service::{
    BatchItemOutcome, BatchReport, DocumentVerification, DocumentVerificationRequest,
    DocumentVerificationService, TermCheck, VerificationError,
};
pub use term::{extract_academic_year, extract_term};
pub use text::{compare_names, normalize, strip_title};
