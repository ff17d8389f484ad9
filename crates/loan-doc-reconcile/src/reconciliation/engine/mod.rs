mod config;
mod policy;
mod rules;

pub use config::{
    ReconcileConfig, ToleranceBands, DEFAULT_MATCH_RATIO, DEFAULT_MAX_DOCUMENT_AGE_DAYS,
    DEFAULT_WARN_RATIO,
};
pub use policy::classify;
pub use rules::{compare_field, FieldVerdict};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{
    ComparisonDetails, ComparisonResult, ComparisonRuleset, FieldOutcome, FieldRule, FieldSource,
    MatchStatus, PersonRole, RawValue, Severity,
};
use super::role::{RoleInference, RoleQuery};

const NO_DATA: &str = "no data";

/// Stateless reconciler that applies a ruleset to one document/profile pair.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationEngine {
    config: ReconcileConfig,
}

impl ReconciliationEngine {
    pub fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Compares every rule's field pair and classifies the aggregate.
    pub fn reconcile<E, P>(
        &self,
        extracted: Option<&E>,
        profile: Option<&P>,
        ruleset: &ComparisonRuleset,
    ) -> ComparisonResult
    where
        E: FieldSource + ?Sized,
        P: FieldSource + ?Sized,
    {
        let Some(extracted) = extracted else {
            return ComparisonResult::with_status(
                MatchStatus::NoProfileData,
                "no extracted data supplied for comparison",
            );
        };
        let Some(profile) = profile else {
            return ComparisonResult::with_status(
                MatchStatus::NoProfileData,
                "no profile data available for comparison",
            );
        };

        let mut tally = Tally::default();
        for rule in ruleset.rules() {
            let extracted_value = extracted.lookup(&rule.extracted_key).value();
            let profile_value = profile.lookup(&rule.profile_key).value();

            match (extracted_value, profile_value) {
                (Some(extracted_value), Some(profile_value)) => {
                    let verdict = compare_field(
                        rule,
                        extracted_value,
                        profile_value,
                        &self.config.tolerance,
                    );
                    debug!(field = %rule.extracted_key, ?verdict, "field compared");
                    tally.record(rule, extracted_value, profile_value, verdict);
                }
                (None, Some(profile_value)) if rule.required => {
                    debug!(field = %rule.extracted_key, "required field missing from document");
                    tally.missing_required(rule, profile_value);
                }
                (Some(_), None) if rule.required => {
                    tally.warn(format!("no profile data for field {}", rule.label));
                }
                _ => {
                    debug!(field = %rule.extracted_key, "field skipped");
                }
            }
        }

        tally.finish()
    }

    /// Reconciles a document that belongs to one of several people, picking
    /// the person first. An undecidable role yields `no_match`.
    pub fn reconcile_single_person(
        &self,
        query: &RoleQuery<'_>,
        ruleset: &ComparisonRuleset,
    ) -> SinglePersonComparison {
        let Some(inference) = query.infer() else {
            let candidates = query
                .candidates
                .iter()
                .map(|role| role.label())
                .collect::<Vec<_>>()
                .join(", ");
            debug!(%candidates, "no role could be inferred");
            return SinglePersonComparison {
                role: None,
                comparison: ComparisonResult::with_status(
                    MatchStatus::NoMatch,
                    format!("could not determine which person the document belongs to ({candidates})"),
                ),
            };
        };

        debug!(role = inference.role.label(), source = ?inference.source, "role inferred");
        let comparison = self.reconcile(
            Some(query.extracted),
            query.profiles.for_role(inference.role),
            ruleset,
        );
        SinglePersonComparison {
            role: Some(inference),
            comparison,
        }
    }
}

/// Result of a single-person reconciliation together with the chosen role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinglePersonComparison {
    pub role: Option<RoleInference>,
    pub comparison: ComparisonResult,
}

impl SinglePersonComparison {
    pub fn person(&self) -> Option<PersonRole> {
        self.role.map(|inference| inference.role)
    }
}

#[derive(Default)]
struct Tally {
    details: ComparisonDetails,
    result: ComparisonResult,
}

impl Tally {
    fn record(
        &mut self,
        rule: &FieldRule,
        extracted: &RawValue,
        profile: &RawValue,
        verdict: FieldVerdict,
    ) {
        match verdict {
            FieldVerdict::Match => self.matched(rule),
            FieldVerdict::MatchWithWarning(warning) => {
                self.matched(rule);
                self.warn(warning);
            }
            FieldVerdict::Mismatch(warning) => {
                self.mismatched(rule, extracted.display(), profile.display(), rule.severity());
                if let Some(warning) = warning {
                    self.warn(warning);
                }
            }
            FieldVerdict::NotComparable => {
                if rule.required {
                    self.warn(format!("no profile data for field {}", rule.label));
                }
            }
        }
    }

    /// A required field absent from the document is never reported below medium.
    fn missing_required(&mut self, rule: &FieldRule, profile: &RawValue) {
        let severity = rule.severity().max(Severity::Medium);
        self.mismatched(rule, NO_DATA.to_string(), profile.display(), severity);
    }

    fn matched(&mut self, rule: &FieldRule) {
        self.details.fields_compared += 1;
        self.details.fields_matched += 1;
        self.result.matches.insert(rule.extracted_key.clone(), true);
    }

    fn mismatched(
        &mut self,
        rule: &FieldRule,
        extracted_value: String,
        profile_value: String,
        severity: Severity,
    ) {
        self.details.fields_compared += 1;
        self.details.fields_mismatched += 1;
        self.result.matches.insert(rule.extracted_key.clone(), false);
        self.result.mismatches.push(FieldOutcome {
            field: rule.extracted_key.clone(),
            label: rule.label.clone(),
            matched: false,
            extracted_value,
            profile_value,
            severity,
        });
    }

    fn warn(&mut self, warning: String) {
        self.result.warnings.push(warning);
    }

    fn finish(self) -> ComparisonResult {
        let Tally { details, mut result } = self;
        let status = classify(&details, result.mismatches.len(), result.warnings.len());
        if status == MatchStatus::InsufficientData {
            result
                .warnings
                .push("no comparable fields between document and profile".to_string());
        }

        debug!(
            status = status.label(),
            compared = details.fields_compared,
            matched = details.fields_matched,
            "reconciliation classified"
        );
        ComparisonResult {
            match_status: status,
            comparison_details: details,
            match_percentage: details.match_percentage(),
            ..result
        }
    }
}
