use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::catalog::{CategoryRules, RoleSelector, RulesetCatalog};
use super::domain::{
    ApplicantProfiles, ComparisonResult, ExtractedFieldSet, FieldSource, PersonRole, ProfileRecord,
};
use super::engine::{ReconcileConfig, ReconciliationEngine};
use super::freshness::{check_age, AgeCheck};
use super::role::{RoleQuery, RoleSource};
use super::term::{extract_academic_year, extract_term};

/// One document to verify against the applicant's stored profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVerificationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_data: Option<ExtractedFieldSet>,
    #[serde(default)]
    pub profiles: ApplicantProfiles,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_hint: Option<PersonRole>,
    /// Unstructured extractor output, only consulted to infer a role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_academic_year: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermCheck {
    pub term: Option<String>,
    pub academic_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_matches: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_year_matches: Option<bool>,
}

/// Comparison result composed with the category-level checks; the
/// extraction payload itself is never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVerification {
    pub document_id: Option<String>,
    pub category: String,
    pub role: Option<PersonRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_source: Option<RoleSource>,
    pub comparison: ComparisonResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_age: Option<AgeCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<TermCheck>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemOutcome {
    pub index: usize,
    pub document_id: Option<String>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<DocumentVerification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
    pub items: Vec<BatchItemOutcome>,
}

impl BatchReport {
    fn push(&mut self, item: BatchItemOutcome) {
        if item.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.items.push(item);
    }
}

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("unknown document category `{0}`")]
    UnknownCategory(String),
    #[error("invalid verification request: {0}")]
    InvalidRequest(#[from] serde_json::Error),
}

/// Service composing the catalog, the engine and the per-category checks.
pub struct DocumentVerificationService {
    catalog: Arc<RulesetCatalog>,
    engine: Arc<ReconciliationEngine>,
}

impl DocumentVerificationService {
    pub fn new(catalog: RulesetCatalog, config: ReconcileConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            engine: Arc::new(ReconciliationEngine::new(config)),
        }
    }

    pub fn catalog(&self) -> &RulesetCatalog {
        &self.catalog
    }

    pub fn engine(&self) -> &ReconciliationEngine {
        &self.engine
    }

    pub fn verify(
        &self,
        request: &DocumentVerificationRequest,
        today: NaiveDate,
    ) -> Result<DocumentVerification, VerificationError> {
        let category = self
            .catalog
            .get(&request.category)
            .ok_or_else(|| VerificationError::UnknownCategory(request.category.clone()))?;

        let (role, role_source, comparison) = self.compare(category, request);

        Ok(DocumentVerification {
            document_id: request.document_id.clone(),
            category: category.key.clone(),
            role,
            role_source,
            comparison,
            document_age: self.document_age(category, request, today),
            term: term_check(category, request),
        })
    }

    /// Verifies every request independently; one failing item never stops the rest.
    pub fn verify_batch(
        &self,
        requests: &[DocumentVerificationRequest],
        today: NaiveDate,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        for (index, request) in requests.iter().enumerate() {
            report.push(self.batch_item(index, request.document_id.clone(), Ok(request), today));
        }
        log_batch(&report);
        report
    }

    /// Same as [`verify_batch`](Self::verify_batch) for raw JSON items, so a
    /// malformed item is recorded as a failure instead of rejecting the batch.
    pub fn verify_batch_json(&self, items: Vec<serde_json::Value>, today: NaiveDate) -> BatchReport {
        let mut report = BatchReport::default();
        for (index, item) in items.into_iter().enumerate() {
            let document_id = item
                .get("documentId")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string);
            let request = serde_json::from_value::<DocumentVerificationRequest>(item)
                .map_err(VerificationError::from);
            report.push(self.batch_item(index, document_id, request.as_ref(), today));
        }
        log_batch(&report);
        report
    }

    fn batch_item(
        &self,
        index: usize,
        document_id: Option<String>,
        request: Result<&DocumentVerificationRequest, &VerificationError>,
        today: NaiveDate,
    ) -> BatchItemOutcome {
        let outcome = match request {
            Ok(request) => self.verify(request, today).map_err(|err| err.to_string()),
            Err(err) => Err(err.to_string()),
        };

        match outcome {
            Ok(verification) => BatchItemOutcome {
                index,
                document_id,
                success: true,
                verification: Some(verification),
                error: None,
            },
            Err(error) => {
                warn!(index, document_id = ?document_id, %error, "batch item failed");
                BatchItemOutcome {
                    index,
                    document_id,
                    success: false,
                    verification: None,
                    error: Some(error),
                }
            }
        }
    }

    fn compare(
        &self,
        category: &CategoryRules,
        request: &DocumentVerificationRequest,
    ) -> (Option<PersonRole>, Option<RoleSource>, ComparisonResult) {
        let ruleset = &category.ruleset;
        match category.role {
            RoleSelector::Fixed(role) => {
                let comparison = self.engine.reconcile(
                    request.extracted_data.as_ref(),
                    request.profiles.for_role(role),
                    ruleset,
                );
                (Some(role), None, comparison)
            }
            RoleSelector::EitherOf(..) => {
                let Some(extracted) = request.extracted_data.as_ref() else {
                    let comparison = self.engine.reconcile(
                        None::<&ExtractedFieldSet>,
                        None::<&ProfileRecord>,
                        ruleset,
                    );
                    return (None, None, comparison);
                };

                let candidates = category.role.candidates();
                let query = RoleQuery {
                    candidates: &candidates,
                    hint: request.role_hint,
                    extracted,
                    profiles: &request.profiles,
                    name_key: ruleset.name_rule().map(|rule| rule.extracted_key.as_str()),
                    raw_text: request.raw_text.as_deref(),
                };
                let outcome = self.engine.reconcile_single_person(&query, ruleset);
                (
                    outcome.person(),
                    outcome.role.map(|inference| inference.source),
                    outcome.comparison,
                )
            }
        }
    }

    fn document_age(
        &self,
        category: &CategoryRules,
        request: &DocumentVerificationRequest,
        today: NaiveDate,
    ) -> Option<AgeCheck> {
        let freshness = category.freshness.as_ref()?;
        let max_age_days = freshness
            .max_age_days
            .unwrap_or(self.engine.config().default_max_document_age_days);

        let issue_date = request
            .extracted_data
            .as_ref()
            .and_then(|extracted| extracted.lookup(&freshness.issue_date_key).value());
        Some(match issue_date {
            Some(raw) => check_age(raw, max_age_days, today),
            None => AgeCheck::unknown(max_age_days),
        })
    }
}

fn term_check(category: &CategoryRules, request: &DocumentVerificationRequest) -> Option<TermCheck> {
    if category.term_key.is_none() && category.academic_year_key.is_none() {
        return None;
    }

    let text_of = |key: &Option<String>| {
        let extracted = request.extracted_data.as_ref()?;
        extracted.lookup(key.as_deref()?).value().map(|raw| raw.display())
    };
    let term_text = text_of(&category.term_key);
    let year_text = text_of(&category.academic_year_key);

    let term = term_text.as_deref().and_then(extract_term);
    let academic_year = year_text
        .as_deref()
        .and_then(extract_academic_year)
        .or_else(|| term_text.as_deref().and_then(extract_academic_year));

    let agrees = |found: &Option<String>, expected: &Option<String>| {
        let expected = expected.as_deref()?;
        Some(found.as_deref() == Some(expected.trim()))
    };

    Some(TermCheck {
        term_matches: agrees(&term, &request.expected_term),
        academic_year_matches: agrees(&academic_year, &request.expected_academic_year),
        term,
        academic_year,
    })
}

fn log_batch(report: &BatchReport) {
    info!(
        succeeded = report.succeeded,
        failed = report.failed,
        "document batch verified"
    );
}
