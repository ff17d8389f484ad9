use chrono::NaiveDate;
use loan_doc_reconcile::config::AppConfig;
use loan_doc_reconcile::error::AppError;
use loan_doc_reconcile::reconciliation::{DocumentVerificationService, RulesetCatalog};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Standard catalog, with the optional CSV table merged over it.
pub(crate) fn load_catalog(rulesets_csv: Option<&Path>) -> Result<RulesetCatalog, AppError> {
    let mut catalog = RulesetCatalog::standard();
    if let Some(path) = rulesets_csv {
        let supplementary = RulesetCatalog::from_path(path)?;
        info!(
            path = %path.display(),
            categories = supplementary.len(),
            "merged supplementary rulesets"
        );
        catalog.merge(supplementary);
    }
    Ok(catalog)
}

pub(crate) fn build_service(
    config: &AppConfig,
    rulesets_override: Option<&Path>,
) -> Result<DocumentVerificationService, AppError> {
    let rulesets = rulesets_override.or(config.rulesets_csv.as_deref());
    let catalog = load_catalog(rulesets)?;
    Ok(DocumentVerificationService::new(
        catalog,
        config.reconciliation,
    ))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
