use serde::{Deserialize, Serialize};

pub const DEFAULT_MATCH_RATIO: f64 = 0.2;
pub const DEFAULT_WARN_RATIO: f64 = 0.3;
pub const DEFAULT_MAX_DOCUMENT_AGE_DAYS: u32 = 180;

/// Acceptance windows for approximate numeric fields, as fractions of the profile value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToleranceBands {
    pub match_ratio: f64,
    pub warn_ratio: f64,
}

impl Default for ToleranceBands {
    fn default() -> Self {
        Self {
            match_ratio: DEFAULT_MATCH_RATIO,
            warn_ratio: DEFAULT_WARN_RATIO,
        }
    }
}

impl ToleranceBands {
    /// Bands are usable when both ratios are finite, non-negative and ordered.
    pub fn is_valid(&self) -> bool {
        self.match_ratio.is_finite()
            && self.warn_ratio.is_finite()
            && self.match_ratio >= 0.0
            && self.match_ratio <= self.warn_ratio
    }
}

/// Engine tuning shared by every reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileConfig {
    #[serde(default)]
    pub tolerance: ToleranceBands,
    #[serde(default = "default_max_document_age_days")]
    pub default_max_document_age_days: u32,
}

fn default_max_document_age_days() -> u32 {
    DEFAULT_MAX_DOCUMENT_AGE_DAYS
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            tolerance: ToleranceBands::default(),
            default_max_document_age_days: DEFAULT_MAX_DOCUMENT_AGE_DAYS,
        }
    }
}
