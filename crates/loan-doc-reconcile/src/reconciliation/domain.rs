use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Placeholder strings the extractor emits when a field is illegible or not on the document.
const PLACEHOLDERS: &[&str] = &["-", "--", "\u{2013}", "\u{2014}", "n/a", "null"];

/// Loosely typed value as produced by the AI extractor or the profile store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Text(String),
    Number(f64),
    Flag(bool),
    Timestamp(TimestampValue),
    Address(AddressParts),
    Other(serde_json::Value),
}

impl RawValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// True when the value carries no usable information.
    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Text(text) => {
                let trimmed = text.trim();
                trimmed.is_empty()
                    || PLACEHOLDERS
                        .iter()
                        .any(|placeholder| trimmed.eq_ignore_ascii_case(placeholder))
            }
            RawValue::Number(value) => !value.is_finite(),
            RawValue::Flag(_) => false,
            RawValue::Timestamp(_) => false,
            RawValue::Address(parts) => parts.is_empty(),
            RawValue::Other(value) => match value {
                serde_json::Value::Null => true,
                serde_json::Value::Array(items) => items.is_empty(),
                serde_json::Value::Object(map) => map.is_empty(),
                _ => false,
            },
        }
    }

    /// Human readable rendering used in mismatch reports.
    pub fn display(&self) -> String {
        match self {
            RawValue::Text(text) => text.trim().to_string(),
            RawValue::Number(value) => {
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    format!("{}", *value as i64)
                } else {
                    value.to_string()
                }
            }
            RawValue::Flag(flag) => flag.to_string(),
            RawValue::Timestamp(ts) => ts.seconds.to_string(),
            RawValue::Address(parts) => parts.flatten(),
            RawValue::Other(value) => value.to_string(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

/// Timestamp object as exported by the profile store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampValue {
    #[serde(alias = "_seconds")]
    pub seconds: i64,
    #[serde(default, alias = "_nanoseconds")]
    pub nanoseconds: u32,
}

/// Structured address as captured by the extractor or the profile store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressParts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(
        default,
        alias = "tambon",
        alias = "khwaeng",
        skip_serializing_if = "Option::is_none"
    )]
    pub sub_district: Option<String>,
    #[serde(
        default,
        alias = "amphoe",
        alias = "khet",
        skip_serializing_if = "Option::is_none"
    )]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, alias = "zipCode", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl AddressParts {
    fn parts(&self) -> [&Option<String>; 9] {
        [
            &self.house_number,
            &self.moo,
            &self.village,
            &self.soi,
            &self.street,
            &self.sub_district,
            &self.district,
            &self.province,
            &self.postal_code,
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.parts()
            .iter()
            .all(|part| part.as_deref().map(str::trim).unwrap_or("").is_empty())
    }

    /// Concatenates the populated parts in postal order, separated by single spaces.
    pub fn flatten(&self) -> String {
        self.parts()
            .iter()
            .filter_map(|part| part.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Three-way view of a field so callers never confuse "absent" with "present but empty".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldPresence<'a> {
    Missing,
    Blank,
    Present(&'a RawValue),
}

impl<'a> FieldPresence<'a> {
    pub fn from_option(value: Option<&'a RawValue>) -> Self {
        match value {
            None => FieldPresence::Missing,
            Some(raw) if raw.is_blank() => FieldPresence::Blank,
            Some(raw) => FieldPresence::Present(raw),
        }
    }

    pub fn value(self) -> Option<&'a RawValue> {
        match self {
            FieldPresence::Present(raw) => Some(raw),
            FieldPresence::Missing | FieldPresence::Blank => None,
        }
    }
}

/// Anything the engine can read fields out of by key.
pub trait FieldSource {
    fn lookup(&self, key: &str) -> FieldPresence<'_>;
}

/// Sparse field map produced by the extractor for one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedFieldSet(pub BTreeMap<String, Option<RawValue>>);

impl ExtractedFieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.0.insert(key.into(), Some(value.into()));
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Option<RawValue>) {
        self.0.insert(key.into(), value);
    }
}

impl FieldSource for ExtractedFieldSet {
    fn lookup(&self, key: &str) -> FieldPresence<'_> {
        match self.0.get(key) {
            None => FieldPresence::Missing,
            Some(value) => match value.as_ref() {
                None => FieldPresence::Blank,
                Some(raw) => FieldPresence::from_option(Some(raw)),
            },
        }
    }
}

/// Snapshot of one person's stored profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citizen_id: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_current: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_permanent: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_income: Option<RawValue>,
}

impl FieldSource for ProfileRecord {
    fn lookup(&self, key: &str) -> FieldPresence<'_> {
        let slot = match key {
            "name" => &self.name,
            "citizenId" => &self.citizen_id,
            "birthDate" => &self.birth_date,
            "phone" => &self.phone,
            "email" => &self.email,
            "addressCurrent" => &self.address_current,
            "addressPermanent" => &self.address_permanent,
            "occupation" => &self.occupation,
            "monthlyIncome" => &self.monthly_income,
            "annualIncome" => &self.annual_income,
            _ => return FieldPresence::Missing,
        };
        FieldPresence::from_option(slot.as_ref())
    }
}

/// Person a document or profile belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonRole {
    Student,
    Father,
    Mother,
    Guardian,
}

impl PersonRole {
    pub fn label(self) -> &'static str {
        match self {
            PersonRole::Student => "student",
            PersonRole::Father => "father",
            PersonRole::Mother => "mother",
            PersonRole::Guardian => "guardian",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "student" | "นักศึกษา" | "ผู้กู้" => Some(PersonRole::Student),
            "father" | "บิดา" | "พ่อ" => Some(PersonRole::Father),
            "mother" | "มารดา" | "แม่" => Some(PersonRole::Mother),
            "guardian" | "ผู้ปกครอง" => Some(PersonRole::Guardian),
            _ => None,
        }
    }
}

/// Profile snapshots for every person attached to one loan application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantProfiles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student: Option<ProfileRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father: Option<ProfileRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother: Option<ProfileRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardian: Option<ProfileRecord>,
}

impl ApplicantProfiles {
    pub fn for_role(&self, role: PersonRole) -> Option<&ProfileRecord> {
        match role {
            PersonRole::Student => self.student.as_ref(),
            PersonRole::Father => self.father.as_ref(),
            PersonRole::Mother => self.mother.as_ref(),
            PersonRole::Guardian => self.guardian.as_ref(),
        }
    }
}

/// Comparator used for one field rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonKind {
    #[serde(alias = "exact")]
    Exact,
    #[serde(alias = "fuzzy_name")]
    FuzzyName,
    #[serde(alias = "numeric_tolerant")]
    NumericTolerant,
    #[serde(alias = "date")]
    Date,
    #[serde(alias = "address")]
    Address,
    #[serde(alias = "flexible_occupation")]
    FlexibleOccupation,
}

impl ComparisonKind {
    pub fn default_severity(self) -> Severity {
        match self {
            ComparisonKind::Exact | ComparisonKind::FuzzyName => Severity::High,
            ComparisonKind::Date | ComparisonKind::Address | ComparisonKind::NumericTolerant => {
                Severity::Medium
            }
            ComparisonKind::FlexibleOccupation => Severity::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Declarative description of how to compare one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRule {
    pub extracted_key: String,
    pub profile_key: String,
    pub label: String,
    #[serde(rename = "comparisonKind", alias = "kind")]
    pub kind: ComparisonKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl FieldRule {
    pub fn new(
        extracted_key: impl Into<String>,
        profile_key: impl Into<String>,
        label: impl Into<String>,
        kind: ComparisonKind,
    ) -> Self {
        Self {
            extracted_key: extracted_key.into(),
            profile_key: profile_key.into(),
            label: label.into(),
            kind,
            required: false,
            severity: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity.unwrap_or_else(|| self.kind.default_severity())
    }
}

/// Ordered field rules for one document category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparisonRuleset(pub Vec<FieldRule>);

impl ComparisonRuleset {
    pub fn rules(&self) -> &[FieldRule] {
        &self.0
    }

    pub fn name_rule(&self) -> Option<&FieldRule> {
        self.0
            .iter()
            .find(|rule| rule.kind == ComparisonKind::FuzzyName)
    }
}

impl From<Vec<FieldRule>> for ComparisonRuleset {
    fn from(rules: Vec<FieldRule>) -> Self {
        Self(rules)
    }
}

/// Mismatch entry for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOutcome {
    pub field: String,
    pub label: String,
    pub matched: bool,
    pub extracted_value: String,
    pub profile_value: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonDetails {
    pub fields_compared: u32,
    pub fields_matched: u32,
    pub fields_mismatched: u32,
}

impl ComparisonDetails {
    pub fn match_percentage(&self) -> u32 {
        if self.fields_compared == 0 {
            return 0;
        }
        (100.0 * f64::from(self.fields_matched) / f64::from(self.fields_compared)).round() as u32
    }
}

/// Overall verdict of one reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    NoProfileData,
    InsufficientData,
    NoMatch,
    FullMatch,
    GoodMatch,
    PartialMatch,
    Mismatch,
    #[default]
    Unknown,
}

impl MatchStatus {
    pub fn label(self) -> &'static str {
        match self {
            MatchStatus::NoProfileData => "no_profile_data",
            MatchStatus::InsufficientData => "insufficient_data",
            MatchStatus::NoMatch => "no_match",
            MatchStatus::FullMatch => "full_match",
            MatchStatus::GoodMatch => "good_match",
            MatchStatus::PartialMatch => "partial_match",
            MatchStatus::Mismatch => "mismatch",
            MatchStatus::Unknown => "unknown",
        }
    }
}

/// Result of reconciling one document against one profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub match_status: MatchStatus,
    pub matches: BTreeMap<String, bool>,
    pub mismatches: Vec<FieldOutcome>,
    pub warnings: Vec<String>,
    pub comparison_details: ComparisonDetails,
    pub match_percentage: u32,
}

impl ComparisonResult {
    pub(crate) fn with_status(match_status: MatchStatus, warning: impl Into<String>) -> Self {
        Self {
            match_status,
            warnings: vec![warning.into()],
            ..Self::default()
        }
    }
}
