//! Per-category rule tables for the documents a loan application carries.

mod parser;
mod standard;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::domain::{ComparisonRuleset, PersonRole};

/// Which person a document category belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoleSelector {
    Fixed(PersonRole),
    /// One of two people; the role is inferred per document.
    EitherOf(PersonRole, PersonRole),
}

impl RoleSelector {
    pub fn candidates(&self) -> Vec<PersonRole> {
        match *self {
            RoleSelector::Fixed(role) => vec![role],
            RoleSelector::EitherOf(first, second) => vec![first, second],
        }
    }

    /// Parses `student`, `father`, ... or a `father|mother` pair.
    pub fn parse(value: &str) -> Option<Self> {
        match value.split_once('|') {
            Some((first, second)) => {
                let first = PersonRole::parse(first)?;
                let second = PersonRole::parse(second)?;
                (first != second).then_some(RoleSelector::EitherOf(first, second))
            }
            None => PersonRole::parse(value).map(RoleSelector::Fixed),
        }
    }

    pub fn label(&self) -> String {
        match self {
            RoleSelector::Fixed(role) => role.label().to_string(),
            RoleSelector::EitherOf(first, second) => {
                format!("{}|{}", first.label(), second.label())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreshnessRule {
    pub issue_date_key: String,
    /// Falls back to the configured default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age_days: Option<u32>,
}

/// Everything needed to verify one document category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRules {
    pub key: String,
    pub label: String,
    pub role: RoleSelector,
    pub ruleset: ComparisonRuleset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freshness: Option<FreshnessRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_year_key: Option<String>,
}

impl CategoryRules {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        role: RoleSelector,
        ruleset: impl Into<ComparisonRuleset>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            role,
            ruleset: ruleset.into(),
            freshness: None,
            term_key: None,
            academic_year_key: None,
        }
    }

    pub fn with_freshness(mut self, issue_date_key: &str, max_age_days: Option<u32>) -> Self {
        self.freshness = Some(FreshnessRule {
            issue_date_key: issue_date_key.to_string(),
            max_age_days,
        });
        self
    }

    pub fn with_term(mut self, term_key: &str, academic_year_key: &str) -> Self {
        self.term_key = Some(term_key.to_string());
        self.academic_year_key = Some(academic_year_key.to_string());
        self
    }

    pub fn summary(&self) -> CategorySummary {
        CategorySummary {
            key: self.key.clone(),
            label: self.label.clone(),
            roles: self.role.candidates(),
            fields: self
                .ruleset
                .rules()
                .iter()
                .map(|rule| rule.extracted_key.clone())
                .collect(),
            checks_freshness: self.freshness.is_some(),
            checks_term: self.term_key.is_some() || self.academic_year_key.is_some(),
        }
    }
}

/// Compact catalog listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub key: String,
    pub label: String,
    pub roles: Vec<PersonRole>,
    pub fields: Vec<String>,
    pub checks_freshness: bool,
    pub checks_term: bool,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read ruleset table: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid ruleset table: {0}")]
    Csv(#[from] csv::Error),
    #[error("category `{category}` names unknown role `{role}`")]
    UnknownRole { category: String, role: String },
    #[error("category `{category}` lists conflicting roles `{first}` and `{second}`")]
    ConflictingRole {
        category: String,
        first: String,
        second: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RulesetCatalog {
    categories: BTreeMap<String, CategoryRules>,
}

impl RulesetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The document categories of the student loan workflow.
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for category in standard::categories() {
            catalog.insert(category);
        }
        catalog
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for category in parser::parse_categories(reader)? {
            catalog.insert(category);
        }
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn insert(&mut self, category: CategoryRules) {
        self.categories.insert(category.key.clone(), category);
    }

    /// Overlays `other` onto this catalog. An overriding category replaces
    /// the role and field rules but keeps the freshness and term settings
    /// it does not declare itself.
    pub fn merge(&mut self, other: RulesetCatalog) {
        for (key, mut incoming) in other.categories {
            if let Some(existing) = self.categories.get(&key) {
                incoming.freshness = incoming.freshness.or_else(|| existing.freshness.clone());
                incoming.term_key = incoming.term_key.or_else(|| existing.term_key.clone());
                incoming.academic_year_key = incoming
                    .academic_year_key
                    .or_else(|| existing.academic_year_key.clone());
            }
            self.categories.insert(key, incoming);
        }
    }

    pub fn get(&self, key: &str) -> Option<&CategoryRules> {
        self.categories.get(key)
    }

    pub fn categories(&self) -> impl Iterator<Item = &CategoryRules> {
        self.categories.values()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn summaries(&self) -> Vec<CategorySummary> {
        self.categories().map(CategoryRules::summary).collect()
    }
}
