use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::{CatalogError, CategoryRules, RoleSelector};
use crate::reconciliation::domain::{ComparisonKind, FieldRule};

#[derive(Debug, Deserialize)]
struct RuleRow {
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Label", default, deserialize_with = "empty_string_as_none")]
    label: Option<String>,
    #[serde(rename = "Role")]
    role: String,
    #[serde(rename = "Extracted Key")]
    extracted_key: String,
    #[serde(
        rename = "Profile Key",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    profile_key: Option<String>,
    #[serde(
        rename = "Field Label",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    field_label: Option<String>,
    #[serde(rename = "Kind")]
    kind: ComparisonKind,
    #[serde(rename = "Required", default, deserialize_with = "empty_string_as_none")]
    required: Option<String>,
}

impl RuleRow {
    fn is_required(&self) -> bool {
        matches!(
            self.required
                .as_deref()
                .map(str::to_ascii_lowercase)
                .as_deref(),
            Some("yes" | "y" | "true" | "1" | "required")
        )
    }

    fn field_rule(&self) -> FieldRule {
        let profile_key = self
            .profile_key
            .clone()
            .unwrap_or_else(|| self.extracted_key.clone());
        let label = self
            .field_label
            .clone()
            .unwrap_or_else(|| self.extracted_key.clone());
        let rule = FieldRule::new(self.extracted_key.clone(), profile_key, label, self.kind);
        if self.is_required() {
            rule.required()
        } else {
            rule
        }
    }
}

/// Groups rows into categories, keeping first-seen row order within each.
pub(super) fn parse_categories<R: Read>(reader: R) -> Result<Vec<CategoryRules>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut categories: BTreeMap<String, CategoryRules> = BTreeMap::new();

    for record in csv_reader.deserialize::<RuleRow>() {
        let row = record?;
        let role = RoleSelector::parse(&row.role).ok_or_else(|| CatalogError::UnknownRole {
            category: row.category.clone(),
            role: row.role.clone(),
        })?;
        let rule = row.field_rule();

        match categories.get_mut(&row.category) {
            Some(category) if category.role != role => {
                return Err(CatalogError::ConflictingRole {
                    category: row.category,
                    first: category.role.label(),
                    second: role.label(),
                });
            }
            Some(category) => category.ruleset.0.push(rule),
            None => {
                let label = row.label.clone().unwrap_or_else(|| row.category.clone());
                categories.insert(
                    row.category.clone(),
                    CategoryRules::new(row.category, label, role, vec![rule]),
                );
            }
        }
    }

    Ok(categories.into_values().collect())
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
