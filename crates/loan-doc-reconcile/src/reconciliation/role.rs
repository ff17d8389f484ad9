//! Role inference for documents known to belong to one of several people.

use serde::{Deserialize, Serialize};

use super::domain::{ApplicantProfiles, ExtractedFieldSet, FieldSource, PersonRole, RawValue};
use super::text::{bare_name, names_overlap, normalize};

/// Extracted keys that may carry an explicit role tag.
const ROLE_TAG_KEYS: &[&str] = &["role", "relationship"];

const ROLE_MARKERS: &[(PersonRole, &[&str])] = &[
    (PersonRole::Father, &["บิดา", "พ่อของ", "father"]),
    (PersonRole::Mother, &["มารดา", "แม่ของ", "mother"]),
    (PersonRole::Guardian, &["ผู้ปกครอง", "guardian"]),
    (PersonRole::Student, &["นักศึกษา", "ผู้กู้ยืม", "student"]),
];

/// How the role was decided; earlier variants are more trustworthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleSource {
    Hint,
    ExtractedTag,
    NameMatch,
    TextMarker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleInference {
    pub role: PersonRole,
    pub source: RoleSource,
}

/// Inputs for picking one role among candidates.
pub struct RoleQuery<'a> {
    pub candidates: &'a [PersonRole],
    pub hint: Option<PersonRole>,
    pub extracted: &'a ExtractedFieldSet,
    pub profiles: &'a ApplicantProfiles,
    pub name_key: Option<&'a str>,
    pub raw_text: Option<&'a str>,
}

fn single<I: IntoIterator<Item = PersonRole>>(roles: I) -> Option<PersonRole> {
    let mut roles = roles.into_iter();
    let first = roles.next()?;
    if roles.next().is_some() {
        None
    } else {
        Some(first)
    }
}

fn text_of(value: &RawValue) -> Option<String> {
    match value {
        RawValue::Text(text) => Some(text.clone()),
        _ => None,
    }
}

impl RoleQuery<'_> {
    pub fn infer(&self) -> Option<RoleInference> {
        let pick = |role, source| Some(RoleInference { role, source });

        if let Some(role) = self.hint.filter(|role| self.candidates.contains(role)) {
            return pick(role, RoleSource::Hint);
        }
        if let Some(role) = self.from_tag() {
            return pick(role, RoleSource::ExtractedTag);
        }
        if let Some(role) = self.from_name() {
            return pick(role, RoleSource::NameMatch);
        }
        if let Some(role) = self.from_markers() {
            return pick(role, RoleSource::TextMarker);
        }
        None
    }

    fn from_tag(&self) -> Option<PersonRole> {
        ROLE_TAG_KEYS
            .iter()
            .filter_map(|key| self.extracted.lookup(key).value())
            .filter_map(RawValue::as_text)
            .filter_map(PersonRole::parse)
            .find(|role| self.candidates.contains(role))
    }

    fn from_name(&self) -> Option<PersonRole> {
        let extracted_name = self
            .extracted
            .lookup(self.name_key?)
            .value()
            .and_then(text_of)
            .map(|name| bare_name(&name))
            .filter(|name| !name.is_empty())?;

        single(self.candidates.iter().copied().filter(|role| {
            self.profiles
                .for_role(*role)
                .and_then(|profile| profile.lookup("name").value())
                .and_then(text_of)
                .map(|name| bare_name(&name))
                .is_some_and(|name| names_overlap(&name, &extracted_name))
        }))
    }

    fn from_markers(&self) -> Option<PersonRole> {
        let text = normalize(self.raw_text?);
        if text.is_empty() {
            return None;
        }

        single(
            ROLE_MARKERS
                .iter()
                .filter(|(role, _)| self.candidates.contains(role))
                .filter(|(_, markers)| {
                    markers
                        .iter()
                        .any(|marker| text.contains(&normalize(marker)))
                })
                .map(|(role, _)| *role),
        )
    }
}
