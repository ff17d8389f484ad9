use super::common::*;
use crate::reconciliation::{
    ApplicantProfiles, ComparisonKind, ComparisonRuleset, ExtractedFieldSet, FieldRule,
    MatchStatus, PersonRole, ProfileRecord, RawValue, RoleQuery, RoleSource, Severity,
};

#[test]
fn identity_document_fully_matches_profile() {
    let extracted = ExtractedFieldSet::new()
        .with("name", "นายสมชาย ใจดี")
        .with("citizenId", "1-2345-67890-12-3")
        .with("birthDate", "01/05/2540");
    let profile = ProfileRecord {
        name: Some(RawValue::text("สมชาย ใจดี")),
        citizen_id: Some(RawValue::text("1234567890123")),
        birth_date: Some(RawValue::text("1997-05-01")),
        ..ProfileRecord::default()
    };

    let result = engine().reconcile(Some(&extracted), Some(&profile), &identity_ruleset());

    assert_eq!(result.match_status, MatchStatus::FullMatch);
    assert_eq!(result.comparison_details.fields_matched, 3);
    assert_eq!(result.match_percentage, 100);
    assert!(result.mismatches.is_empty());
    assert!(result.warnings.is_empty());
    assert_eq!(result.matches.get("birthDate"), Some(&true));
}

#[test]
fn missing_required_identifier_is_a_high_severity_mismatch() {
    let ruleset = ComparisonRuleset::from(vec![
        FieldRule::new("name", "name", "Full name", ComparisonKind::FuzzyName).required(),
        FieldRule::new("citizenId", "citizenId", "Citizen ID", ComparisonKind::Exact).required(),
    ]);
    let extracted = ExtractedFieldSet::new()
        .with("name", "นายสมชาย ใจดี")
        .with("citizenId", "-");

    let result = engine().reconcile(Some(&extracted), Some(&father_profile()), &ruleset);

    assert_ne!(result.match_status, MatchStatus::FullMatch);
    assert_eq!(result.mismatches.len(), 1);
    let mismatch = &result.mismatches[0];
    assert_eq!(mismatch.field, "citizenId");
    assert_eq!(mismatch.severity, Severity::High);
    assert_eq!(mismatch.extracted_value, "no data");
    assert_eq!(mismatch.profile_value, "3100200300400");
    assert_eq!(result.comparison_details.fields_compared, 2);
}

#[test]
fn missing_required_occupation_is_raised_to_medium_severity() {
    let ruleset = ComparisonRuleset::from(vec![FieldRule::new(
        "occupation",
        "occupation",
        "Occupation",
        ComparisonKind::FlexibleOccupation,
    )
    .required()]);
    let extracted = ExtractedFieldSet::new().with("occupation", "-");
    let profile = ProfileRecord {
        occupation: Some(RawValue::text("เกษตรกร")),
        ..ProfileRecord::default()
    };

    let result = engine().reconcile(Some(&extracted), Some(&profile), &ruleset);

    assert_eq!(result.mismatches.len(), 1);
    assert_eq!(result.mismatches[0].severity, Severity::Medium);
    assert_eq!(result.mismatches[0].extracted_value, "no data");
}

#[test]
fn absent_inputs_report_no_profile_data() {
    let extracted = ExtractedFieldSet::new().with("name", "สมชาย");
    let ruleset = identity_ruleset();

    let without_profile =
        engine().reconcile(Some(&extracted), None::<&ProfileRecord>, &ruleset);
    assert_eq!(without_profile.match_status, MatchStatus::NoProfileData);
    assert_eq!(without_profile.warnings.len(), 1);
    assert!(without_profile.matches.is_empty());
    assert!(without_profile.mismatches.is_empty());

    let without_extraction =
        engine().reconcile(None::<&ExtractedFieldSet>, Some(&father_profile()), &ruleset);
    assert_eq!(without_extraction.match_status, MatchStatus::NoProfileData);
}

#[test]
fn nothing_comparable_is_insufficient_data() {
    let ruleset = ComparisonRuleset::from(vec![FieldRule::new(
        "email",
        "email",
        "Email",
        ComparisonKind::Exact,
    )]);
    let profile = ProfileRecord {
        email: Some(RawValue::text("somchai@example.com")),
        ..ProfileRecord::default()
    };

    let result = engine().reconcile(Some(&ExtractedFieldSet::new()), Some(&profile), &ruleset);

    assert_eq!(result.match_status, MatchStatus::InsufficientData);
    assert_eq!(result.comparison_details.fields_compared, 0);
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn required_field_without_profile_value_only_warns() {
    let ruleset = ComparisonRuleset::from(vec![
        FieldRule::new("name", "name", "Full name", ComparisonKind::FuzzyName).required(),
        FieldRule::new("phone", "phone", "Phone", ComparisonKind::Exact).required(),
    ]);
    let extracted = ExtractedFieldSet::new()
        .with("name", "นายสมชาย ใจดี")
        .with("phone", "081-234-5678");

    let result = engine().reconcile(Some(&extracted), Some(&father_profile()), &ruleset);

    assert_eq!(result.match_status, MatchStatus::GoodMatch);
    assert_eq!(result.comparison_details.fields_compared, 1);
    assert_eq!(result.warnings, vec!["no profile data for field Phone".to_string()]);
    assert!(!result.matches.contains_key("phone"));
}

#[test]
fn income_tolerance_bands_drive_the_status() {
    let ruleset = ComparisonRuleset::from(vec![FieldRule::new(
        "annualIncome",
        "annualIncome",
        "Annual income",
        ComparisonKind::NumericTolerant,
    )]);
    let reconcile = |amount: &str| {
        let extracted = ExtractedFieldSet::new().with("annualIncome", amount);
        engine().reconcile(Some(&extracted), Some(&father_profile()), &ruleset)
    };

    let within = reconcile("216000");
    assert_eq!(within.match_status, MatchStatus::FullMatch);

    let warned = reconcile("180000");
    assert_eq!(warned.match_status, MatchStatus::GoodMatch);
    assert_eq!(warned.matches.get("annualIncome"), Some(&true));
    assert_eq!(warned.warnings.len(), 1);

    let outside = reconcile("100000");
    assert_eq!(outside.match_status, MatchStatus::Mismatch);
    assert_eq!(outside.mismatches[0].severity, Severity::Medium);
}

#[test]
fn related_occupation_and_income_produce_good_match() {
    let ruleset = crate::reconciliation::RulesetCatalog::standard()
        .get("income_certificate_father")
        .map(|category| category.ruleset.clone())
        .expect("income certificate category");

    let result = engine().reconcile(
        Some(&father_income_extraction()),
        Some(&father_profile()),
        &ruleset,
    );

    assert_eq!(result.match_status, MatchStatus::GoodMatch);
    assert_eq!(result.comparison_details.fields_compared, 5);
    assert_eq!(result.comparison_details.fields_matched, 5);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("Occupation"));
}

#[test]
fn reconcile_is_deterministic() {
    let extracted = father_income_extraction();
    let ruleset = identity_ruleset();
    let first = engine().reconcile(Some(&extracted), Some(&father_profile()), &ruleset);
    let second = engine().reconcile(Some(&extracted), Some(&father_profile()), &ruleset);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).expect("serializes"),
        serde_json::to_string(&second).expect("serializes")
    );
}

#[test]
fn single_person_mode_infers_role_from_name() {
    let extracted = ExtractedFieldSet::new()
        .with("name", "นางสมศรี ใจดี")
        .with("citizenId", "3100200300411");
    let profiles = profiles();
    let query = RoleQuery {
        candidates: &[PersonRole::Father, PersonRole::Mother],
        hint: None,
        extracted: &extracted,
        profiles: &profiles,
        name_key: Some("name"),
        raw_text: None,
    };

    let outcome = engine().reconcile_single_person(&query, &identity_ruleset());

    assert_eq!(outcome.person(), Some(PersonRole::Mother));
    assert_eq!(
        outcome.role.map(|inference| inference.source),
        Some(RoleSource::NameMatch)
    );
    assert_eq!(outcome.comparison.match_status, MatchStatus::FullMatch);
}

#[test]
fn single_person_mode_without_inference_is_no_match() {
    let extracted = ExtractedFieldSet::new().with("name", "บุคคลอื่น");
    let profiles = ApplicantProfiles {
        father: Some(father_profile()),
        mother: Some(mother_profile()),
        ..ApplicantProfiles::default()
    };
    let query = RoleQuery {
        candidates: &[PersonRole::Father, PersonRole::Mother],
        hint: None,
        extracted: &extracted,
        profiles: &profiles,
        name_key: Some("name"),
        raw_text: Some("เอกสารรับรอง"),
    };

    let outcome = engine().reconcile_single_person(&query, &identity_ruleset());

    assert_eq!(outcome.person(), None);
    assert_eq!(outcome.comparison.match_status, MatchStatus::NoMatch);
    assert_eq!(outcome.comparison.warnings.len(), 1);
}
