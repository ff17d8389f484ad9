use loan_doc_reconcile::reconciliation::address::normalize_address_text;
use loan_doc_reconcile::reconciliation::engine::classify;
use loan_doc_reconcile::reconciliation::{
    compare_addresses, compare_dates, compare_names, compare_numeric, normalize, strip_title,
    ComparisonDetails, ComparisonKind, ComparisonRuleset, ExtractedFieldSet, FieldRule,
    MatchStatus, NumericVerdict, ProfileRecord, RawValue, ReconcileConfig, ReconciliationEngine,
    Severity, ToleranceBands,
};

const SAMPLES: &[&str] = &[
    "",
    "   ",
    "นาย สมชาย   ใจดี",
    "123/45 ม.4 ต.คลองเนื้อ อ.คลองสามวา กทม. 10510",
    "Somchai.JaiDee@Example.com",
    "(081) 234-5678",
    "\u{200b}ภาคเรียนที่ ๑\t/ ๒๕๖๗",
];

#[test]
fn normalization_is_idempotent() {
    for sample in SAMPLES {
        let once = normalize(sample);
        assert_eq!(normalize(&once), once, "normalize {sample:?}");

        let address = normalize_address_text(sample);
        assert_eq!(
            normalize_address_text(&address),
            address,
            "normalize_address {sample:?}"
        );
    }
}

#[test]
fn honorific_spellings_canonicalize_together() {
    assert_eq!(
        strip_title("น.ส. สมหญิง ใจดี"),
        strip_title("นางสาวสมหญิง ใจดี")
    );
    assert!(compare_names("น.ส. สมหญิง ใจดี", "นางสาวสมหญิง ใจดี"));
}

#[test]
fn buddhist_and_gregorian_years_name_the_same_day() {
    assert!(compare_dates(
        &RawValue::text("15/01/2565"),
        &RawValue::text("15/01/2022")
    ));
}

#[test]
fn income_tolerance_bands() {
    let bands = ToleranceBands::default();
    let profile = RawValue::Number(240000.0);

    assert_eq!(
        compare_numeric(&RawValue::text("216000"), &profile, &bands),
        NumericVerdict::Within
    );
    let warned = compare_numeric(&RawValue::text("180000"), &profile, &bands);
    assert!(warned.matched() && warned.warns());
    assert!(!compare_numeric(&RawValue::text("100000"), &profile, &bands).matched());
}

#[test]
fn address_comparison_is_symmetric_and_tolerates_abbreviations() {
    let extracted = RawValue::text("123 หมู่4 ต.คลองเนื้อ อ.คลองสามวา กรุงเทพ 10510");
    let profile =
        RawValue::text("123 หมู่ 4 ตำบลคลองเนื้อ อำเภอคลองสามวา กรุงเทพมหานคร 10510");
    assert!(compare_addresses(&extracted, &profile));

    let values: Vec<RawValue> = SAMPLES
        .iter()
        .map(|sample| RawValue::text(*sample))
        .chain([extracted, profile])
        .collect();
    for left in &values {
        for right in &values {
            assert_eq!(compare_addresses(left, right), compare_addresses(right, left));
        }
    }
}

#[test]
fn classifier_is_a_pure_function_of_counts() {
    let details = ComparisonDetails {
        fields_compared: 5,
        fields_matched: 4,
        fields_mismatched: 1,
    };
    let first = classify(&details, 1, 1);
    for _ in 0..10 {
        assert_eq!(classify(&details, 1, 1), first);
    }
    assert_eq!(first, MatchStatus::GoodMatch);
}

fn identity_ruleset() -> ComparisonRuleset {
    ComparisonRuleset::from(vec![
        FieldRule::new("name", "name", "Name", ComparisonKind::FuzzyName),
        FieldRule::new("citizenId", "citizenId", "Citizen ID", ComparisonKind::Exact),
        FieldRule::new("birthDate", "birthDate", "Birth date", ComparisonKind::Date),
    ])
}

fn profile() -> ProfileRecord {
    ProfileRecord {
        name: Some(RawValue::text("สมชาย ใจดี")),
        citizen_id: Some(RawValue::text("1234567890123")),
        birth_date: Some(RawValue::text("1997-05-01")),
        ..ProfileRecord::default()
    }
}

#[test]
fn end_to_end_identity_document_is_a_full_match() {
    let engine = ReconciliationEngine::new(ReconcileConfig::default());
    let extracted = ExtractedFieldSet::new()
        .with("name", "นายสมชาย ใจดี")
        .with("citizenId", "1-2345-67890-12-3")
        .with("birthDate", "01/05/2540");

    let result = engine.reconcile(Some(&extracted), Some(&profile()), &identity_ruleset());

    assert_eq!(result.match_status, MatchStatus::FullMatch);
    assert_eq!(result.comparison_details.fields_matched, 3);
}

#[test]
fn placeholder_in_required_field_is_a_high_severity_mismatch() {
    let engine = ReconciliationEngine::default();
    let ruleset = ComparisonRuleset::from(vec![
        FieldRule::new("name", "name", "Name", ComparisonKind::FuzzyName),
        FieldRule::new("citizenId", "citizenId", "Citizen ID", ComparisonKind::Exact).required(),
    ]);
    let extracted = ExtractedFieldSet::new()
        .with("name", "นายสมชาย ใจดี")
        .with("citizenId", "-");

    let result = engine.reconcile(Some(&extracted), Some(&profile()), &ruleset);

    assert_eq!(result.mismatches.len(), 1);
    assert_eq!(result.mismatches[0].severity, Severity::High);
    assert_ne!(result.match_status, MatchStatus::FullMatch);
}

#[test]
fn result_json_uses_wire_names() {
    let engine = ReconciliationEngine::default();
    let extracted: ExtractedFieldSet = serde_json::from_str(
        r#"{"name": "นายสมชาย ใจดี", "citizenId": null, "birthDate": "1 พฤษภาคม 2540"}"#,
    )
    .expect("extracted json");

    let result = engine.reconcile(Some(&extracted), Some(&profile()), &identity_ruleset());
    let json = serde_json::to_value(&result).expect("serializes");

    assert_eq!(json["matchStatus"], "full_match");
    assert_eq!(json["comparisonDetails"]["fieldsCompared"], 2);
    assert_eq!(json["matchPercentage"], 100);
    assert!(json["mismatches"].as_array().is_some_and(Vec::is_empty));
}
