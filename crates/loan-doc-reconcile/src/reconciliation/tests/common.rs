use std::sync::Arc;

use axum::response::Response;
use axum::Router;
use chrono::NaiveDate;
use serde_json::Value;

use crate::reconciliation::{
    reconciliation_router, ApplicantProfiles, ComparisonKind, ComparisonRuleset,
    DocumentVerificationRequest, DocumentVerificationService, ExtractedFieldSet, FieldRule,
    ProfileRecord, RawValue, ReconcileConfig, ReconciliationEngine, RulesetCatalog,
};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
}

pub(super) fn engine() -> ReconciliationEngine {
    ReconciliationEngine::new(ReconcileConfig::default())
}

pub(super) fn service() -> DocumentVerificationService {
    DocumentVerificationService::new(RulesetCatalog::standard(), ReconcileConfig::default())
}

pub(super) fn router() -> Router {
    reconciliation_router(Arc::new(service()))
}

fn text(value: &str) -> Option<RawValue> {
    Some(RawValue::text(value))
}

pub(super) fn student_profile() -> ProfileRecord {
    ProfileRecord {
        name: text("นางสาวสมหญิง ใจดี"),
        citizen_id: text("1234567890123"),
        birth_date: text("2003-05-01"),
        address_permanent: text(
            "123 หมู่ 4 ตำบลคลองเนื้อ อำเภอคลองสามวา กรุงเทพมหานคร 10510",
        ),
        ..ProfileRecord::default()
    }
}

pub(super) fn father_profile() -> ProfileRecord {
    ProfileRecord {
        name: text("นายสมชาย ใจดี"),
        citizen_id: text("3100200300400"),
        birth_date: text("1970-02-10"),
        occupation: text("ค้าขาย"),
        annual_income: Some(RawValue::Number(240000.0)),
        monthly_income: Some(RawValue::Number(20000.0)),
        ..ProfileRecord::default()
    }
}

pub(super) fn mother_profile() -> ProfileRecord {
    ProfileRecord {
        name: text("นางสมศรี ใจดี"),
        citizen_id: text("3100200300411"),
        occupation: text("รับราชการ"),
        annual_income: Some(RawValue::Number(360000.0)),
        ..ProfileRecord::default()
    }
}

pub(super) fn profiles() -> ApplicantProfiles {
    ApplicantProfiles {
        student: Some(student_profile()),
        father: Some(father_profile()),
        mother: Some(mother_profile()),
        guardian: None,
    }
}

pub(super) fn identity_ruleset() -> ComparisonRuleset {
    ComparisonRuleset::from(vec![
        FieldRule::new("name", "name", "Full name", ComparisonKind::FuzzyName),
        FieldRule::new("citizenId", "citizenId", "Citizen ID", ComparisonKind::Exact),
        FieldRule::new("birthDate", "birthDate", "Date of birth", ComparisonKind::Date),
    ])
}

pub(super) fn father_income_extraction() -> ExtractedFieldSet {
    ExtractedFieldSet::new()
        .with("name", "นายสมชาย ใจดี")
        .with("citizenId", "3-1002-00300-40-0")
        .with("occupation", "ธุรกิจส่วนตัว")
        .with("annualIncome", "216,000")
        .with("monthlyIncome", "18,000")
        .with("issueDate", "15 มกราคม 2567")
}

pub(super) fn request(category: &str, extracted: ExtractedFieldSet) -> DocumentVerificationRequest {
    DocumentVerificationRequest {
        document_id: Some(format!("doc-{category}")),
        category: category.to_string(),
        extracted_data: Some(extracted),
        profiles: profiles(),
        ..DocumentVerificationRequest::default()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
