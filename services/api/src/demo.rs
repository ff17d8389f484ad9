use crate::infra::build_service;
use chrono::NaiveDate;
use clap::Args;
use loan_doc_reconcile::config::AppConfig;
use loan_doc_reconcile::error::AppError;
use loan_doc_reconcile::reconciliation::dates::local_today;
use loan_doc_reconcile::reconciliation::{
    ApplicantProfiles, BatchReport, CategoryRules, DocumentVerification,
    DocumentVerificationRequest, ExtractedFieldSet, ProfileRecord, RawValue,
};
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct VerifyArgs {
    /// JSON file holding one request object or an array of requests
    #[arg(long)]
    pub(crate) request: PathBuf,
    /// Reference date for document freshness (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Extra ruleset CSV merged over the standard catalog
    #[arg(long)]
    pub(crate) rulesets: Option<PathBuf>,
    /// Print the raw JSON result instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// Extra ruleset CSV merged over the standard catalog
    #[arg(long)]
    pub(crate) rulesets: Option<PathBuf>,
    /// Include the field rules of every category
    #[arg(long)]
    pub(crate) rules: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference date for document freshness (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_verify(args: VerifyArgs) -> Result<(), AppError> {
    let VerifyArgs {
        request,
        today,
        rulesets,
        json,
    } = args;

    let config = AppConfig::load()?;
    let service = build_service(&config, rulesets.as_deref())?;
    let today = today.unwrap_or_else(local_today);
    let payload: serde_json::Value = serde_json::from_str(&fs::read_to_string(request)?)?;

    match payload {
        serde_json::Value::Array(items) => {
            let report = service.verify_batch_json(items, today);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                render_batch(&report);
            }
        }
        single => {
            let request: DocumentVerificationRequest = serde_json::from_value(single)?;
            let verification = service.verify(&request, today)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&verification)?);
            } else {
                render_verification(&verification);
            }
        }
    }

    Ok(())
}

pub(crate) fn run_catalog(args: CatalogArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config, args.rulesets.as_deref())?;

    println!("Document categories ({})", service.catalog().len());
    for category in service.catalog().categories() {
        render_category(category, args.rules);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config, None)?;
    let today = args.today.unwrap_or_else(local_today);

    println!("Loan document reconciliation demo (reference date {today})");
    let report = service.verify_batch(&demo_requests(), today);
    render_batch(&report);
    Ok(())
}

fn render_batch(report: &BatchReport) {
    println!(
        "Batch: {} verified, {} failed",
        report.succeeded, report.failed
    );
    for item in &report.items {
        let id = item.document_id.as_deref().unwrap_or("(no id)");
        match (&item.verification, &item.error) {
            (Some(verification), _) => {
                println!("\n[{}] {}", item.index, id);
                render_verification(verification);
            }
            (None, Some(error)) => println!("\n[{}] {} failed: {}", item.index, id, error),
            (None, None) => println!("\n[{}] {} produced no result", item.index, id),
        }
    }
}

fn render_verification(verification: &DocumentVerification) {
    let comparison = &verification.comparison;
    let role = verification
        .role
        .map(|role| role.label())
        .unwrap_or("undetermined");
    println!(
        "- {} for {}: {} ({}% of {} fields)",
        verification.category,
        role,
        comparison.match_status.label(),
        comparison.match_percentage,
        comparison.comparison_details.fields_compared
    );
    for mismatch in &comparison.mismatches {
        println!(
            "  ! {} [{:?}]: document '{}' vs profile '{}'",
            mismatch.label, mismatch.severity, mismatch.extracted_value, mismatch.profile_value
        );
    }
    for warning in &comparison.warnings {
        println!("  ~ {warning}");
    }
    if let Some(age) = &verification.document_age {
        match (age.is_valid, age.age_in_days) {
            (Some(valid), Some(days)) => println!(
                "  Issued {days} days ago (limit {}): {}",
                age.max_age_days,
                if valid { "current" } else { "expired" }
            ),
            _ => println!("  Issue date unreadable; freshness unknown"),
        }
    }
    if let Some(term) = &verification.term {
        println!(
            "  Term {} / academic year {}",
            term.term.as_deref().unwrap_or("?"),
            term.academic_year.as_deref().unwrap_or("?")
        );
    }
}

fn render_category(category: &CategoryRules, include_rules: bool) {
    println!(
        "- {} ({}) -> {}",
        category.key,
        category.label,
        category.role.label()
    );
    if !include_rules {
        return;
    }
    for rule in category.ruleset.rules() {
        println!(
            "    {} <- {} [{:?}{}]",
            rule.extracted_key,
            rule.profile_key,
            rule.kind,
            if rule.required { ", required" } else { "" }
        );
    }
    if let Some(freshness) = &category.freshness {
        println!(
            "    freshness on {} (max {} days)",
            freshness.issue_date_key,
            freshness
                .max_age_days
                .map(|days| days.to_string())
                .unwrap_or_else(|| "default".to_string())
        );
    }
}

fn text(value: &str) -> Option<RawValue> {
    Some(RawValue::text(value))
}

fn demo_profiles() -> ApplicantProfiles {
    ApplicantProfiles {
        student: Some(ProfileRecord {
            name: text("นางสาวสมหญิง ใจดี"),
            citizen_id: text("1103700012345"),
            birth_date: text("2005-08-14"),
            address_permanent: text("99/1 หมู่ 2 ตำบลบางพูด อำเภอปากเกร็ด จังหวัดนนทบุรี 11120"),
            ..ProfileRecord::default()
        }),
        father: Some(ProfileRecord {
            name: text("นายสมชาย ใจดี"),
            citizen_id: text("3120100045671"),
            occupation: text("ค้าขาย"),
            annual_income: Some(RawValue::Number(240000.0)),
            ..ProfileRecord::default()
        }),
        mother: Some(ProfileRecord {
            name: text("นางสมศรี ใจดี"),
            citizen_id: text("3120100045689"),
            occupation: text("รับราชการ"),
            annual_income: Some(RawValue::Number(360000.0)),
            ..ProfileRecord::default()
        }),
        guardian: None,
    }
}

fn demo_request(id: &str, category: &str, extracted: ExtractedFieldSet) -> DocumentVerificationRequest {
    DocumentVerificationRequest {
        document_id: Some(id.to_string()),
        category: category.to_string(),
        extracted_data: Some(extracted),
        profiles: demo_profiles(),
        ..DocumentVerificationRequest::default()
    }
}

pub(crate) fn demo_requests() -> Vec<DocumentVerificationRequest> {
    let mut enrollment = demo_request(
        "enroll-2567-1",
        "enrollment_certificate",
        ExtractedFieldSet::new()
            .with("name", "น.ส. สมหญิง ใจดี")
            .with("citizenId", "1-1037-00012-34-5")
            .with("term", "ภาคเรียนที่ ๑/๒๕๖๗")
            .with("academicYear", "ปีการศึกษา 2567")
            .with("issueDate", "5 ก.พ. 2567"),
    );
    enrollment.expected_term = Some("1".to_string());
    enrollment.expected_academic_year = Some("2567".to_string());

    vec![
        demo_request(
            "house-reg",
            "house_registration",
            ExtractedFieldSet::new()
                .with("name", "นางสาวสมหญิง ใจดี")
                .with("citizenId", "1 1037 00012 34 5")
                .with("birthDate", "14/08/2548")
                .with("address", "99/1 ม.2 ต.บางพูด อ.ปากเกร็ด จ.นนทบุรี 11120"),
        ),
        demo_request(
            "income-father",
            "income_certificate_father",
            ExtractedFieldSet::new()
                .with("name", "นายสมชาย ใจดี")
                .with("citizenId", "3120100045671")
                .with("occupation", "ธุรกิจส่วนตัว")
                .with("annualIncome", "180,000 บาท")
                .with("issueDate", "15 มกราคม 2567"),
        ),
        demo_request(
            "income-single-parent",
            "income_certificate_single_parent",
            ExtractedFieldSet::new()
                .with("name", "นางสมศรี ใจดี")
                .with("citizenId", "-")
                .with("annualIncome", "250,000.00")
                .with("issueDate", "01/06/2566"),
        ),
        enrollment,
        demo_request("payslip", "payslip", ExtractedFieldSet::new()),
    ]
}
