use super::{CategoryRules, RoleSelector};
use crate::reconciliation::domain::{ComparisonKind, FieldRule, PersonRole};

const ROLES: [PersonRole; 4] = [
    PersonRole::Student,
    PersonRole::Father,
    PersonRole::Mother,
    PersonRole::Guardian,
];

fn role_title(role: PersonRole) -> &'static str {
    match role {
        PersonRole::Student => "Student",
        PersonRole::Father => "Father",
        PersonRole::Mother => "Mother",
        PersonRole::Guardian => "Guardian",
    }
}

fn name_rule() -> FieldRule {
    FieldRule::new("name", "name", "Full name", ComparisonKind::FuzzyName).required()
}

fn citizen_id_rule() -> FieldRule {
    FieldRule::new("citizenId", "citizenId", "Citizen ID", ComparisonKind::Exact).required()
}

fn id_card(role: PersonRole) -> CategoryRules {
    CategoryRules::new(
        format!("id_card_{}", role.label()),
        format!("{} national ID card", role_title(role)),
        RoleSelector::Fixed(role),
        vec![
            name_rule(),
            citizen_id_rule(),
            FieldRule::new("birthDate", "birthDate", "Date of birth", ComparisonKind::Date)
                .required(),
            FieldRule::new(
                "address",
                "addressPermanent",
                "Registered address",
                ComparisonKind::Address,
            ),
        ],
    )
}

fn consent_form(role: PersonRole) -> CategoryRules {
    CategoryRules::new(
        format!("consent_form_{}", role.label()),
        format!("{} consent form", role_title(role)),
        RoleSelector::Fixed(role),
        vec![
            name_rule(),
            citizen_id_rule(),
            FieldRule::new("phone", "phone", "Phone number", ComparisonKind::Exact),
            FieldRule::new("email", "email", "Email", ComparisonKind::Exact),
            FieldRule::new(
                "address",
                "addressCurrent",
                "Current address",
                ComparisonKind::Address,
            ),
        ],
    )
}

fn income_rules() -> Vec<FieldRule> {
    vec![
        name_rule(),
        FieldRule::new("citizenId", "citizenId", "Citizen ID", ComparisonKind::Exact),
        FieldRule::new(
            "occupation",
            "occupation",
            "Occupation",
            ComparisonKind::FlexibleOccupation,
        ),
        FieldRule::new(
            "annualIncome",
            "annualIncome",
            "Annual income",
            ComparisonKind::NumericTolerant,
        )
        .required(),
        FieldRule::new(
            "monthlyIncome",
            "monthlyIncome",
            "Monthly income",
            ComparisonKind::NumericTolerant,
        ),
    ]
}

fn income_certificate(role: PersonRole) -> CategoryRules {
    CategoryRules::new(
        format!("income_certificate_{}", role.label()),
        format!("{} income certificate", role_title(role)),
        RoleSelector::Fixed(role),
        income_rules(),
    )
    .with_freshness("issueDate", None)
}

pub(super) fn categories() -> Vec<CategoryRules> {
    let mut categories: Vec<CategoryRules> = ROLES.into_iter().map(id_card).collect();
    categories.extend(ROLES.into_iter().map(consent_form));
    categories.extend(
        [PersonRole::Father, PersonRole::Mother, PersonRole::Guardian]
            .into_iter()
            .map(income_certificate),
    );

    categories.push(
        CategoryRules::new(
            "income_certificate_single_parent",
            "Single parent income certificate",
            RoleSelector::EitherOf(PersonRole::Father, PersonRole::Mother),
            income_rules(),
        )
        .with_freshness("issueDate", None),
    );

    categories.push(CategoryRules::new(
        "house_registration",
        "Student house registration",
        RoleSelector::Fixed(PersonRole::Student),
        vec![
            name_rule(),
            citizen_id_rule(),
            FieldRule::new("birthDate", "birthDate", "Date of birth", ComparisonKind::Date),
            FieldRule::new(
                "address",
                "addressPermanent",
                "Registered address",
                ComparisonKind::Address,
            )
            .required(),
        ],
    ));

    categories.push(
        CategoryRules::new(
            "enrollment_certificate",
            "Student enrollment certificate",
            RoleSelector::Fixed(PersonRole::Student),
            vec![
                name_rule(),
                FieldRule::new("citizenId", "citizenId", "Citizen ID", ComparisonKind::Exact),
            ],
        )
        .with_freshness("issueDate", Some(120))
        .with_term("term", "academicYear"),
    );

    categories
}
