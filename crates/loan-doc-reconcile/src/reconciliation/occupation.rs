use super::text::normalize;

/// Groups of occupations treated as related when the wording differs.
const RELATED_OCCUPATIONS: &[&[&str]] = &[
    &[
        "อาชีพอิสระ",
        "ธุรกิจส่วนตัว",
        "เจ้าของกิจการ",
        "ค้าขาย",
        "พ่อค้า",
        "แม่ค้า",
        "รับจ้างทั่วไป",
        "รับจ้างรายวัน",
        "self employed",
        "business owner",
        "trader",
        "merchant",
        "day laborer",
    ],
    &[
        "พนักงานบริษัท",
        "พนักงานเอกชน",
        "ลูกจ้าง",
        "พนักงาน",
        "รับจ้าง",
        "company employee",
        "employee",
        "staff",
        "hired worker",
    ],
    &[
        "ข้าราชการ",
        "รับราชการ",
        "พนักงานรัฐวิสาหกิจ",
        "รัฐวิสาหกิจ",
        "civil servant",
        "government officer",
        "state enterprise",
    ],
    &[
        "เกษตรกร",
        "ทำนา",
        "ชาวนา",
        "ทำสวน",
        "ชาวสวน",
        "ทำไร่",
        "เลี้ยงสัตว์",
        "farmer",
        "rice farmer",
        "orchard farmer",
        "livestock",
    ],
];

/// Outcome of an occupation comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupationVerdict {
    Same,
    Related,
    Different,
}

impl OccupationVerdict {
    pub fn matched(self) -> bool {
        !matches!(self, OccupationVerdict::Different)
    }

    pub fn warns(self) -> bool {
        matches!(self, OccupationVerdict::Related)
    }
}

fn mentions_group(normalized: &str, group: &[&str]) -> bool {
    group
        .iter()
        .map(|term| normalize(term))
        .any(|term| normalized.contains(&term))
}

pub fn compare_occupation(extracted: &str, profile: &str) -> OccupationVerdict {
    let extracted = normalize(extracted);
    let profile = normalize(profile);
    if extracted.is_empty() || profile.is_empty() {
        return OccupationVerdict::Different;
    }
    if extracted == profile || extracted.contains(&profile) || profile.contains(&extracted) {
        return OccupationVerdict::Same;
    }

    let related = RELATED_OCCUPATIONS
        .iter()
        .any(|group| mentions_group(&extracted, group) && mentions_group(&profile, group));
    if related {
        OccupationVerdict::Related
    } else {
        OccupationVerdict::Different
    }
}
