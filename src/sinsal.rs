//! Sinsal (신살): named markers attached to pillars by fixed rules.
//!
//! Every present pillar is evaluated on its own and the results are
//! concatenated in pillar order without deduplication, so the same marker
//! may appear on several pillars.

use serde::Serialize;

use crate::cycle::{Branch, Ganji, Stem};
use crate::pillar::{FourPillars, PillarKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SinsalCategory {
    Auspicious,
    Inauspicious,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SinsalCode {
    Geopsal,
    Jaesal,
    Cheonsal,
    Jisal,
    Yeonsal,
    Wolsal,
    Mangsinsal,
    Jangseongsal,
    Banansal,
    Yeongmasal,
    Yukhaesal,
    Hwagaesal,
    CheoneulGwiin,
    MunchangGwiin,
    Yangin,
    Baekho,
    Goegang,
}

struct Rule {
    code: SinsalCode,
    name: &'static str,
    category: SinsalCategory,
    description: &'static str,
}

/// Twelve sinsal in cycle order, starting from 겁살.
const TWELVE: [Rule; 12] = [
    Rule {
        code: SinsalCode::Geopsal,
        name: "겁살",
        category: SinsalCategory::Inauspicious,
        description: "빼앗기고 잃는 기운. 재물 손실과 외부의 압박을 뜻한다.",
    },
    Rule {
        code: SinsalCode::Jaesal,
        name: "재살",
        category: SinsalCategory::Inauspicious,
        description: "수옥살이라고도 한다. 관재와 구속, 뜻밖의 사고를 경계한다.",
    },
    Rule {
        code: SinsalCode::Cheonsal,
        name: "천살",
        category: SinsalCategory::Inauspicious,
        description: "하늘에서 오는 재앙. 천재지변이나 피할 수 없는 변고를 뜻한다.",
    },
    Rule {
        code: SinsalCode::Jisal,
        name: "지살",
        category: SinsalCategory::Neutral,
        description: "삼합의 시작. 이동과 변동, 새로운 출발을 뜻한다.",
    },
    Rule {
        code: SinsalCode::Yeonsal,
        name: "연살(도화살)",
        category: SinsalCategory::Neutral,
        description: "도화. 매력과 인기, 이성 관계의 기운이 강하다.",
    },
    Rule {
        code: SinsalCode::Wolsal,
        name: "월살",
        category: SinsalCategory::Inauspicious,
        description: "고초살. 일이 막히고 메마르는 기운을 뜻한다.",
    },
    Rule {
        code: SinsalCode::Mangsinsal,
        name: "망신살",
        category: SinsalCategory::Inauspicious,
        description: "체면과 명예를 잃는 일, 구설을 경계한다.",
    },
    Rule {
        code: SinsalCode::Jangseongsal,
        name: "장성살",
        category: SinsalCategory::Auspicious,
        description: "삼합의 왕지. 통솔력과 권위, 리더의 기운을 뜻한다.",
    },
    Rule {
        code: SinsalCode::Banansal,
        name: "반안살",
        category: SinsalCategory::Auspicious,
        description: "말 안장에 오른 형상. 승진과 안정, 출세를 뜻한다.",
    },
    Rule {
        code: SinsalCode::Yeongmasal,
        name: "역마살",
        category: SinsalCategory::Neutral,
        description: "이동과 여행, 해외와 분주한 활동을 뜻한다.",
    },
    Rule {
        code: SinsalCode::Yukhaesal,
        name: "육해살",
        category: SinsalCategory::Inauspicious,
        description: "질병과 근심, 가까운 사람과의 해를 경계한다.",
    },
    Rule {
        code: SinsalCode::Hwagaesal,
        name: "화개살",
        category: SinsalCategory::Neutral,
        description: "삼합의 묘지. 예술과 종교, 학문과 고독을 뜻한다.",
    },
];

const CHEONEUL: Rule = Rule {
    code: SinsalCode::CheoneulGwiin,
    name: "천을귀인",
    category: SinsalCategory::Auspicious,
    description: "가장 높은 귀인. 위기에서 돕는 사람이 나타난다.",
};

const MUNCHANG: Rule = Rule {
    code: SinsalCode::MunchangGwiin,
    name: "문창귀인",
    category: SinsalCategory::Auspicious,
    description: "학문과 글재주, 시험운이 좋다.",
};

const YANGIN: Rule = Rule {
    code: SinsalCode::Yangin,
    name: "양인살",
    category: SinsalCategory::Inauspicious,
    description: "칼날처럼 강한 기운. 결단력이 있으나 다툼과 부상을 경계한다.",
};

const BAEKHO: Rule = Rule {
    code: SinsalCode::Baekho,
    name: "백호살",
    category: SinsalCategory::Inauspicious,
    description: "흰 호랑이의 기운. 혈광과 급작스러운 사고를 경계한다.",
};

const GOEGANG: Rule = Rule {
    code: SinsalCode::Goegang,
    name: "괴강살",
    category: SinsalCategory::Neutral,
    description: "극단적으로 강한 기운. 큰 성공과 큰 실패가 함께한다.",
};

/// A marker attached to one pillar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sinsal {
    pub code: SinsalCode,
    pub name: &'static str,
    pub category: SinsalCategory,
    pub description: &'static str,
    pub pillar: PillarKind,
}

impl Sinsal {
    fn from_rule(rule: &Rule, pillar: PillarKind) -> Self {
        Self {
            code: rule.code,
            name: rule.name,
            category: rule.category,
            description: rule.description,
            pillar,
        }
    }
}

/// Twelve-sinsal position of `branch` in the triad of `reference`.
pub fn twelve_sinsal_index(reference: Branch, branch: Branch) -> usize {
    // The triad head is 지살, fourth in the cycle.
    (branch.index() + 12 + 3 - reference.triad_head().index()) % 12
}

fn cheoneul_branches(day_stem: Stem) -> [Branch; 2] {
    match day_stem {
        Stem::Gap | Stem::Mu | Stem::Gyeong => [Branch::Chuk, Branch::Mi],
        Stem::Eul | Stem::Gi => [Branch::Ja, Branch::Sin],
        Stem::Byeong | Stem::Jeong => [Branch::Hae, Branch::Yu],
        Stem::Sin => [Branch::In, Branch::O],
        Stem::Im | Stem::Gye => [Branch::Sa, Branch::Myo],
    }
}

const MUNCHANG_BRANCH: [Branch; 10] = [
    Branch::Sa,
    Branch::O,
    Branch::Sin,
    Branch::Yu,
    Branch::Sin,
    Branch::Yu,
    Branch::Hae,
    Branch::Ja,
    Branch::In,
    Branch::Myo,
];

fn yangin_branch(day_stem: Stem) -> Option<Branch> {
    match day_stem {
        Stem::Gap => Some(Branch::Myo),
        Stem::Byeong | Stem::Mu => Some(Branch::O),
        Stem::Gyeong => Some(Branch::Yu),
        Stem::Im => Some(Branch::Ja),
        _ => None,
    }
}

const BAEKHO_PILLARS: [&str; 7] = ["甲辰", "乙未", "丙戌", "丁丑", "戊辰", "壬戌", "癸丑"];
const GOEGANG_PILLARS: [&str; 5] = ["庚辰", "庚戌", "壬辰", "壬戌", "戊戌"];

fn pillar_in(ganji: Ganji, table: &[&str]) -> bool {
    let name = ganji.hanja();
    table.iter().any(|t| *t == name)
}

/// Markers on a single pillar.
pub fn evaluate_pillar(pillars: &FourPillars, kind: PillarKind, ganji: Ganji) -> Vec<Sinsal> {
    let day_stem = pillars.day_master();
    let branch = ganji.branch();
    let mut found = Vec::new();

    let reference = if kind == PillarKind::Year {
        pillars.day.branch()
    } else {
        pillars.year.branch()
    };
    found.push(Sinsal::from_rule(
        &TWELVE[twelve_sinsal_index(reference, branch)],
        kind,
    ));

    if cheoneul_branches(day_stem).contains(&branch) {
        found.push(Sinsal::from_rule(&CHEONEUL, kind));
    }
    if MUNCHANG_BRANCH[day_stem.index()] == branch {
        found.push(Sinsal::from_rule(&MUNCHANG, kind));
    }
    if yangin_branch(day_stem) == Some(branch) {
        found.push(Sinsal::from_rule(&YANGIN, kind));
    }
    if pillar_in(ganji, &BAEKHO_PILLARS) {
        found.push(Sinsal::from_rule(&BAEKHO, kind));
    }
    if pillar_in(ganji, &GOEGANG_PILLARS) {
        found.push(Sinsal::from_rule(&GOEGANG, kind));
    }

    found
}

/// Markers over all present pillars; an unknown hour contributes none.
pub fn evaluate(pillars: &FourPillars) -> Vec<Sinsal> {
    pillars
        .present()
        .flat_map(|(kind, ganji)| evaluate_pillar(pillars, kind, ganji))
        .collect()
}
