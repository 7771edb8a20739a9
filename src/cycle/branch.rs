//! The twelve Earthly Branches (지지) and their hidden stems (지장간).

use serde::Serialize;

use super::element::{Element, Polarity};
use super::stem::Stem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Branch {
    Ja,
    Chuk,
    In,
    Myo,
    Jin,
    Sa,
    O,
    Mi,
    Sin,
    Yu,
    Sul,
    Hae,
}

/// All branches in cycle order (index 0 = 子).
pub const ALL_BRANCHES: [Branch; 12] = [
    Branch::Ja,
    Branch::Chuk,
    Branch::In,
    Branch::Myo,
    Branch::Jin,
    Branch::Sa,
    Branch::O,
    Branch::Mi,
    Branch::Sin,
    Branch::Yu,
    Branch::Sul,
    Branch::Hae,
];

const HANJA: [&str; 12] = [
    "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
];
const KOREAN: [&str; 12] = [
    "자", "축", "인", "묘", "진", "사", "오", "미", "신", "유", "술", "해",
];
const CODES: [&str; 12] = [
    "JA", "CHUK", "IN", "MYO", "JIN", "SA", "O", "MI", "SIN", "YU", "SUL", "HAE",
];
const ANIMALS: [&str; 12] = [
    "쥐", "소", "호랑이", "토끼", "용", "뱀", "말", "양", "원숭이", "닭", "개", "돼지",
];

const ELEMENTS: [Element; 12] = [
    Element::Water,
    Element::Earth,
    Element::Wood,
    Element::Wood,
    Element::Earth,
    Element::Fire,
    Element::Fire,
    Element::Earth,
    Element::Metal,
    Element::Metal,
    Element::Earth,
    Element::Water,
];

// Principal first, then secondary, then residual.
const HIDDEN_STEMS: [&[Stem]; 12] = [
    &[Stem::Gye, Stem::Im],
    &[Stem::Gi, Stem::Sin, Stem::Gye],
    &[Stem::Gap, Stem::Byeong, Stem::Mu],
    &[Stem::Eul, Stem::Gap],
    &[Stem::Mu, Stem::Gye, Stem::Eul],
    &[Stem::Byeong, Stem::Gyeong, Stem::Mu],
    &[Stem::Jeong, Stem::Gi, Stem::Byeong],
    &[Stem::Gi, Stem::Eul, Stem::Jeong],
    &[Stem::Gyeong, Stem::Im, Stem::Mu],
    &[Stem::Sin, Stem::Gyeong],
    &[Stem::Mu, Stem::Jeong, Stem::Sin],
    &[Stem::Im, Stem::Gap, Stem::Mu],
];

/// Seniority of a hidden stem within its branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HiddenRank {
    Principal,
    Secondary,
    Residual,
}

impl Branch {
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Branch at `index` modulo 12; negative offsets wrap.
    pub const fn from_index(index: i64) -> Branch {
        ALL_BRANCHES[index.rem_euclid(12) as usize]
    }

    pub const fn hanja(self) -> &'static str {
        HANJA[self.index()]
    }

    pub const fn korean(self) -> &'static str {
        KOREAN[self.index()]
    }

    pub const fn code(self) -> &'static str {
        CODES[self.index()]
    }

    pub const fn animal(self) -> &'static str {
        ANIMALS[self.index()]
    }

    pub const fn element(self) -> Element {
        ELEMENTS[self.index()]
    }

    pub const fn polarity(self) -> Polarity {
        Polarity::from_ordinal(self.index())
    }

    /// Hidden stems, principal first.
    pub const fn hidden_stems(self) -> &'static [Stem] {
        HIDDEN_STEMS[self.index()]
    }

    /// Hidden stems paired with their seniority.
    ///
    /// Two-stem branches carry a principal and a residual, no secondary.
    pub fn ranked_hidden_stems(self) -> Vec<(Stem, HiddenRank)> {
        let stems = self.hidden_stems();
        stems
            .iter()
            .enumerate()
            .map(|(i, &stem)| {
                let rank = match (i, stems.len()) {
                    (0, _) => HiddenRank::Principal,
                    (1, 3) => HiddenRank::Secondary,
                    _ => HiddenRank::Residual,
                };
                (stem, rank)
            })
            .collect()
    }

    /// First member of the branch's three-harmony group (申子辰 → 申, 寅午戌 → 寅, ...).
    pub const fn triad_head(self) -> Branch {
        // Triad members are four apart, so they share index mod 4.
        match self.index() % 4 {
            0 => Branch::Sin,
            1 => Branch::Sa,
            2 => Branch::In,
            _ => Branch::Hae,
        }
    }

    pub fn lookup(token: &str) -> Option<Branch> {
        let token = token.trim();
        ALL_BRANCHES.into_iter().find(|b| {
            b.hanja() == token || b.korean() == token || b.code().eq_ignore_ascii_case(token)
        })
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.hanja())
    }
}
