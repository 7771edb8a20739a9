//! Twelve-Stage (십이운성) life phases of a stem at a branch.

use serde::Serialize;

use crate::cycle::{Branch, Stem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TwelveStage {
    Jangsaeng,
    Mogyok,
    Gwandae,
    Geollok,
    Jewang,
    Soe,
    Byeong,
    Sa,
    Myo,
    Jeol,
    Tae,
    Yang,
}

pub const ALL_STAGES: [TwelveStage; 12] = [
    TwelveStage::Jangsaeng,
    TwelveStage::Mogyok,
    TwelveStage::Gwandae,
    TwelveStage::Geollok,
    TwelveStage::Jewang,
    TwelveStage::Soe,
    TwelveStage::Byeong,
    TwelveStage::Sa,
    TwelveStage::Myo,
    TwelveStage::Jeol,
    TwelveStage::Tae,
    TwelveStage::Yang,
];

const KOREAN: [&str; 12] = [
    "장생", "목욕", "관대", "건록", "제왕", "쇠", "병", "사", "묘", "절", "태", "양",
];
const HANJA: [&str; 12] = [
    "長生", "沐浴", "冠帶", "建祿", "帝旺", "衰", "病", "死", "墓", "絶", "胎", "養",
];

/// Branch where each stem's cycle begins (장생), indexed by stem.
const BIRTH_BRANCH: [Branch; 10] = [
    Branch::Hae,
    Branch::O,
    Branch::In,
    Branch::Yu,
    Branch::In,
    Branch::Yu,
    Branch::Sa,
    Branch::Ja,
    Branch::Sin,
    Branch::Myo,
];

impl TwelveStage {
    /// Phase of `stem` at `branch`: yang stems walk forward from their birth
    /// branch, yin stems backward.
    pub fn of(stem: Stem, branch: Branch) -> TwelveStage {
        let birth = BIRTH_BRANCH[stem.index()].index();
        let b = branch.index();
        let steps = if stem.polarity().is_yang() {
            (b + 12 - birth) % 12
        } else {
            (birth + 12 - b) % 12
        };
        ALL_STAGES[steps]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn korean(self) -> &'static str {
        KOREAN[self.index()]
    }

    pub fn hanja(self) -> &'static str {
        HANJA[self.index()]
    }
}

impl std::fmt::Display for TwelveStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.korean(), self.hanja())
    }
}
