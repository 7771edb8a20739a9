//! Ten-Gods (십성): how any stem or branch relates to the day master.

use serde::Serialize;

use crate::cycle::{Branch, Element, Polarity, Stem};

/// The five relation classes before the polarity split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationClass {
    /// Same element.
    Peer,
    /// The day master produces the target.
    Output,
    /// The day master controls the target.
    Wealth,
    /// The target controls the day master.
    Power,
    /// The target produces the day master.
    Resource,
}

impl RelationClass {
    pub fn between(day_master: Element, target: Element) -> RelationClass {
        if target == day_master {
            RelationClass::Peer
        } else if target == day_master.produces() {
            RelationClass::Output
        } else if target == day_master.controls() {
            RelationClass::Wealth
        } else if target == day_master.controlled_by() {
            RelationClass::Power
        } else {
            RelationClass::Resource
        }
    }

    /// The element in this relation to `day_master`.
    pub fn element_for(self, day_master: Element) -> Element {
        match self {
            RelationClass::Peer => day_master,
            RelationClass::Output => day_master.produces(),
            RelationClass::Wealth => day_master.controls(),
            RelationClass::Power => day_master.controlled_by(),
            RelationClass::Resource => day_master.produced_by(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sipsung {
    Bigyeon,
    Geopjae,
    Siksin,
    Sanggwan,
    Pyeonjae,
    Jeongjae,
    Pyeongwan,
    Jeonggwan,
    Pyeonin,
    Jeongin,
}

pub const ALL_SIPSUNG: [Sipsung; 10] = [
    Sipsung::Bigyeon,
    Sipsung::Geopjae,
    Sipsung::Siksin,
    Sipsung::Sanggwan,
    Sipsung::Pyeonjae,
    Sipsung::Jeongjae,
    Sipsung::Pyeongwan,
    Sipsung::Jeonggwan,
    Sipsung::Pyeonin,
    Sipsung::Jeongin,
];

impl Sipsung {
    /// Classify a target's element and polarity against the day master's.
    ///
    /// Matching polarity takes the first name of each pair (비견, 식신, 편재,
    /// 편관, 편인); opposite polarity the second.
    pub fn classify(day_master: (Element, Polarity), target: (Element, Polarity)) -> Sipsung {
        let same = day_master.1 == target.1;
        match (RelationClass::between(day_master.0, target.0), same) {
            (RelationClass::Peer, true) => Sipsung::Bigyeon,
            (RelationClass::Peer, false) => Sipsung::Geopjae,
            (RelationClass::Output, true) => Sipsung::Siksin,
            (RelationClass::Output, false) => Sipsung::Sanggwan,
            (RelationClass::Wealth, true) => Sipsung::Pyeonjae,
            (RelationClass::Wealth, false) => Sipsung::Jeongjae,
            (RelationClass::Power, true) => Sipsung::Pyeongwan,
            (RelationClass::Power, false) => Sipsung::Jeonggwan,
            (RelationClass::Resource, true) => Sipsung::Pyeonin,
            (RelationClass::Resource, false) => Sipsung::Jeongin,
        }
    }

    pub fn of_stem(day_master: Stem, target: Stem) -> Sipsung {
        Self::classify(
            (day_master.element(), day_master.polarity()),
            (target.element(), target.polarity()),
        )
    }

    /// Branches are read by their own element and polarity.
    pub fn of_branch(day_master: Stem, target: Branch) -> Sipsung {
        Self::classify(
            (day_master.element(), day_master.polarity()),
            (target.element(), target.polarity()),
        )
    }

    pub fn class(self) -> RelationClass {
        match self {
            Sipsung::Bigyeon | Sipsung::Geopjae => RelationClass::Peer,
            Sipsung::Siksin | Sipsung::Sanggwan => RelationClass::Output,
            Sipsung::Pyeonjae | Sipsung::Jeongjae => RelationClass::Wealth,
            Sipsung::Pyeongwan | Sipsung::Jeonggwan => RelationClass::Power,
            Sipsung::Pyeonin | Sipsung::Jeongin => RelationClass::Resource,
        }
    }

    pub fn korean(self) -> &'static str {
        match self {
            Sipsung::Bigyeon => "비견",
            Sipsung::Geopjae => "겁재",
            Sipsung::Siksin => "식신",
            Sipsung::Sanggwan => "상관",
            Sipsung::Pyeonjae => "편재",
            Sipsung::Jeongjae => "정재",
            Sipsung::Pyeongwan => "편관",
            Sipsung::Jeonggwan => "정관",
            Sipsung::Pyeonin => "편인",
            Sipsung::Jeongin => "정인",
        }
    }

    pub fn hanja(self) -> &'static str {
        match self {
            Sipsung::Bigyeon => "比肩",
            Sipsung::Geopjae => "劫財",
            Sipsung::Siksin => "食神",
            Sipsung::Sanggwan => "傷官",
            Sipsung::Pyeonjae => "偏財",
            Sipsung::Jeongjae => "正財",
            Sipsung::Pyeongwan => "偏官",
            Sipsung::Jeonggwan => "正官",
            Sipsung::Pyeonin => "偏印",
            Sipsung::Jeongin => "正印",
        }
    }
}

impl std::fmt::Display for Sipsung {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.korean(), self.hanja())
    }
}

/// A slot's relation to the day master. The day stem itself is never given
/// a Ten-God name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "sipsung", rename_all = "snake_case")]
pub enum Relation {
    SelfPosition,
    TenGod(Sipsung),
}

impl Relation {
    pub fn sipsung(self) -> Option<Sipsung> {
        match self {
            Relation::SelfPosition => None,
            Relation::TenGod(s) => Some(s),
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Relation::SelfPosition => f.write_str("일간(日干)"),
            Relation::TenGod(s) => s.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::{ALL_ELEMENTS, ALL_STEMS};

    #[test]
    fn test_gap_day_master_against_all_stems() {
        let expected = [
            "비견", "겁재", "식신", "상관", "편재", "정재", "편관", "정관", "편인", "정인",
        ];
        for (stem, name) in ALL_STEMS.iter().zip(expected) {
            assert_eq!(Sipsung::of_stem(Stem::Gap, *stem).korean(), name, "{stem}");
        }
    }

    #[test]
    fn test_yin_day_master_flips_pairs() {
        // 乙 sees 甲 as 겁재 and 庚 as 정관
        assert_eq!(Sipsung::of_stem(Stem::Eul, Stem::Gap), Sipsung::Geopjae);
        assert_eq!(Sipsung::of_stem(Stem::Eul, Stem::Gyeong), Sipsung::Jeonggwan);
        assert_eq!(Sipsung::of_stem(Stem::Eul, Stem::Sin), Sipsung::Pyeongwan);
    }

    #[test]
    fn test_branch_uses_its_own_polarity() {
        // 子 is yang water: 甲 sees it as 편인
        assert_eq!(Sipsung::of_branch(Stem::Gap, Branch::Ja), Sipsung::Pyeonin);
        assert_eq!(Sipsung::of_branch(Stem::Gap, Branch::Myo), Sipsung::Geopjae);
    }

    #[test]
    fn test_classification_is_total_over_the_grid() {
        let polarities = [Polarity::Yang, Polarity::Yin];
        let mut seen = std::collections::HashSet::new();
        for dm in ALL_ELEMENTS {
            for dp in polarities {
                let mut per_master = std::collections::HashSet::new();
                for te in ALL_ELEMENTS {
                    for tp in polarities {
                        let s = Sipsung::classify((dm, dp), (te, tp));
                        assert_eq!(s.class().element_for(dm), te);
                        per_master.insert(s);
                        seen.insert(s);
                    }
                }
                assert_eq!(per_master.len(), 10);
            }
        }
        assert_eq!(seen.len(), ALL_SIPSUNG.len());
    }
}
