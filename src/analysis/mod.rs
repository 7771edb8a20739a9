//! Relational readings of a chart against its day master.

pub mod ohhaeng;
pub mod sipsung;
pub mod strength;
pub mod twelve_stage;

use serde::Serialize;

use crate::constants::{
    DEFAULT_HIDDEN_WEIGHTS, DEFAULT_SEASONAL_MULTIPLIER, DEFAULT_SINGANG_ABOVE,
    DEFAULT_SINYAK_BELOW, DEFAULT_VISIBLE_WEIGHT,
};
use crate::cycle::{Branch, Stem};
use crate::pillar::{FourPillars, PillarKind};

pub use ohhaeng::{ElementShare, OhhaengDistribution, distribute};
pub use sipsung::{ALL_SIPSUNG, Relation, RelationClass, Sipsung};
pub use strength::{StrengthAnalysis, StrengthClass, analyze_strength};
pub use twelve_stage::TwelveStage;

/// Weights and thresholds used by the element and strength readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalysisOptions {
    pub visible_weight: f64,
    /// Principal, secondary and residual hidden-stem weights.
    pub hidden_weights: [f64; 3],
    pub seasonal_multiplier: f64,
    pub sinyak_below: f64,
    pub singang_above: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            visible_weight: DEFAULT_VISIBLE_WEIGHT,
            hidden_weights: DEFAULT_HIDDEN_WEIGHTS,
            seasonal_multiplier: DEFAULT_SEASONAL_MULTIPLIER,
            sinyak_below: DEFAULT_SINYAK_BELOW,
            singang_above: DEFAULT_SINGANG_ABOVE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HiddenRelation {
    pub stem: Stem,
    pub sipsung: Sipsung,
}

/// Ten-God reading of one pillar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PillarRelations {
    pub pillar: PillarKind,
    pub stem: Relation,
    pub branch: Sipsung,
    pub hidden: Vec<HiddenRelation>,
}

/// Twelve-Stage reading of one pillar's branch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageReading {
    pub pillar: PillarKind,
    pub branch: Branch,
    /// The day master's phase at this branch.
    pub day_master: TwelveStage,
    /// The pillar's own stem at its branch (자좌).
    pub seated: TwelveStage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartAnalysis {
    pub relations: Vec<PillarRelations>,
    pub twelve_stages: Vec<StageReading>,
    pub ohhaeng: OhhaengDistribution,
    pub strength: StrengthAnalysis,
}

pub fn pillar_relations(pillars: &FourPillars) -> Vec<PillarRelations> {
    let dm = pillars.day_master();
    pillars
        .present()
        .map(|(kind, ganji)| PillarRelations {
            pillar: kind,
            stem: if kind == PillarKind::Day {
                Relation::SelfPosition
            } else {
                Relation::TenGod(Sipsung::of_stem(dm, ganji.stem()))
            },
            branch: Sipsung::of_branch(dm, ganji.branch()),
            hidden: ganji
                .branch()
                .hidden_stems()
                .iter()
                .map(|&stem| HiddenRelation {
                    stem,
                    sipsung: Sipsung::of_stem(dm, stem),
                })
                .collect(),
        })
        .collect()
}

pub fn stage_readings(pillars: &FourPillars) -> Vec<StageReading> {
    let dm = pillars.day_master();
    pillars
        .present()
        .map(|(kind, ganji)| StageReading {
            pillar: kind,
            branch: ganji.branch(),
            day_master: TwelveStage::of(dm, ganji.branch()),
            seated: TwelveStage::of(ganji.stem(), ganji.branch()),
        })
        .collect()
}

/// Run every relational reading over the present pillars.
pub fn analyze(pillars: &FourPillars, options: &AnalysisOptions) -> ChartAnalysis {
    let slots = ohhaeng::weighted_slots(pillars, options);
    let ohhaeng = OhhaengDistribution::from_slots(&slots);
    let strength = analyze_strength(pillars.day_master(), &slots, &ohhaeng, options);

    ChartAnalysis {
        relations: pillar_relations(pillars),
        twelve_stages: stage_readings(pillars),
        ohhaeng,
        strength,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::Ganji;

    fn chart(hour: Option<&str>) -> FourPillars {
        FourPillars {
            year: "甲辰".parse().unwrap(),
            month: "丙寅".parse().unwrap(),
            day: "戊戌".parse().unwrap(),
            hour: hour.map(|h| h.parse::<Ganji>().unwrap()),
        }
    }

    #[test]
    fn test_day_stem_is_self_position_only() {
        let relations = pillar_relations(&chart(Some("庚申")));
        for r in &relations {
            match r.pillar {
                PillarKind::Day => assert_eq!(r.stem, Relation::SelfPosition),
                _ => assert!(r.stem.sipsung().is_some()),
            }
        }
        // 戊 day master: 甲 is 편관, 丙 편인, 庚 식신
        assert_eq!(relations[0].stem, Relation::TenGod(Sipsung::Pyeongwan));
        assert_eq!(relations[1].stem, Relation::TenGod(Sipsung::Pyeonin));
        assert_eq!(relations[3].stem, Relation::TenGod(Sipsung::Siksin));
        // Day branch 戌 is yang earth like 戊
        assert_eq!(relations[2].branch, Sipsung::Bigyeon);
    }

    #[test]
    fn test_hidden_relations_follow_branch_order() {
        let relations = pillar_relations(&chart(None));
        let year_hidden: Vec<_> = relations[0].hidden.iter().map(|h| h.stem).collect();
        assert_eq!(year_hidden, [Stem::Mu, Stem::Gye, Stem::Eul]);
        assert_eq!(relations[0].hidden[0].sipsung, Sipsung::Bigyeon);
    }

    #[test]
    fn test_unknown_hour_drops_hour_readings() {
        let analysis = analyze(&chart(None), &AnalysisOptions::default());
        assert_eq!(analysis.relations.len(), 3);
        assert_eq!(analysis.twelve_stages.len(), 3);
        assert!(analysis.relations.iter().all(|r| r.pillar != PillarKind::Hour));
        assert!(analysis.twelve_stages.iter().all(|s| s.pillar != PillarKind::Hour));
    }

    #[test]
    fn test_stage_readings() {
        let stages = stage_readings(&chart(Some("庚申")));
        // 戊 at 寅 is 장생, 戊 seated on 戌 is 묘
        assert_eq!(stages[1].day_master, TwelveStage::Jangsaeng);
        assert_eq!(stages[2].seated, TwelveStage::Myo);
    }
}
