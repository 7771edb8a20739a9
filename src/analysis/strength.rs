//! Day-master strength (신강/신약) and the useful element (용신).

use serde::Serialize;

use super::AnalysisOptions;
use super::ohhaeng::{OhhaengDistribution, SlotKind, WeightedSlot};
use super::sipsung::RelationClass;
use crate::cycle::{Element, Stem};
use crate::pillar::PillarKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrengthClass {
    Sinyak,
    Junghwa,
    Singang,
}

impl StrengthClass {
    pub fn korean(self) -> &'static str {
        match self {
            StrengthClass::Sinyak => "신약",
            StrengthClass::Junghwa => "중화",
            StrengthClass::Singang => "신강",
        }
    }
}

impl std::fmt::Display for StrengthClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.korean())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthAnalysis {
    pub class: StrengthClass,
    /// Share of supporting weight, 0–100.
    pub score: f64,
    pub support: f64,
    pub total: f64,
    pub yongsin: Element,
    pub huisin: Element,
    pub rationale: String,
}

/// Seasonal multiplier applies to the month branch and its hidden stems.
fn seasonal_weight(slot: &WeightedSlot, options: &AnalysisOptions) -> f64 {
    let in_month_branch = slot.pillar == PillarKind::Month
        && matches!(slot.slot, SlotKind::Branch | SlotKind::Hidden(_));
    if in_month_branch {
        slot.weight * options.seasonal_multiplier
    } else {
        slot.weight
    }
}

pub fn classify_score(score: f64, options: &AnalysisOptions) -> StrengthClass {
    if score < options.sinyak_below {
        StrengthClass::Sinyak
    } else if score > options.singang_above {
        StrengthClass::Singang
    } else {
        StrengthClass::Junghwa
    }
}

/// Score the day master against the rest of the chart.
///
/// Support is the weight of peer and resource elements; the day stem itself
/// is left out of both support and total.
pub fn analyze_strength(
    day_master: Stem,
    slots: &[WeightedSlot],
    distribution: &OhhaengDistribution,
    options: &AnalysisOptions,
) -> StrengthAnalysis {
    let dm = day_master.element();
    let mut support = 0.0;
    let mut total = 0.0;

    for slot in slots.iter().filter(|s| !s.is_day_master) {
        let weight = seasonal_weight(slot, options);
        total += weight;
        if matches!(
            RelationClass::between(dm, slot.element),
            RelationClass::Peer | RelationClass::Resource
        ) {
            support += weight;
        }
    }

    let score = if total > 0.0 { 100.0 * support / total } else { 0.0 };
    let class = classify_score(score, options);

    let (yongsin, huisin) = match class {
        StrengthClass::Singang => (dm.produces(), dm.controls()),
        StrengthClass::Sinyak => (dm.produced_by(), dm),
        StrengthClass::Junghwa => {
            let weakest = distribution.weakest();
            (weakest, weakest.produces())
        }
    };

    let rationale = format!(
        "{day_master} {dm} day master: peer and resource weigh {support:.1} of {total:.1} \
         ({score:.1}%), month branch counted ×{:.1}; {class} below {:.0} / above {:.0} \
         → 용신 {yongsin}, 희신 {huisin}",
        options.seasonal_multiplier, options.sinyak_below, options.singang_above,
    );

    StrengthAnalysis {
        class,
        score,
        support,
        total,
        yongsin,
        huisin,
        rationale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ohhaeng::{OhhaengDistribution, weighted_slots};
    use crate::cycle::Ganji;
    use crate::pillar::FourPillars;

    fn run(pillars: [&str; 4], options: &AnalysisOptions) -> StrengthAnalysis {
        let fp = FourPillars {
            year: pillars[0].parse().unwrap(),
            month: pillars[1].parse().unwrap(),
            day: pillars[2].parse().unwrap(),
            hour: Some(pillars[3].parse::<Ganji>().unwrap()),
        };
        let slots = weighted_slots(&fp, options);
        let dist = OhhaengDistribution::from_slots(&slots);
        analyze_strength(fp.day_master(), &slots, &dist, options)
    }

    #[test]
    fn test_wood_heavy_chart_is_singang() {
        // 甲 day master among wood and water everywhere
        let a = run(["甲寅", "丙寅", "甲子", "甲子"], &AnalysisOptions::default());
        assert_eq!(a.class, StrengthClass::Singang);
        assert_eq!(a.yongsin, Element::Fire);
        assert_eq!(a.huisin, Element::Earth);
        assert!(a.score > 60.0);
    }

    #[test]
    fn test_metal_heavy_chart_is_sinyak_for_wood() {
        let a = run(["庚申", "庚申", "甲申", "辛酉"], &AnalysisOptions::default());
        assert_eq!(a.class, StrengthClass::Sinyak);
        assert_eq!(a.yongsin, Element::Water);
        assert_eq!(a.huisin, Element::Wood);
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let lenient = AnalysisOptions {
            sinyak_below: 0.0,
            singang_above: 100.0,
            ..AnalysisOptions::default()
        };
        let a = run(["庚申", "庚申", "甲申", "辛酉"], &lenient);
        assert_eq!(a.class, StrengthClass::Junghwa);
        assert_eq!(a.huisin, a.yongsin.produces());
    }

    #[test]
    fn test_day_stem_is_not_counted() {
        let a = run(["庚申", "庚申", "甲申", "辛酉"], &AnalysisOptions::default());
        // Only the 壬 hidden in each 申 supports 甲: 3 + 3×2 + 3
        assert_eq!(a.support, 12.0);
        assert_eq!(a.total, 127.0);
        assert!(a.rationale.contains("용신"));
    }

    #[test]
    fn test_classify_boundaries() {
        let o = AnalysisOptions::default();
        assert_eq!(classify_score(39.9, &o), StrengthClass::Sinyak);
        assert_eq!(classify_score(40.0, &o), StrengthClass::Junghwa);
        assert_eq!(classify_score(60.0, &o), StrengthClass::Junghwa);
        assert_eq!(classify_score(60.1, &o), StrengthClass::Singang);
    }
}
