//! Five-element (오행) distribution over a chart.

use serde::Serialize;

use super::AnalysisOptions;
use crate::cycle::{ALL_ELEMENTS, Element, HiddenRank, Stem};
use crate::pillar::{FourPillars, PillarKind};

/// Where an element occurrence was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    Stem,
    Branch,
    Hidden(HiddenRank),
}

/// One weighted element occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightedSlot {
    pub pillar: PillarKind,
    pub slot: SlotKind,
    pub element: Element,
    pub weight: f64,
    /// Set on the day stem itself, which strength scoring leaves out.
    pub is_day_master: bool,
}

/// Every element occurrence of the present pillars with its weight.
///
/// Visible stems and branches carry the visible weight; hidden stems carry
/// the weight of their rank within the branch.
pub fn weighted_slots(pillars: &FourPillars, options: &AnalysisOptions) -> Vec<WeightedSlot> {
    let mut slots = Vec::with_capacity(20);
    for (kind, ganji) in pillars.present() {
        slots.push(WeightedSlot {
            pillar: kind,
            slot: SlotKind::Stem,
            element: ganji.stem().element(),
            weight: options.visible_weight,
            is_day_master: kind == PillarKind::Day,
        });
        slots.push(WeightedSlot {
            pillar: kind,
            slot: SlotKind::Branch,
            element: ganji.branch().element(),
            weight: options.visible_weight,
            is_day_master: false,
        });
        for (stem, rank) in ganji.branch().ranked_hidden_stems() {
            slots.push(hidden_slot(kind, stem, rank, options));
        }
    }
    slots
}

fn hidden_slot(kind: PillarKind, stem: Stem, rank: HiddenRank, options: &AnalysisOptions) -> WeightedSlot {
    let weight = match rank {
        HiddenRank::Principal => options.hidden_weights[0],
        HiddenRank::Secondary => options.hidden_weights[1],
        HiddenRank::Residual => options.hidden_weights[2],
    };
    WeightedSlot {
        pillar: kind,
        slot: SlotKind::Hidden(rank),
        element: stem.element(),
        weight,
        is_day_master: false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElementShare {
    pub element: Element,
    pub weight: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OhhaengDistribution {
    pub shares: Vec<ElementShare>,
    pub total: f64,
    /// Elements with no weight at all.
    pub missing: Vec<Element>,
}

impl OhhaengDistribution {
    pub fn from_slots(slots: &[WeightedSlot]) -> Self {
        let mut weights = [0.0_f64; 5];
        for slot in slots {
            weights[slot.element.index()] += slot.weight;
        }
        let total: f64 = weights.iter().sum();

        let shares = ALL_ELEMENTS
            .into_iter()
            .map(|element| {
                let weight = weights[element.index()];
                let percent = if total > 0.0 { 100.0 * weight / total } else { 0.0 };
                ElementShare {
                    element,
                    weight,
                    percent,
                }
            })
            .collect();
        let missing = ALL_ELEMENTS
            .into_iter()
            .filter(|e| weights[e.index()] == 0.0)
            .collect();

        Self {
            shares,
            total,
            missing,
        }
    }

    pub fn share(&self, element: Element) -> ElementShare {
        self.shares[element.index()]
    }

    /// Element with the smallest share; earlier elements win ties.
    pub fn weakest(&self) -> Element {
        self.shares
            .iter()
            .fold(None::<&ElementShare>, |best, s| match best {
                Some(b) if b.weight <= s.weight => Some(b),
                _ => Some(s),
            })
            .map_or(Element::Wood, |s| s.element)
    }

    pub fn strongest(&self) -> Element {
        self.shares
            .iter()
            .fold(None::<&ElementShare>, |best, s| match best {
                Some(b) if b.weight >= s.weight => Some(b),
                _ => Some(s),
            })
            .map_or(Element::Wood, |s| s.element)
    }
}

pub fn distribute(pillars: &FourPillars, options: &AnalysisOptions) -> OhhaengDistribution {
    OhhaengDistribution::from_slots(&weighted_slots(pillars, options))
}
