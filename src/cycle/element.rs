//! Five elements (오행) and polarity (음양).

use serde::Serialize;

/// The five elements in production-cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

/// All elements, index 0 = Wood.
pub const ALL_ELEMENTS: [Element; 5] = [
    Element::Wood,
    Element::Fire,
    Element::Earth,
    Element::Metal,
    Element::Water,
];

impl Element {
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Element {
        ALL_ELEMENTS[index % 5]
    }

    /// The element this one produces (wood → fire → earth → metal → water → wood).
    pub const fn produces(self) -> Element {
        Element::from_index(self.index() + 1)
    }

    /// The element that produces this one.
    pub const fn produced_by(self) -> Element {
        Element::from_index(self.index() + 4)
    }

    /// The element this one controls (wood → earth → water → fire → metal → wood).
    pub const fn controls(self) -> Element {
        Element::from_index(self.index() + 2)
    }

    /// The element that controls this one.
    pub const fn controlled_by(self) -> Element {
        Element::from_index(self.index() + 3)
    }

    pub const fn hanja(self) -> &'static str {
        match self {
            Element::Wood => "木",
            Element::Fire => "火",
            Element::Earth => "土",
            Element::Metal => "金",
            Element::Water => "水",
        }
    }

    pub const fn korean(self) -> &'static str {
        match self {
            Element::Wood => "목",
            Element::Fire => "화",
            Element::Earth => "토",
            Element::Metal => "금",
            Element::Water => "수",
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.korean(), self.hanja())
    }
}

/// Yin/yang polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Yang,
    Yin,
}

impl Polarity {
    /// Even ordinals are yang for both stems and branches.
    pub const fn from_ordinal(ordinal: usize) -> Polarity {
        if ordinal % 2 == 0 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }

    pub const fn is_yang(self) -> bool {
        matches!(self, Polarity::Yang)
    }

    pub const fn korean(self) -> &'static str {
        match self {
            Polarity::Yang => "양",
            Polarity::Yin => "음",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_cycle_closes() {
        let mut e = Element::Wood;
        for _ in 0..5 {
            e = e.produces();
        }
        assert_eq!(e, Element::Wood);
        assert_eq!(Element::Metal.produces(), Element::Water);
        assert_eq!(Element::Wood.produced_by(), Element::Water);
    }

    #[test]
    fn test_control_cycle() {
        assert_eq!(Element::Wood.controls(), Element::Earth);
        assert_eq!(Element::Earth.controls(), Element::Water);
        assert_eq!(Element::Water.controls(), Element::Fire);
        assert_eq!(Element::Fire.controls(), Element::Metal);
        assert_eq!(Element::Metal.controls(), Element::Wood);
        for e in ALL_ELEMENTS {
            assert_eq!(e.controls().controlled_by(), e);
            assert_eq!(e.produces().produced_by(), e);
        }
    }
}
