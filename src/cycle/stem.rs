//! The ten Heavenly Stems (천간).

use serde::Serialize;

use super::element::{Element, Polarity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stem {
    Gap,
    Eul,
    Byeong,
    Jeong,
    Mu,
    Gi,
    Gyeong,
    Sin,
    Im,
    Gye,
}

/// All stems in cycle order (index 0 = 甲).
pub const ALL_STEMS: [Stem; 10] = [
    Stem::Gap,
    Stem::Eul,
    Stem::Byeong,
    Stem::Jeong,
    Stem::Mu,
    Stem::Gi,
    Stem::Gyeong,
    Stem::Sin,
    Stem::Im,
    Stem::Gye,
];

const HANJA: [&str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];
const KOREAN: [&str; 10] = ["갑", "을", "병", "정", "무", "기", "경", "신", "임", "계"];
const CODES: [&str; 10] = [
    "GAP", "EUL", "BYEONG", "JEONG", "MU", "GI", "GYEONG", "SIN", "IM", "GYE",
];

impl Stem {
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stem at `index` modulo 10; negative offsets wrap.
    pub const fn from_index(index: i64) -> Stem {
        ALL_STEMS[index.rem_euclid(10) as usize]
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

    /// 甲乙 wood, 丙丁 fire, 戊己 earth, 庚辛 metal, 壬癸 water.
    pub const fn element(self) -> Element {
        Element::from_index(self.index() / 2)
    }

    pub const fn polarity(self) -> Polarity {
        Polarity::from_ordinal(self.index())
    }

    /// Match a hanja character, Korean syllable or ASCII code.
    pub fn lookup(token: &str) -> Option<Stem> {
        let token = token.trim();
        ALL_STEMS.into_iter().find(|s| {
            s.hanja() == token || s.korean() == token || s.code().eq_ignore_ascii_case(token)
        })
    }
}

impl std::fmt::Display for Stem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.hanja())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_elements_and_polarity() {
        assert_eq!(Stem::Gap.element(), Element::Wood);
        assert_eq!(Stem::Jeong.element(), Element::Fire);
        assert_eq!(Stem::Gi.element(), Element::Earth);
        assert_eq!(Stem::Gyeong.element(), Element::Metal);
        assert_eq!(Stem::Gye.element(), Element::Water);
        assert!(Stem::Im.polarity().is_yang());
        assert!(!Stem::Sin.polarity().is_yang());
    }

    #[test]
    fn test_from_index_wraps_negative() {
        assert_eq!(Stem::from_index(-1), Stem::Gye);
        assert_eq!(Stem::from_index(10), Stem::Gap);
        assert_eq!(Stem::from_index(23), Stem::Jeong);
    }

    #[test]
    fn test_lookup_accepts_all_scripts() {
        assert_eq!(Stem::lookup("庚"), Some(Stem::Gyeong));
        assert_eq!(Stem::lookup("경"), Some(Stem::Gyeong));
        assert_eq!(Stem::lookup("gyeong"), Some(Stem::Gyeong));
        assert_eq!(Stem::lookup("子"), None);
    }
}
