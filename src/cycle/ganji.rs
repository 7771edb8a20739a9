//! Stem-branch pairs and the 60-term sexagenary cycle (육십갑자).

use std::collections::HashMap;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::branch::Branch;
use super::stem::Stem;

/// A stem-branch pair that occurs in the 60-cycle.
///
/// Only parity-matching pairs can be constructed, so every value has a
/// unique cycle position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ganji {
    stem: Stem,
    branch: Branch,
}

static NAME_INDEX: Lazy<HashMap<String, usize>> = Lazy::new(|| {
    let mut index = HashMap::with_capacity(180);
    for n in 0..60 {
        let g = Ganji::from_cycle(n as i64);
        index.insert(g.hanja(), n);
        index.insert(g.korean(), n);
        index.insert(format!("{}-{}", g.stem.code(), g.branch.code()), n);
    }
    index
});

impl Ganji {
    /// Pair a stem and branch; `None` when their parities differ.
    pub fn new(stem: Stem, branch: Branch) -> Option<Ganji> {
        (stem.index() % 2 == branch.index() % 2).then_some(Ganji { stem, branch })
    }

    /// The pair at `position` in the cycle, modulo 60.
    pub const fn from_cycle(position: i64) -> Ganji {
        Ganji {
            stem: Stem::from_index(position),
            branch: Branch::from_index(position),
        }
    }

    pub const fn stem(self) -> Stem {
        self.stem
    }

    pub const fn branch(self) -> Branch {
        self.branch
    }

    /// Position 0..60 in the cycle (甲子 = 0).
    pub const fn cycle_index(self) -> usize {
        let n = 6 * self.stem.index() as i64 - 5 * self.branch.index() as i64;
        n.rem_euclid(60) as usize
    }

    /// Step `steps` positions along the cycle; negative walks backward.
    pub const fn offset(self, steps: i64) -> Ganji {
        Ganji::from_cycle(self.cycle_index() as i64 + steps)
    }

    pub fn hanja(self) -> String {
        format!("{}{}", self.stem.hanja(), self.branch.hanja())
    }

    pub fn korean(self) -> String {
        format!("{}{}", self.stem.korean(), self.branch.korean())
    }
}

impl std::fmt::Display for Ganji {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.stem.hanja(), self.branch.hanja())
    }
}

impl FromStr for Ganji {
    type Err = String;

    /// Accepts `甲子`, `갑자` or `GAP-JA`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        NAME_INDEX
            .get(key)
            .or_else(|| NAME_INDEX.get(&key.to_ascii_uppercase()))
            .map(|&n| Ganji::from_cycle(n as i64))
            .ok_or_else(|| format!("'{s}' is not a sexagenary pair"))
    }
}

impl Serialize for Ganji {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Ganji", 5)?;
        state.serialize_field("index", &self.cycle_index())?;
        state.serialize_field("hanja", &self.hanja())?;
        state.serialize_field("korean", &self.korean())?;
        state.serialize_field("stem", &self.stem)?;
        state.serialize_field("branch", &self.branch)?;
        state.end()
    }
}
