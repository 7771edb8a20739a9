//! Static cyclic tables: stems, branches, the 60-cycle and element metadata.
//!
//! Everything here is immutable `const` data, safe to share across threads.

pub mod branch;
pub mod element;
pub mod ganji;
pub mod stem;

pub use branch::{ALL_BRANCHES, Branch, HiddenRank};
pub use element::{ALL_ELEMENTS, Element, Polarity};
pub use ganji::Ganji;
pub use stem::{ALL_STEMS, Stem};
