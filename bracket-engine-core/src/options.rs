//! # Bracket Options
//!
//! Optional configuration that changes the shape of a generated bracket. Options that don't apply
//! to a [`Format`] are ignored by it.
//!
//! [`Format`]: crate::Format

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BracketOptions {
    /// Include a match for the third place between the losers of the semifinals. Only used by
    /// single elimination brackets with more than two entrants.
    pub third_place_match: bool,
}

impl BracketOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn third_place_match(mut self, third_place_match: bool) -> Self {
        self.third_place_match = third_place_match;
        self
    }
}
