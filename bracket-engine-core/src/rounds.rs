//! Grouping of matches by round.
use std::ops::Range;
use std::slice;

use crate::{MatchNode, Segment};

/// A single round of a [`Segment`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Round<'a> {
    pub segment: Segment,
    /// 1-based round number.
    pub number: usize,
    /// Arena index of the first match in the round.
    pub start: usize,
    /// All matches of the round in slot order.
    pub matches: &'a [MatchNode],
}

impl<'a> Round<'a> {
    /// Returns the arena index of the match at `slot` (1-based).
    #[inline]
    pub fn index_of(&self, slot: usize) -> Option<usize> {
        (slot >= 1 && slot <= self.matches.len()).then(|| self.start + slot - 1)
    }

    /// Returns an iterator over the arena indexes and matches of the round.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a MatchNode)> + 'a {
        let (start, matches) = (self.start, self.matches);

        matches
            .iter()
            .enumerate()
            .map(move |(offset, node)| (start + offset, node))
    }
}

/// An iterator over the [`Round`]s of a [`Segment`].
///
/// Returned by [`Bracket::rounds`].
///
/// [`Bracket::rounds`]: crate::Bracket::rounds
#[derive(Clone, Debug)]
pub struct Rounds<'a> {
    matches: &'a [MatchNode],
    segment: Segment,
    ranges: slice::Iter<'a, Range<usize>>,
    number: usize,
}

impl<'a> Rounds<'a> {
    pub(crate) fn new(
        matches: &'a [MatchNode],
        segment: Segment,
        ranges: &'a [Range<usize>],
    ) -> Self {
        Self {
            matches,
            segment,
            ranges: ranges.iter(),
            number: 0,
        }
    }
}

impl<'a> Iterator for Rounds<'a> {
    type Item = Round<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let range = self.ranges.next()?;
        self.number += 1;

        Some(Round {
            segment: self.segment,
            number: self.number,
            start: range.start,
            matches: self.matches.get(range.clone())?,
        })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ranges.size_hint()
    }
}
