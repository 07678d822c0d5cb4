//! Forward links between matches.
//!
//! All functions work on index ranges into the node arena. Each range is one round of a segment,
//! in slot order.
use std::ops::Range;

use crate::{Error, Link, MatchNode, Result};

/// Links every match to the match receiving its winner in the following round.
///
/// If the following round has half the matches, slots `2i - 1` and `2i` both feed slot `i`. If it
/// has the same number of matches (the lower bracket rounds that take in dropped losers), slot `i`
/// feeds the first spot of slot `i`. The last round is left untouched.
///
/// # Errors
///
/// Returns [`Error::StructuralInconsistency`] if two consecutive rounds can't be paired.
pub(crate) fn wire_rounds(matches: &mut [MatchNode], rounds: &[Range<usize>]) -> Result<()> {
    for pair in rounds.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);

        let halves = current.len() == next.len() * 2;
        if !halves && current.len() != next.len() {
            return Err(Error::StructuralInconsistency(
                "consecutive rounds can't be paired",
            ));
        }

        for (offset, index) in current.clone().enumerate() {
            let link = if halves {
                Link::new(next.start + offset / 2, offset % 2)
            } else {
                Link::new(next.start + offset, 0)
            };

            matches[index].next_match = Some(link);
        }
    }

    Ok(())
}

/// Records which lower bracket spot receives the loser of every upper bracket match.
///
/// The losers of upper round 1 are paired up in lower round 1. The losers of upper round `r > 1`
/// take the second spot of the matching slot in lower round `2(r - 1)`, facing the winners of the
/// lower round before. The loser of the upper final meets the lower bracket survivor in the lower
/// final.
///
/// # Errors
///
/// Returns [`Error::StructuralInconsistency`] if the round sizes don't line up.
pub(crate) fn route_losers(
    matches: &mut [MatchNode],
    upper: &[Range<usize>],
    lower: &[Range<usize>],
) -> Result<()> {
    if lower.is_empty() || lower.len() != upper.len().saturating_sub(1) * 2 {
        return Err(Error::StructuralInconsistency(
            "lower bracket has an invalid number of rounds",
        ));
    }

    for (round, range) in upper.iter().enumerate() {
        let target = if round == 0 { &lower[0] } else { &lower[2 * round - 1] };

        if round == 0 && range.len() != target.len() * 2 {
            return Err(Error::StructuralInconsistency(
                "first lower round must take two upper matches per match",
            ));
        }
        if round != 0 && range.len() != target.len() {
            return Err(Error::StructuralInconsistency(
                "lower round can't take in the upper bracket losers",
            ));
        }

        for (offset, index) in range.clone().enumerate() {
            let link = if round == 0 {
                Link::new(target.start + offset / 2, offset % 2)
            } else {
                Link::new(target.start + offset, 1)
            };

            matches[index].loser_match = Some(link);
        }
    }

    Ok(())
}

/// Sends the losers of both `semifinals` to the match at `target`.
pub(crate) fn route_semifinal_losers(
    matches: &mut [MatchNode],
    semifinals: &Range<usize>,
    target: usize,
) -> Result<()> {
    if semifinals.len() != 2 {
        return Err(Error::StructuralInconsistency(
            "a third place match needs exactly two semifinals",
        ));
    }

    for (position, index) in semifinals.clone().enumerate() {
        matches[index].loser_match = Some(Link::new(target, position));
    }

    Ok(())
}

/// Sends the winner of the match at `from` to spot `position` of the match at `to`.
#[inline]
pub(crate) fn connect(matches: &mut [MatchNode], from: usize, to: usize, position: usize) {
    matches[from].next_match = Some(Link::new(to, position));
}
