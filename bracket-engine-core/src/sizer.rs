//! Derives the size of a bracket from the number of participants.
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The capacity and bye count of a bracket for a given number of participants.
///
/// `capacity` is always a power of two of at least 2 and the smallest such value that fits all
/// participants. Every slot above the participant count is a bye.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BracketSpec {
    capacity: usize,
    byes: usize,
    participants: usize,
}

impl BracketSpec {
    /// Computes the `BracketSpec` for `participants` participants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoEntrants`] if `participants` is 0 and [`Error::InvalidCapacity`] if no
    /// power of two large enough fits into `usize`.
    pub fn new(participants: usize) -> Result<Self> {
        if participants == 0 {
            return Err(Error::NoEntrants);
        }

        let capacity = participants
            .checked_next_power_of_two()
            .ok_or(Error::InvalidCapacity(participants))?
            .max(2);

        Ok(Self {
            capacity,
            byes: capacity - participants,
            participants,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn byes(&self) -> usize {
        self.byes
    }

    #[inline]
    pub fn participants(&self) -> usize {
        self.participants
    }

    /// Returns the number of rounds in the upper bracket, `log2(capacity)`.
    #[inline]
    pub fn rounds(&self) -> usize {
        self.capacity.trailing_zeros() as usize
    }

    /// Returns the number of matches in `round` (1-based) of the upper bracket.
    #[inline]
    pub fn upper_matches(&self, round: usize) -> usize {
        self.capacity >> round
    }

    /// Returns the number of rounds in the lower bracket of a double elimination bracket.
    ///
    /// A bracket with a capacity of 2 has no lower bracket.
    #[inline]
    pub fn lower_rounds(&self) -> usize {
        if self.capacity < 4 {
            0
        } else {
            2 * self.rounds() - 2
        }
    }

    /// Returns the number of matches in `round` (1-based) of the lower bracket.
    ///
    /// Rounds come in pairs of equal size: the first round of a pair plays out the entrants
    /// already in the lower bracket, the second one merges its winners with the losers dropping
    /// down from the upper bracket. Every pair has half the matches of the one before.
    #[inline]
    pub fn lower_matches(&self, round: usize) -> usize {
        self.capacity >> ((round + 1) / 2 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_spec() {
        assert_eq!(BracketSpec::new(0), Err(Error::NoEntrants));

        let spec = BracketSpec::new(1).unwrap();
        assert_eq!(spec.capacity(), 2);
        assert_eq!(spec.byes(), 1);
        assert_eq!(spec.participants(), 1);

        let spec = BracketSpec::new(2).unwrap();
        assert_eq!(spec.capacity(), 2);
        assert_eq!(spec.byes(), 0);
        assert_eq!(spec.rounds(), 1);
        assert_eq!(spec.lower_rounds(), 0);

        let spec = BracketSpec::new(6).unwrap();
        assert_eq!(spec.capacity(), 8);
        assert_eq!(spec.byes(), 2);
        assert_eq!(spec.rounds(), 3);

        let spec = BracketSpec::new(16).unwrap();
        assert_eq!(spec.capacity(), 16);
        assert_eq!(spec.byes(), 0);

        let spec = BracketSpec::new(17).unwrap();
        assert_eq!(spec.capacity(), 32);
        assert_eq!(spec.byes(), 15);

        assert_eq!(
            BracketSpec::new(usize::MAX),
            Err(Error::InvalidCapacity(usize::MAX))
        );
    }

    #[test]
    fn test_capacity_bounds() {
        for participants in 3..=300 {
            let spec = BracketSpec::new(participants).unwrap();

            assert!(spec.capacity().is_power_of_two());
            assert!(spec.capacity() / 2 < participants);
            assert!(participants <= spec.capacity());
        }
    }

    #[test]
    fn test_round_sizes() {
        let spec = BracketSpec::new(8).unwrap();
        assert_eq!(
            (1..=spec.rounds())
                .map(|r| spec.upper_matches(r))
                .collect::<Vec<_>>(),
            [4, 2, 1]
        );
        assert_eq!(spec.lower_rounds(), 4);
        assert_eq!(
            (1..=spec.lower_rounds())
                .map(|r| spec.lower_matches(r))
                .collect::<Vec<_>>(),
            [2, 2, 1, 1]
        );

        let spec = BracketSpec::new(4).unwrap();
        assert_eq!(spec.lower_rounds(), 2);
        assert_eq!(spec.lower_matches(1), 1);
        assert_eq!(spec.lower_matches(2), 1);

        let spec = BracketSpec::new(64).unwrap();
        assert_eq!(spec.lower_rounds(), 10);
        assert_eq!(
            (1..=spec.lower_rounds())
                .map(|r| spec.lower_matches(r))
                .collect::<Vec<_>>(),
            [16, 16, 8, 8, 4, 4, 2, 2, 1, 1]
        );
    }
}
