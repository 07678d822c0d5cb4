//! # bracket-engine-core
//!
//! This crate builds the complete match tree of a seeded elimination bracket before any match is
//! played. It supports two formats: [`SingleElimination`] and [`DoubleElimination`].
//!
//! Important types:
//! - [`Bracket`]: A generated bracket. Owns the [`Entrants`] and an arena of [`MatchNode`]s.
//! - [`Entrants`]: A wrapper around `Vec<T>` where `T` is a participant, ordered by seed.
//! - [`MatchNode`]: A single match with its round, slot, [`Segment`] and forward [`Link`]s.
//! - [`EntrantSpot`]: One side of a match. Holds an entrant, stays empty for good (a bye) or waits
//! for the outcome of an earlier match.
//! - [`BracketSpec`]: The capacity and bye count derived from the number of participants.
//!
//! Nodes never point at each other directly. Every reference is an index into the arena returned
//! by [`Bracket::matches`], which keeps the structure trivial to persist.
//!
//! ## Feature Flags
//!
//! `serde`: Adds `Serialize` and `Deserialize` impls to all data types.
//!
pub mod options;
pub mod rounds;
pub mod seeding;
pub mod sizer;
pub mod tournament;

mod bracket;
mod double_elimination;
mod single_elimination;
mod wiring;

pub use bracket::Bracket;
pub use double_elimination::DoubleElimination;
pub use options::BracketOptions;
pub use single_elimination::SingleElimination;
pub use sizer::BracketSpec;
pub use tournament::Format;

use thiserror::Error;

use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::{Deref, Index, IndexMut};
use std::result;
use std::vec::IntoIter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A wrapper around a `Vec<T>` where `T` should be considered an entrant of a bracket.
///
/// The order is the seed order: the entrant at index 0 is seed 1.
#[derive(Clone, Debug, Default)]
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Entrants<T> {
    entrants: Vec<T>,
}

impl<T> Entrants<T> {
    /// Creates a new empty `Entrants` list.
    #[inline]
    pub fn new() -> Self {
        Self {
            entrants: Vec::new(),
        }
    }

    /// Returns the seed (1-based) of the entrant at `index`.
    #[inline]
    pub fn seed(&self, index: usize) -> Option<usize> {
        (index < self.entrants.len()).then_some(index + 1)
    }

    /// Checks that no entrant appears twice.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoEntrants`] if the list is empty and [`Error::DuplicateEntrant`] for the
    /// first repeated entrant.
    pub fn validate(&self) -> Result<()>
    where
        T: PartialEq,
    {
        if self.entrants.is_empty() {
            return Err(Error::NoEntrants);
        }

        for (index, entrant) in self.entrants.iter().enumerate() {
            if let Some(first) = self.entrants[..index].iter().position(|e| e == entrant) {
                return Err(Error::DuplicateEntrant {
                    seed: index + 1,
                    first: first + 1,
                });
            }
        }

        Ok(())
    }
}

impl<T> FromIterator<T> for Entrants<T> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let entrants = iter.into_iter().collect();

        Self { entrants }
    }
}

impl<T> IntoIterator for Entrants<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entrants.into_iter()
    }
}

impl<T> Deref for Entrants<T> {
    type Target = Vec<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.entrants
    }
}

impl<T, U> PartialEq<U> for Entrants<T>
where
    T: PartialEq,
    U: AsRef<[T]>,
{
    #[inline]
    fn eq(&self, other: &U) -> bool {
        self.entrants == other.as_ref()
    }
}

impl<T> From<Vec<T>> for Entrants<T> {
    #[inline]
    fn from(entrants: Vec<T>) -> Self {
        Self { entrants }
    }
}

/// A competing entity. Two participants are the same participant if their `id`s are equal.
#[derive(Clone, Debug, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Participant {
    pub id: u64,
    pub name: String,
}

impl Participant {
    #[inline]
    pub fn new<S>(id: u64, name: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl PartialEq for Participant {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for Participant {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.id.hash(state);
    }
}

impl Display for Participant {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An `Result<T>` using [`enum@Error`] as an error type.
pub type Result<T> = result::Result<T, Error>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("a bracket requires at least one entrant")]
    NoEntrants,
    #[error("duplicate entrant: seed {seed} is the same entrant as seed {first}")]
    DuplicateEntrant { seed: usize, first: usize },
    #[error("invalid bracket capacity {0}: must be a non-zero power of two")]
    InvalidCapacity(usize),
    #[error("unsupported bracket format: {0}")]
    UnsupportedFormat(String),
    #[error("structural inconsistency: {0}")]
    StructuralInconsistency(&'static str),
    #[error("invalid number of matches: expected {expected}, found {found}")]
    InvalidNumberOfMatches { expected: usize, found: usize },
    #[error(
        "invalid entrant: match refers to entrant at {index} but only {length} entrants are given"
    )]
    InvalidEntrant { index: usize, length: usize },
    #[error("unknown match {0}")]
    UnknownMatch(usize),
    #[error("match {index} is not ready: {state}")]
    MatchNotReady { index: usize, state: MatchState },
    #[error("entrant {entrant} does not play in match {index}")]
    NotAParticipant { index: usize, entrant: usize },
    #[error("spot {position} of match {index} is already occupied")]
    SlotOccupied { index: usize, position: usize },
}

/// One of the two sides of a match.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntrantSpot<T> {
    Entrant(T),
    /// Nobody will ever take this spot.
    Empty,
    /// The spot is filled once a previous match is decided.
    TBD,
}

impl<T> EntrantSpot<T> {
    /// Creates a spot holding `entrant`, or a permanently empty spot for `None`.
    pub fn new(entrant: Option<T>) -> Self {
        match entrant {
            Some(entrant) => Self::Entrant(entrant),
            None => Self::Empty,
        }
    }

    /// Returns `true` if an entrant occupies the spot.
    ///
    /// ```
    /// # use bracket_engine_core::EntrantSpot;
    /// assert!(EntrantSpot::Entrant(3).is_entrant());
    /// assert!(!EntrantSpot::<u8>::TBD.is_entrant());
    /// ```
    pub fn is_entrant(&self) -> bool {
        matches!(self, Self::Entrant(_))
    }

    /// Returns `true` for a bye spot.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns `true` if the spot still waits for a previous match.
    pub fn is_tbd(&self) -> bool {
        matches!(self, Self::TBD)
    }

    /// Returns the contained entrant, if any.
    pub fn entrant(self) -> Option<T> {
        match self {
            Self::Entrant(entrant) => Some(entrant),
            _ => None,
        }
    }

    /// Borrows the entrant of the spot.
    pub fn as_ref(&self) -> EntrantSpot<&T> {
        match *self {
            Self::Entrant(ref entrant) => EntrantSpot::Entrant(entrant),
            Self::Empty => EntrantSpot::Empty,
            Self::TBD => EntrantSpot::TBD,
        }
    }

    /// Applies `f` to the entrant, leaving `Empty` and `TBD` spots alone.
    pub fn map<U, F>(self, f: F) -> EntrantSpot<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Entrant(entrant) => EntrantSpot::Entrant(f(entrant)),
            Self::Empty => EntrantSpot::Empty,
            Self::TBD => EntrantSpot::TBD,
        }
    }
}

/// The sub-bracket a [`MatchNode`] belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Segment {
    Upper,
    Lower,
    GrandFinal,
    ThirdPlace,
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::GrandFinal => "grand final",
            Self::ThirdPlace => "third place",
        })
    }
}

/// The progress of a single [`MatchNode`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MatchState {
    /// No entrant is assigned.
    Empty,
    /// Exactly one entrant is assigned.
    PartiallyFilled,
    /// Both entrants are assigned, but no winner is recorded.
    Ready,
    /// A winner is recorded.
    Decided,
}

impl Display for MatchState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Empty => "empty",
            Self::PartiallyFilled => "partially filled",
            Self::Ready => "ready",
            Self::Decided => "decided",
        })
    }
}

/// A reference to a spot in another match. `position` 0 is the first (A), 1 the second (B) spot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Link {
    pub index: usize,
    pub position: usize,
}

impl Link {
    #[inline]
    pub fn new(index: usize, position: usize) -> Self {
        Self { index, position }
    }
}

/// A match of two parties inside a [`Bracket`].
///
/// Entrants are stored as indexes into the [`Entrants`] of the bracket.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatchNode {
    /// 1-based round within the segment.
    pub round: usize,
    /// 1-based position within the round.
    pub slot: usize,
    pub segment: Segment,
    pub entrants: [EntrantSpot<usize>; 2],
    pub winner: Option<usize>,
    /// The spot receiving the winner. `None` only for terminal matches.
    pub next_match: Option<Link>,
    /// The spot receiving the loser, if the loser keeps playing.
    pub loser_match: Option<Link>,
}

impl MatchNode {
    /// Creates a new `MatchNode` where both spots are [`EntrantSpot::TBD`].
    pub fn new(round: usize, slot: usize, segment: Segment) -> Self {
        Self {
            round,
            slot,
            segment,
            entrants: [EntrantSpot::TBD, EntrantSpot::TBD],
            winner: None,
            next_match: None,
            loser_match: None,
        }
    }

    pub fn state(&self) -> MatchState {
        if self.winner.is_some() {
            return MatchState::Decided;
        }

        match self.entrants.iter().filter(|e| e.is_entrant()).count() {
            0 => MatchState::Empty,
            1 => MatchState::PartiallyFilled,
            _ => MatchState::Ready,
        }
    }

    /// Returns `true` if one spot holds an entrant and the other one stays empty forever.
    pub fn is_bye(&self) -> bool {
        matches!(
            self.entrants,
            [EntrantSpot::Entrant(_), EntrantSpot::Empty]
                | [EntrantSpot::Empty, EntrantSpot::Entrant(_)]
        )
    }

    /// Returns the position of `entrant` within this match.
    pub fn position_of(&self, entrant: usize) -> Option<usize> {
        self.entrants
            .iter()
            .position(|spot| *spot == EntrantSpot::Entrant(entrant))
    }

    /// Returns the loser of a decided match.
    pub fn loser(&self) -> Option<usize> {
        let winner = self.winner?;

        self.entrants
            .iter()
            .filter_map(|spot| spot.entrant())
            .find(|entrant| *entrant != winner)
    }
}

impl Index<usize> for MatchNode {
    type Output = EntrantSpot<usize>;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.entrants[index]
    }
}

impl IndexMut<usize> for MatchNode {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.entrants[index]
    }
}

#[cfg(test)]
mod tests {
    use super::{Entrants, EntrantSpot, Error, MatchNode, MatchState, Participant, Segment};

    #[macro_export]
    macro_rules! entrants {
        ($($x:expr),*$(,)?) => {
            vec![$($x),*].into_iter()
        };
    }

    #[test]
    fn test_entrants_validate() {
        let entrants = Entrants::from(vec![1, 2, 3]);
        assert_eq!(entrants.validate(), Ok(()));

        let entrants: Entrants<i32> = Entrants::new();
        assert_eq!(entrants.validate(), Err(Error::NoEntrants));

        let entrants = Entrants::from(vec![1, 2, 3, 2]);
        assert_eq!(
            entrants.validate(),
            Err(Error::DuplicateEntrant { seed: 4, first: 2 })
        );
    }

    #[test]
    fn test_participant_identity() {
        let a = Participant::new(1, "Alpha");
        let b = Participant::new(1, "Renamed");
        let c = Participant::new(2, "Alpha");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "Alpha");

        let entrants = Entrants::from(vec![a, c, b]);
        assert_eq!(
            entrants.validate(),
            Err(Error::DuplicateEntrant { seed: 3, first: 1 })
        );
    }

    #[test]
    fn test_match_node_state() {
        let mut node = MatchNode::new(1, 1, Segment::Upper);
        assert_eq!(node.state(), MatchState::Empty);

        node[0] = EntrantSpot::Entrant(0);
        assert_eq!(node.state(), MatchState::PartiallyFilled);
        assert!(!node.is_bye());

        node[1] = EntrantSpot::Empty;
        assert_eq!(node.state(), MatchState::PartiallyFilled);
        assert!(node.is_bye());

        node[1] = EntrantSpot::Entrant(3);
        assert_eq!(node.state(), MatchState::Ready);
        assert_eq!(node.position_of(3), Some(1));
        assert_eq!(node.position_of(2), None);
        assert_eq!(node.loser(), None);

        node.winner = Some(3);
        assert_eq!(node.state(), MatchState::Decided);
        assert_eq!(node.loser(), Some(0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_segment() {
        use serde_test::{assert_tokens, Token};

        assert_tokens(
            &Segment::GrandFinal,
            &[Token::UnitVariant {
                name: "Segment",
                variant: "grand_final",
            }],
        );

        assert_tokens(
            &EntrantSpot::Entrant(4_usize),
            &[
                Token::NewtypeVariant {
                    name: "EntrantSpot",
                    variant: "Entrant",
                },
                Token::U64(4),
            ],
        );
    }
}
