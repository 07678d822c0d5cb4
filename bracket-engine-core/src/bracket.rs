use std::ops::Range;

use crate::rounds::Rounds;
use crate::{
    BracketOptions, BracketSpec, DoubleElimination, EntrantSpot, Entrants, Error, Format, Link,
    MatchNode, MatchState, Result, Segment, SingleElimination,
};

/// The position of every round inside the node arena, grouped by [`Segment`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Layout {
    pub(crate) upper: Vec<Range<usize>>,
    pub(crate) lower: Vec<Range<usize>>,
    pub(crate) grand_final: Vec<Range<usize>>,
    pub(crate) third_place: Vec<Range<usize>>,
    len: usize,
}

impl Layout {
    /// Appends a new round with `matches` matches to `segment`.
    pub(crate) fn push(&mut self, segment: Segment, matches: usize) {
        let range = self.len..self.len + matches;
        self.len = range.end;

        match segment {
            Segment::Upper => self.upper.push(range),
            Segment::Lower => self.lower.push(range),
            Segment::GrandFinal => self.grand_final.push(range),
            Segment::ThirdPlace => self.third_place.push(range),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn rounds(&self, segment: Segment) -> &[Range<usize>] {
        match segment {
            Segment::Upper => &self.upper,
            Segment::Lower => &self.lower,
            Segment::GrandFinal => &self.grand_final,
            Segment::ThirdPlace => &self.third_place,
        }
    }

    /// Creates an unlinked placeholder node for every match of the layout.
    pub(crate) fn allocate(&self) -> Vec<MatchNode> {
        let mut matches = vec![MatchNode::new(0, 0, Segment::Upper); self.len];

        for segment in [
            Segment::Upper,
            Segment::Lower,
            Segment::GrandFinal,
            Segment::ThirdPlace,
        ] {
            for (round, range) in self.rounds(segment).iter().enumerate() {
                for (slot, index) in range.clone().enumerate() {
                    matches[index] = MatchNode::new(round + 1, slot + 1, segment);
                }
            }
        }

        matches
    }

    /// Returns the index of the match deciding the bracket.
    pub(crate) fn terminal(&self) -> Option<usize> {
        self.grand_final
            .first()
            .or_else(|| self.upper.last())
            .map(|range| range.start)
    }
}

/// A generated bracket.
///
/// The matches are stored in a single arena in topological order: all upper bracket rounds, all
/// lower bracket rounds, then the grand final or third place match. Every [`Link`] points to a
/// higher index than the match it belongs to.
#[derive(Clone, Debug)]
pub struct Bracket<T> {
    entrants: Entrants<T>,
    matches: Vec<MatchNode>,
    format: Format,
    spec: BracketSpec,
    options: BracketOptions,
    layout: Layout,
}

impl<T> Bracket<T> {
    /// Generates a new bracket of the given `format` for `entrants`, which must be in seed order.
    ///
    /// # Errors
    ///
    /// Returns an [`enum@Error`] if `entrants` is empty or contains the same entrant twice.
    pub fn generate<I>(format: Format, entrants: I, options: BracketOptions) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: PartialEq,
    {
        match format {
            Format::SingleElimination => SingleElimination::with_options(options).build(entrants),
            Format::DoubleElimination => DoubleElimination::new().build(entrants),
        }
    }

    /// Finishes a freshly seeded bracket by moving every entrant without an opponent forward.
    pub(crate) fn assemble(
        format: Format,
        entrants: Entrants<T>,
        spec: BracketSpec,
        options: BracketOptions,
        layout: Layout,
        mut matches: Vec<MatchNode>,
    ) -> Result<Self> {
        // Links always point forward, so a single pass settles all chains of byes.
        for index in 0..matches.len() {
            forward(&mut matches, index)?;
        }

        log::debug!(
            "Created new {} bracket with {} matches",
            format,
            matches.len()
        );

        Ok(Self {
            entrants,
            matches,
            format,
            spec,
            options,
            layout,
        })
    }

    /// Resumes a bracket from previously generated `matches`.
    ///
    /// # Errors
    ///
    /// Returns an [`enum@Error`] if `matches` has an invalid number of matches for `entrants`, a
    /// match doesn't have the round, slot, segment or links of a generated bracket, or a match
    /// refers to an entrant that is out-of-bounds.
    pub fn resume(
        format: Format,
        entrants: Entrants<T>,
        matches: Vec<MatchNode>,
        options: BracketOptions,
    ) -> Result<Self>
    where
        T: PartialEq,
    {
        log::debug!(
            "Trying to resume {} bracket with {} entrants and {} matches",
            format,
            entrants.len(),
            matches.len()
        );

        entrants.validate()?;
        let spec = BracketSpec::new(entrants.len())?;
        let (layout, skeleton) = Self::skeleton(format, &spec, options)?;

        if matches.len() != layout.len() {
            return Err(Error::InvalidNumberOfMatches {
                expected: layout.len(),
                found: matches.len(),
            });
        }

        for (node, expected) in matches.iter().zip(skeleton.iter()) {
            if node.round != expected.round
                || node.slot != expected.slot
                || node.segment != expected.segment
                || node.next_match != expected.next_match
                || node.loser_match != expected.loser_match
            {
                return Err(Error::StructuralInconsistency(
                    "match does not fit the bracket layout",
                ));
            }

            for spot in node.entrants.iter() {
                if let EntrantSpot::Entrant(index) = spot {
                    if *index >= entrants.len() {
                        return Err(Error::InvalidEntrant {
                            index: *index,
                            length: entrants.len(),
                        });
                    }
                }
            }

            if let Some(winner) = node.winner {
                if node.position_of(winner).is_none() {
                    return Err(Error::StructuralInconsistency(
                        "winner does not play in the match",
                    ));
                }
            }
        }

        Ok(Self {
            entrants,
            matches,
            format,
            spec,
            options,
            layout,
        })
    }

    /// Builds the linked but unseeded matches of a bracket.
    fn skeleton(
        format: Format,
        spec: &BracketSpec,
        options: BracketOptions,
    ) -> Result<(Layout, Vec<MatchNode>)> {
        match format {
            Format::SingleElimination => SingleElimination::skeleton(spec, options),
            Format::DoubleElimination => DoubleElimination::skeleton(spec),
        }
    }

    /// Returns a reference to the entrants in the bracket.
    #[inline]
    pub fn entrants(&self) -> &Entrants<T> {
        &self.entrants
    }

    /// Returns all matches in arena order. A [`Link`] is an index into this slice.
    #[inline]
    pub fn matches(&self) -> &[MatchNode] {
        &self.matches
    }

    /// Returns the matches from the bracket.
    #[inline]
    pub fn into_matches(self) -> Vec<MatchNode> {
        self.matches
    }

    /// Returns the match at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&MatchNode> {
        self.matches.get(index)
    }

    /// Returns the entrant at `index` of [`Entrants`].
    #[inline]
    pub fn entrant(&self, index: usize) -> Option<&T> {
        self.entrants.get(index)
    }

    #[inline]
    pub fn format(&self) -> Format {
        self.format
    }

    #[inline]
    pub fn spec(&self) -> &BracketSpec {
        &self.spec
    }

    #[inline]
    pub fn options(&self) -> BracketOptions {
        self.options
    }

    /// Returns an iterator over the rounds of `segment`.
    pub fn rounds(&self, segment: Segment) -> Rounds<'_> {
        Rounds::new(&self.matches, segment, self.layout.rounds(segment))
    }

    /// Returns every [`Segment`] containing at least one match, in arena order.
    pub fn segments(&self) -> Vec<Segment> {
        [
            Segment::Upper,
            Segment::Lower,
            Segment::GrandFinal,
            Segment::ThirdPlace,
        ]
        .into_iter()
        .filter(|segment| !self.layout.rounds(*segment).is_empty())
        .collect()
    }

    /// Returns the index of the match that decides the bracket. Returns `None` if the bracket has
    /// no matches.
    #[inline]
    pub fn terminal(&self) -> Option<usize> {
        self.layout.terminal()
    }

    /// Returns the winner of the bracket, if already decided. A bracket with a single entrant is
    /// won by that entrant without any matches.
    pub fn champion(&self) -> Option<&T> {
        if self.matches.is_empty() {
            return self.entrants.first();
        }

        let winner = self.matches.get(self.terminal()?)?.winner?;
        self.entrants.get(winner)
    }

    /// Records `entrant` as the winner of the match at `index`.
    ///
    /// The winner moves into the spot linked by [`MatchNode::next_match`], the loser into the spot
    /// linked by [`MatchNode::loser_match`]. Any match that ends up with a single entrant facing a
    /// permanently empty spot forwards that entrant as well.
    ///
    /// The bracket is not modified if an error is returned.
    ///
    /// # Errors
    ///
    /// Returns an [`enum@Error`] if the match does not exist, is not [`MatchState::Ready`], or
    /// `entrant` does not play in it.
    pub fn record_winner(&mut self, index: usize, entrant: usize) -> Result<()> {
        log::debug!("Recording entrant {} as winner of match {}", entrant, index);

        let node = self.matches.get(index).ok_or(Error::UnknownMatch(index))?;

        let state = node.state();
        if state != MatchState::Ready {
            return Err(Error::MatchNotReady { index, state });
        }

        let position = node
            .position_of(entrant)
            .ok_or(Error::NotAParticipant { index, entrant })?;
        let loser = node.entrants[1 - position];

        // Work on a copy so that a failure leaves the bracket untouched.
        let mut matches = self.matches.clone();
        matches[index].winner = Some(entrant);

        let mut pending = Vec::with_capacity(2);

        if let Some(link) = matches[index].next_match {
            log::debug!("Next winner match is {}", link.index);

            fill(&mut matches, link, EntrantSpot::Entrant(entrant))?;
            pending.push(link.index);
        }

        if let Some(link) = matches[index].loser_match {
            log::debug!("Next loser match is {}", link.index);

            fill(&mut matches, link, loser)?;
            pending.push(link.index);
        }

        while let Some(index) = pending.pop() {
            pending.extend(forward(&mut matches, index)?);
        }

        self.matches = matches;
        Ok(())
    }
}

/// Writes `spot` into the spot referenced by `link`, which must still be [`EntrantSpot::TBD`].
fn fill(matches: &mut [MatchNode], link: Link, spot: EntrantSpot<usize>) -> Result<()> {
    let target = matches
        .get_mut(link.index)
        .and_then(|node| node.entrants.get_mut(link.position))
        .ok_or(Error::StructuralInconsistency(
            "link points outside of the bracket",
        ))?;

    if !target.is_tbd() {
        return Err(Error::SlotOccupied {
            index: link.index,
            position: link.position,
        });
    }

    *target = spot;
    Ok(())
}

/// Moves the entrant of a match that can never be played into the following match. A match
/// without any entrant forwards an empty spot instead. Nobody drops to the loser match in either
/// case.
///
/// Returns the indexes of all matches that were changed.
fn forward(matches: &mut [MatchNode], index: usize) -> Result<Vec<usize>> {
    let node = &matches[index];
    if node.winner.is_some() {
        return Ok(Vec::new());
    }

    let spot = match node.entrants {
        [EntrantSpot::Entrant(entrant), EntrantSpot::Empty]
        | [EntrantSpot::Empty, EntrantSpot::Entrant(entrant)] => EntrantSpot::Entrant(entrant),
        [EntrantSpot::Empty, EntrantSpot::Empty] => EntrantSpot::Empty,
        _ => return Ok(Vec::new()),
    };

    let (next_match, loser_match) = (node.next_match, node.loser_match);
    let mut changed = Vec::with_capacity(2);

    if let Some(link) = next_match {
        log::debug!("Forwarding {:?} from match {} to {}", spot, index, link.index);

        fill(matches, link, spot)?;
        changed.push(link.index);
    }

    if let Some(link) = loser_match {
        fill(matches, link, EntrantSpot::Empty)?;
        changed.push(link.index);
    }

    Ok(changed)
}
