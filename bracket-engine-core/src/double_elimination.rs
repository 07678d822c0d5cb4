use crate::bracket::Layout;
use crate::single_elimination::seed_first_round;
use crate::wiring;
use crate::{
    Bracket, BracketOptions, BracketSpec, Entrants, Error, Format, MatchNode, Result, Segment,
    SingleElimination,
};

/// A double elimination bracket builder.
///
/// The upper bracket is built exactly like a [`SingleElimination`] bracket. Every loser of the
/// upper bracket drops into the lower bracket, which has `2 * log2(capacity) - 2` rounds. The
/// winners of both brackets meet in a single grand final.
///
/// Brackets with 2 or fewer entrants have no lower bracket and are built as single elimination
/// brackets.
#[derive(Copy, Clone, Debug, Default)]
pub struct DoubleElimination;

impl DoubleElimination {
    /// Creates a new `DoubleElimination` builder.
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Builds the bracket for `entrants`, which must be in seed order.
    ///
    /// All lower bracket spots start out as [`TBD`]. Spots that would receive the loser of an
    /// upper bracket bye are [`Empty`] instead, since that match is never played.
    ///
    /// # Errors
    ///
    /// Returns an [`enum@Error`] if `entrants` is empty or contains the same entrant twice.
    ///
    /// [`TBD`]: crate::EntrantSpot::TBD
    /// [`Empty`]: crate::EntrantSpot::Empty
    pub fn build<T, I>(&self, entrants: I) -> Result<Bracket<T>>
    where
        I: IntoIterator<Item = T>,
        T: PartialEq,
    {
        let entrants: Entrants<T> = entrants.into_iter().collect();
        entrants.validate()?;

        let spec = BracketSpec::new(entrants.len())?;

        log::debug!(
            "Creating a new DoubleElimination bracket with {} entrants ({} slots, {} byes)",
            spec.participants(),
            spec.capacity(),
            spec.byes()
        );

        let (layout, mut matches) = Self::skeleton(&spec)?;
        seed_first_round(&mut matches, &layout, &spec)?;

        Bracket::assemble(
            Format::DoubleElimination,
            entrants,
            spec,
            BracketOptions::default(),
            layout,
            matches,
        )
    }

    /// Creates all matches of the bracket and links them, without placing any entrant.
    pub(crate) fn skeleton(spec: &BracketSpec) -> Result<(Layout, Vec<MatchNode>)> {
        if spec.lower_rounds() == 0 {
            return SingleElimination::skeleton(spec, BracketOptions::default());
        }

        let mut layout = Layout::default();

        for round in 1..=spec.rounds() {
            layout.push(Segment::Upper, spec.upper_matches(round));
        }

        for round in 1..=spec.lower_rounds() {
            layout.push(Segment::Lower, spec.lower_matches(round));
        }

        layout.push(Segment::GrandFinal, 1);

        let mut matches = layout.allocate();

        wiring::wire_rounds(&mut matches, &layout.upper)?;
        wiring::wire_rounds(&mut matches, &layout.lower)?;
        wiring::route_losers(&mut matches, &layout.upper, &layout.lower)?;

        let finals = layout
            .upper
            .last()
            .zip(layout.lower.last())
            .zip(layout.grand_final.first());

        match finals {
            Some(((upper, lower), grand_final)) => {
                wiring::connect(&mut matches, upper.start, grand_final.start, 0);
                wiring::connect(&mut matches, lower.start, grand_final.start, 1);
            }
            None => {
                return Err(Error::StructuralInconsistency(
                    "double elimination bracket without finals",
                ))
            }
        }

        log::debug!(
            "Lower bracket starts at match {} with {} rounds",
            spec.capacity() - 1,
            layout.lower.len()
        );

        Ok((layout, matches))
    }
}
