use crate::bracket::Layout;
use crate::seeding;
use crate::wiring;
use crate::{
    Bracket, BracketOptions, BracketSpec, Entrants, Error, Format, MatchNode, Result, Segment,
};

/// A single elimination bracket builder.
#[derive(Copy, Clone, Debug, Default)]
pub struct SingleElimination {
    options: BracketOptions,
}

impl SingleElimination {
    /// Creates a new `SingleElimination` builder using the default options.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `SingleElimination` builder using the given `options`.
    #[inline]
    pub fn with_options(options: BracketOptions) -> Self {
        Self { options }
    }

    /// Builds the bracket for `entrants`, which must be in seed order.
    ///
    /// Round 1 is filled using the balanced [`seeding`] order. Entrants without an opponent move
    /// straight on to round 2; their first round match stays undecided.
    ///
    /// # Errors
    ///
    /// Returns an [`enum@Error`] if `entrants` is empty or contains the same entrant twice.
    ///
    /// [`seeding`]: crate::seeding::seeding
    pub fn build<T, I>(&self, entrants: I) -> Result<Bracket<T>>
    where
        I: IntoIterator<Item = T>,
        T: PartialEq,
    {
        let entrants: Entrants<T> = entrants.into_iter().collect();
        entrants.validate()?;

        let spec = BracketSpec::new(entrants.len())?;

        log::debug!(
            "Creating new SingleElimination bracket with {} entrants ({} slots, {} byes)",
            spec.participants(),
            spec.capacity(),
            spec.byes()
        );
        log::debug!("Using options: {:?}", self.options);

        let (layout, mut matches) = Self::skeleton(&spec, self.options)?;
        seed_first_round(&mut matches, &layout, &spec)?;

        Bracket::assemble(
            Format::SingleElimination,
            entrants,
            spec,
            self.options,
            layout,
            matches,
        )
    }

    /// Creates all matches of the bracket and links them, without placing any entrant.
    pub(crate) fn skeleton(
        spec: &BracketSpec,
        options: BracketOptions,
    ) -> Result<(Layout, Vec<MatchNode>)> {
        let mut layout = Layout::default();

        // A single entrant wins without playing.
        if spec.participants() < 2 {
            return Ok((layout, Vec::new()));
        }

        for round in 1..=spec.rounds() {
            layout.push(Segment::Upper, spec.upper_matches(round));
        }

        // At least 3 entrants are required for a third place match.
        if options.third_place_match && spec.participants() > 2 {
            layout.push(Segment::ThirdPlace, 1);
        }

        let mut matches = layout.allocate();
        wiring::wire_rounds(&mut matches, &layout.upper)?;

        if let Some(third_place) = layout.third_place.first() {
            let semifinals = &layout.upper[layout.upper.len() - 2];
            wiring::route_semifinal_losers(&mut matches, semifinals, third_place.start)?;
        }

        Ok((layout, matches))
    }
}

/// Places every entrant (or an empty spot for a bye) into the first round of the upper bracket.
pub(crate) fn seed_first_round(
    matches: &mut [MatchNode],
    layout: &Layout,
    spec: &BracketSpec,
) -> Result<()> {
    let first = match layout.upper.first() {
        Some(first) => first,
        None => return Ok(()),
    };

    let slots = seeding::placement(spec)?;
    if slots.len() != first.len() * 2 {
        return Err(Error::StructuralInconsistency(
            "first round does not fit the bracket capacity",
        ));
    }

    for (index, pair) in first.clone().zip(slots.chunks_exact(2)) {
        matches[index].entrants = [pair[0], pair[1]];
    }

    Ok(())
}
