use std::fmt::{self, Display, Formatter};

use bracket_engine_core::{Bracket, EntrantSpot, Entrants, Format, MatchNode, Participant};
use serde::Serialize;

/// The data written for [`Output::Json`].
///
/// [`Output::Json`]: crate::config::Output::Json
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub format: Format,
    pub capacity: usize,
    pub byes: usize,
    pub entrants: &'a Entrants<Participant>,
    pub matches: &'a [MatchNode],
    pub champion: Option<&'a Participant>,
}

impl<'a> Snapshot<'a> {
    pub fn new(bracket: &'a Bracket<Participant>) -> Self {
        Self {
            format: bracket.format(),
            capacity: bracket.spec().capacity(),
            byes: bracket.spec().byes(),
            entrants: bracket.entrants(),
            matches: bracket.matches(),
            champion: bracket.champion(),
        }
    }
}

/// Human readable rendering of a bracket, one line per match.
#[derive(Debug)]
pub struct Text<'a, T>(pub &'a Bracket<T>);

impl<'a, T> Text<'a, T>
where
    T: Display,
{
    fn spot(&self, node: &MatchNode, position: usize) -> String {
        match node.entrants[position] {
            EntrantSpot::Entrant(index) => {
                let name = match self.0.entrant(index) {
                    Some(entrant) => entrant.to_string(),
                    None => String::from("???"),
                };

                if node.winner == Some(index) {
                    format!("{} (W)", name)
                } else {
                    name
                }
            }
            EntrantSpot::Empty => String::from("bye"),
            EntrantSpot::TBD => String::from("TBD"),
        }
    }
}

impl<'a, T> Display for Text<'a, T>
where
    T: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let bracket = self.0;
        let spec = bracket.spec();

        writeln!(
            f,
            "{} bracket: {} entrants, {} slots, {} byes",
            bracket.format(),
            spec.participants(),
            spec.capacity(),
            spec.byes()
        )?;

        for segment in bracket.segments() {
            writeln!(f)?;
            writeln!(f, "== {} ==", segment)?;

            for round in bracket.rounds(segment) {
                writeln!(f, "Round {}", round.number)?;

                for (index, node) in round.iter() {
                    writeln!(
                        f,
                        "  #{:<3} {} vs {} [{}]",
                        index,
                        self.spot(node, 0),
                        self.spot(node, 1),
                        node.state()
                    )?;
                }
            }
        }

        if let Some(champion) = bracket.champion() {
            writeln!(f)?;
            writeln!(f, "Champion: {}", champion)?;
        }

        Ok(())
    }
}
