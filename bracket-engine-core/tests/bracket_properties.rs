//! Property-based tests for bracket generation and result recording.
//!
//! Every property is checked for both formats over a wide range of entrant counts.
use bracket_engine_core::{
    Bracket, BracketOptions, EntrantSpot, Format, MatchState, Participant, Segment,
};
use proptest::prelude::*;

fn participants(n: usize) -> Vec<Participant> {
    (0..n)
        .map(|i| Participant::new(i as u64 + 100, format!("Team {}", i + 1)))
        .collect()
}

fn format_strategy() -> impl Strategy<Value = Format> {
    prop_oneof![
        Just(Format::SingleElimination),
        Just(Format::DoubleElimination)
    ]
}

fn generate(format: Format, n: usize) -> Bracket<Participant> {
    Bracket::generate(format, participants(n), BracketOptions::default()).unwrap()
}

/// Plays every match that becomes ready until none is left. `pick` returns `true` if the first
/// entrant of the match should win.
fn play<T, F>(bracket: &mut Bracket<T>, mut pick: F) -> usize
where
    F: FnMut(usize, usize) -> bool,
{
    let mut played = 0;

    while let Some(index) = bracket
        .matches()
        .iter()
        .position(|m| m.state() == MatchState::Ready)
    {
        let node = &bracket.matches()[index];
        let a = node.entrants[0].entrant().unwrap();
        let b = node.entrants[1].entrant().unwrap();

        let winner = if pick(a, b) { a } else { b };
        bracket.record_winner(index, winner).unwrap();
        played += 1;
    }

    played
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn test_capacity_and_byes(n in 1usize..300, format in format_strategy()) {
        let bracket = generate(format, n);
        let spec = bracket.spec();

        prop_assert!(spec.capacity().is_power_of_two());
        prop_assert!(spec.capacity() >= n);
        prop_assert!(spec.capacity() == 2 || spec.capacity() / 2 < n);
        prop_assert_eq!(spec.byes(), spec.capacity() - n);
    }

    #[test]
    fn test_every_entrant_placed_once(n in 2usize..300, format in format_strategy()) {
        let bracket = generate(format, n);
        let first = bracket.rounds(Segment::Upper).next().unwrap();

        let mut seen = vec![0; n];
        for node in first.matches {
            for spot in node.entrants {
                if let EntrantSpot::Entrant(index) = spot {
                    seen[index] += 1;
                }
            }
        }
        prop_assert!(seen.iter().all(|count| *count == 1));

        // Byes: the sole entrant already waits in the next match, nobody else is past round 1.
        let byes: Vec<_> = first.matches.iter().filter(|m| m.is_bye()).collect();
        prop_assert_eq!(byes.len(), bracket.spec().byes());

        let mut advanced = Vec::new();
        for node in byes {
            let entrant = node.entrants.iter().find_map(|spot| spot.entrant()).unwrap();
            prop_assert_eq!(node.winner, None);

            if let Some(link) = node.next_match {
                let next = &bracket.matches()[link.index];
                prop_assert_eq!(next.entrants[link.position], EntrantSpot::Entrant(entrant));
                advanced.push(entrant);
            }
        }

        let mut later: Vec<_> = bracket
            .matches()
            .iter()
            .filter(|m| !(m.segment == Segment::Upper && m.round == 1))
            .flat_map(|m| m.entrants.iter().filter_map(|spot| spot.entrant()))
            .collect();
        later.sort_unstable();
        advanced.sort_unstable();
        prop_assert_eq!(later, advanced);
    }

    #[test]
    fn test_generation_is_deterministic(n in 1usize..200, format in format_strategy()) {
        let a = generate(format, n);
        let b = generate(format, n);

        prop_assert_eq!(a.matches(), b.matches());
    }

    #[test]
    fn test_progression_integrity(n in 2usize..300, format in format_strategy()) {
        let bracket = generate(format, n);
        let terminal = bracket.terminal().unwrap();

        for (index, node) in bracket.matches().iter().enumerate() {
            if index == terminal {
                prop_assert_eq!(node.next_match, None);
            } else {
                let link = node.next_match.unwrap();
                prop_assert!(link.index > index);
                prop_assert!(link.position < 2);
            }
        }

        // Sibling matches share their next match, and no two matches feed the same spot.
        for segment in bracket.segments() {
            let rounds: Vec<_> = bracket.rounds(segment).collect();

            for pair in rounds.windows(2) {
                let (current, next) = (&pair[0], &pair[1]);
                if current.matches.len() != next.matches.len() * 2 {
                    continue;
                }

                for i in 0..next.matches.len() {
                    let first = current.matches[2 * i].next_match;
                    let second = current.matches[2 * i + 1].next_match;

                    prop_assert_eq!(first.map(|l| l.index), second.map(|l| l.index));
                    prop_assert_eq!(first.map(|l| l.index), next.index_of(i + 1));
                }
            }
        }

        let mut targets: Vec<_> = bracket
            .matches()
            .iter()
            .flat_map(|m| [m.next_match, m.loser_match])
            .flatten()
            .map(|link| (link.index, link.position))
            .collect();
        let len = targets.len();
        targets.sort_unstable();
        targets.dedup();
        prop_assert_eq!(targets.len(), len);
    }

    #[test]
    fn test_double_elimination_shape(n in 3usize..300) {
        let bracket = generate(Format::DoubleElimination, n);
        let spec = bracket.spec();

        prop_assert_eq!(bracket.rounds(Segment::Upper).count(), spec.rounds());
        prop_assert_eq!(bracket.rounds(Segment::Lower).count(), 2 * spec.rounds() - 2);

        let grand_finals: Vec<_> = bracket
            .matches()
            .iter()
            .enumerate()
            .filter(|(_, m)| m.segment == Segment::GrandFinal)
            .map(|(index, _)| index)
            .collect();
        prop_assert_eq!(grand_finals.len(), 1);

        let upper_final = bracket.rounds(Segment::Upper).last().unwrap();
        let lower_final = bracket.rounds(Segment::Lower).last().unwrap();
        prop_assert_eq!(upper_final.matches[0].next_match.map(|l| l.index), Some(grand_finals[0]));
        prop_assert_eq!(lower_final.matches[0].next_match.map(|l| l.index), Some(grand_finals[0]));

        // Every upper match drops its loser into the lower bracket.
        for node in bracket.matches().iter().filter(|m| m.segment == Segment::Upper) {
            let link = node.loser_match.unwrap();
            prop_assert_eq!(bracket.matches()[link.index].segment, Segment::Lower);
        }
    }

    #[test]
    fn test_top_seed_wins(n in 1usize..100, format in format_strategy()) {
        let mut bracket = generate(format, n);
        play(&mut bracket, |a, b| a < b);

        prop_assert_eq!(bracket.champion().map(|p| p.id), Some(100));
    }

    #[test]
    fn test_play_to_completion(
        n in 2usize..100,
        format in format_strategy(),
        picks in prop::collection::vec(any::<bool>(), 256),
    ) {
        let mut bracket = generate(format, n);

        let mut picks = picks.into_iter().cycle();
        let played = play(&mut bracket, |_, _| picks.next().unwrap_or(true));

        let champion = bracket.champion().cloned();
        prop_assert!(champion.is_some());

        // No spot is left waiting and every playable match was played.
        prop_assert!(bracket
            .matches()
            .iter()
            .all(|m| m.entrants.iter().all(|spot| !spot.is_tbd())));
        prop_assert!(bracket
            .matches()
            .iter()
            .all(|m| m.state() != MatchState::Ready));

        // Single elimination knocks out one entrant per match. In double elimination everyone
        // is out after two losses, except for the grand final which is never replayed.
        let mut losses = vec![0; n];
        for node in bracket.matches() {
            if let Some(loser) = node.loser() {
                losses[loser] += 1;
            }
        }

        let champion = bracket
            .entrants()
            .iter()
            .position(|p| Some(p) == champion.as_ref())
            .unwrap();

        match format {
            Format::SingleElimination => {
                prop_assert_eq!(played, n - 1);
                prop_assert_eq!(losses[champion], 0);
                prop_assert!(losses.iter().enumerate().all(|(i, l)| i == champion || *l == 1));
            }
            Format::DoubleElimination if n > 2 => {
                let grand_final = bracket.terminal().unwrap();
                let runner_up = bracket.matches()[grand_final].loser().unwrap();

                prop_assert_eq!(losses[champion] + losses[runner_up], 2);
                prop_assert!(losses
                    .iter()
                    .enumerate()
                    .all(|(i, l)| i == champion || i == runner_up || *l == 2));
            }
            Format::DoubleElimination => {
                prop_assert_eq!(played, 1);
            }
        }
    }
}
