mod config;
mod render;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process;

use bracket_engine_core::{Bracket, Format, MatchState, Participant};
use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::config::{Config, ConfigError, Output};
use crate::render::{Snapshot, Text};

#[derive(Debug, Parser)]
#[clap(version, about)]
pub struct Args {
    /// Path to a TOML config file.
    #[clap(short, long)]
    config: Option<PathBuf>,
    /// Bracket format: single or double.
    #[clap(short, long)]
    format: Option<Format>,
    /// Add a match for the third place (single elimination only).
    #[clap(long)]
    third_place_match: bool,
    /// Output format: json or text.
    #[clap(short, long)]
    output: Option<Output>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a bracket and print it.
    Generate {
        /// File with one participant per line in seed order. Reads from stdin if omitted.
        input: Option<PathBuf>,
    },
    /// Generate a bracket and play it to the end, the better seed winning every match.
    Simulate {
        /// File with one participant per line in seed order. Reads from stdin if omitted.
        input: Option<PathBuf>,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to read participants: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Bracket(#[from] bracket_engine_core::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn main() {
    let args = Args::parse();

    if let Err(err) = run(args) {
        log::error!("{}", err);
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let mut config = config.with_environment();

    if let Some(format) = args.format {
        config.format = format;
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    config.third_place_match |= args.third_place_match;

    pretty_env_logger::formatted_builder()
        .filter_level(config.loglevel)
        .init();

    log::debug!("Using config: {:?}", config);

    let (input, simulate) = match args.command {
        Command::Generate { input } => (input, false),
        Command::Simulate { input } => (input, true),
    };

    let participants = match input {
        Some(path) => read_participants(open(&path)?)?,
        None => read_participants(io::stdin().lock())?,
    };
    log::info!("Read {} participants", participants.len());

    let mut bracket = Bracket::generate(config.format, participants, config.options())?;

    if simulate {
        let played = simulate_bracket(&mut bracket)?;
        log::info!("Played {} matches", played);
    }

    match config.output {
        Output::Json => println!("{}", serde_json::to_string_pretty(&Snapshot::new(&bracket))?),
        Output::Text => print!("{}", Text(&bracket)),
    }

    Ok(())
}

fn open(path: &Path) -> io::Result<BufReader<File>> {
    File::open(path).map(BufReader::new)
}

/// Reads one participant per line. Blank lines and lines starting with `#` are skipped.
///
/// Every distinct name gets its own id. A repeated name gets the id of its first occurrence, so
/// that the bracket rejects it as a duplicate entrant.
fn read_participants<R>(reader: R) -> io::Result<Vec<Participant>>
where
    R: BufRead,
{
    let mut participants: Vec<Participant> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let name = line.trim();
        if name.is_empty() || name.starts_with('#') {
            continue;
        }

        let id = participants
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.id)
            .unwrap_or(participants.len() as u64 + 1);

        participants.push(Participant::new(id, name));
    }

    Ok(participants)
}

/// Plays every ready match in arena order until the bracket is decided. The entrant with the
/// better seed wins.
fn simulate_bracket<T>(bracket: &mut Bracket<T>) -> Result<usize, Error> {
    let mut played = 0;

    while let Some((index, winner)) = next_result(bracket) {
        log::debug!("Simulating match {}: entrant {} wins", index, winner);

        bracket.record_winner(index, winner)?;
        played += 1;
    }

    Ok(played)
}

fn next_result<T>(bracket: &Bracket<T>) -> Option<(usize, usize)> {
    bracket
        .matches()
        .iter()
        .enumerate()
        .find(|(_, node)| node.state() == MatchState::Ready)
        .and_then(|(index, node)| {
            node.entrants
                .iter()
                .filter_map(|spot| spot.entrant())
                .min()
                .map(|winner| (index, winner))
        })
}
