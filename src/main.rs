//! Headless match runner
//!
//! Plays one match from a template tree, with the player leader on autopilot,
//! and prints the result as JSON or text. With `--exit-at` the player saves
//! and quits at that tick instead; `--load` resumes from the save.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use summoners::core::error::{DuelError, Result, SaveError};
use summoners::core::types::{Side, Tick, UnitId};
use summoners::core::SimulationConfig;
use summoners::data::{load_catalog, SaveFile};
use summoners::game::{ActionSelector, AutoPilot, Game, MatchState, PlayerAction};

#[derive(Parser, Debug)]
#[command(name = "summoners")]
#[command(about = "Run a summoners duel to completion and report the outcome")]
struct Args {
    /// Template root holding Units/, Skills/, Schools/, Summoners/ and Field/
    #[arg(long, default_value = "data")]
    data: PathBuf,

    /// Match configuration (TOML); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the match RNG, overriding the config
    #[arg(long)]
    seed: Option<u64>,

    /// Ticks before the match is declared a draw, overriding the config
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Resume from a save file
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write a save file when the run stops
    #[arg(long)]
    save: Option<PathBuf>,

    /// Have the player save and quit on this tick
    #[arg(long, requires = "save")]
    exit_at: Option<Tick>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

#[derive(Serialize)]
struct MatchSummary {
    outcome: String,
    winner: Option<Side>,
    ticks: u64,
    player_units: usize,
    enemy_units: usize,
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("summoners=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(max_ticks) = args.max_ticks {
        config.max_ticks = max_ticks;
    }

    let catalog = load_catalog(&args.data)?;
    let mut game = Game::from_catalog(&catalog, config)?;
    if let Some(path) = &args.load {
        let save = SaveFile::read(path)?;
        game.load_save(&save, &catalog.units)?;
    }
    game.game_start();

    let mut player = Player {
        pilot: AutoPilot::new(),
        exit: args.exit_at.zip(args.save.clone()),
    };
    while game.state().is_running() && game.current_tick() < game.config().max_ticks {
        game.tick(&mut player)?;
    }

    if let Some(path) = &args.save {
        if game.state() != MatchState::Stopped {
            game.write_save(path)?;
        }
    }

    let summary = summarize(&game);
    match args.format.as_str() {
        "text" => print_text(&summary),
        other => {
            if other != "json" {
                tracing::warn!("Unknown format '{}', defaulting to json", other);
            }
            let json = serde_json::to_string_pretty(&summary).map_err(SaveError::from)?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// Autopilot that saves and quits once the exit tick comes round
struct Player {
    pilot: AutoPilot,
    exit: Option<(Tick, PathBuf)>,
}

impl ActionSelector for Player {
    fn select(&mut self, game: &Game, leader: UnitId) -> PlayerAction {
        match &self.exit {
            Some((tick, path)) if game.current_tick() >= *tick => {
                PlayerAction::SaveAndExit(path.clone())
            }
            _ => self.pilot.select(game, leader),
        }
    }

    fn rejected(&mut self, action: &PlayerAction, error: &DuelError) {
        if matches!(action, PlayerAction::SaveAndExit(_)) {
            self.exit = None;
        }
        self.pilot.rejected(action, error);
    }
}

fn summarize(game: &Game) -> MatchSummary {
    let (outcome, winner) = match game.state() {
        MatchState::Ended { winner } => (format!("{} wins", winner), Some(winner)),
        MatchState::Running => ("draw".to_string(), None),
        MatchState::Stopped => ("stopped".to_string(), None),
    };
    MatchSummary {
        outcome,
        winner,
        ticks: game.current_tick(),
        player_units: game.roster(Side::Player).len(),
        enemy_units: game.roster(Side::Enemy).len(),
        seed: game.config().seed,
    }
}

fn print_text(summary: &MatchSummary) {
    println!("Match Result");
    println!("============");
    println!("Outcome: {}", summary.outcome);
    println!("Ticks: {}", summary.ticks);
    println!("Surviving units: player {}, enemy {}", summary.player_units, summary.enemy_units);
    println!("Seed: {}", summary.seed);
}
