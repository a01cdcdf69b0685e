//! Match orchestration
//!
//! `Game` owns both rosters, the field and the schools table. Each call to
//! `Game::tick` runs one round of turns in initiative order, then removes the
//! dead and checks whether a leader fell.

pub mod actions;
pub mod engine;
pub mod leader;
pub mod roster;
pub mod scheduler;
pub mod state;

pub use actions::{ActionSelector, AutoPilot, PlayerAction, Scripted};
pub use engine::Game;
pub use roster::Roster;
pub use state::{Casualty, MatchState, TickReport};
