//! Leader actions and the collaborator that chooses them
//!
//! The player leader's turn is driven by an `ActionSelector`. The game asks
//! it for actions until one succeeds or it ends the turn; failed actions are
//! reported back through `rejected` and never change state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::error::DuelError;
use crate::core::types::UnitId;
use crate::game::engine::Game;

/// One state-changing request from a leader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerAction {
    Summon {
        school: String,
        skill: String,
        x: i32,
        y: i32,
    },
    Move {
        x: i32,
        y: i32,
    },
    Attack {
        x: i32,
        y: i32,
    },
    UpgradeSchool(String),
    AccumulateEnergy,
    EndTurn,
    /// Write a save file and stop the match before anyone else acts
    SaveAndExit(PathBuf),
}

/// Chooses actions for the player leader
pub trait ActionSelector {
    /// Next action for `leader`; `game` is a read-only view for queries
    fn select(&mut self, game: &Game, leader: UnitId) -> PlayerAction;

    /// The last action failed; the turn continues with another `select`
    fn rejected(&mut self, _action: &PlayerAction, _error: &DuelError) {}
}

/// Unattended player: the same summon-or-charge heuristic the enemy uses
///
/// Ends its turn after any rejection so a match can never stall on it.
#[derive(Debug, Default)]
pub struct AutoPilot {
    gave_up: bool,
}

impl AutoPilot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ActionSelector for AutoPilot {
    fn select(&mut self, game: &Game, leader: UnitId) -> PlayerAction {
        if std::mem::take(&mut self.gave_up) {
            return PlayerAction::EndTurn;
        }
        game.greedy_action(leader)
    }

    fn rejected(&mut self, _action: &PlayerAction, _error: &DuelError) {
        self.gave_up = true;
    }
}

/// Replays a fixed list of actions, then ends every turn
///
/// Useful for scripted matches and tests.
#[derive(Debug, Default)]
pub struct Scripted {
    actions: std::collections::VecDeque<PlayerAction>,
    pub rejections: Vec<String>,
}

impl Scripted {
    pub fn new(actions: impl IntoIterator<Item = PlayerAction>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            rejections: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.actions.len()
    }
}

impl ActionSelector for Scripted {
    fn select(&mut self, _game: &Game, _leader: UnitId) -> PlayerAction {
        self.actions.pop_front().unwrap_or(PlayerAction::EndTurn)
    }

    fn rejected(&mut self, _action: &PlayerAction, error: &DuelError) {
        self.rejections.push(error.to_string());
    }
}
