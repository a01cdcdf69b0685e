//! Match lifecycle and per-tick results

use serde::{Deserialize, Serialize};

use crate::core::types::{Side, Tick, UnitId};

/// Match state machine: Running until a leader falls or the player saves and quits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "state")]
pub enum MatchState {
    #[default]
    Running,
    Ended { winner: Side },
    /// Halted mid-tick after a save; resume by loading that save
    Stopped,
}

impl MatchState {
    pub fn is_running(&self) -> bool {
        matches!(self, MatchState::Running)
    }

    pub fn winner(&self) -> Option<Side> {
        match self {
            MatchState::Running | MatchState::Stopped => None,
            MatchState::Ended { winner } => Some(*winner),
        }
    }
}

/// A unit taken off the field by the death sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Casualty {
    pub id: UnitId,
    pub name: String,
    pub side: Side,
    pub leader: bool,
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: Tick,
    pub units_acted: usize,
    pub removed: Vec<Casualty>,
    pub xp_pooled: f64,
    pub state: MatchState,
}

impl TickReport {
    pub fn new(tick: Tick) -> Self {
        Self {
            tick,
            ..Default::default()
        }
    }
}
