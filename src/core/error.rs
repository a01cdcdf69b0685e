use thiserror::Error;

use crate::core::types::UnitId;

/// Errors raised by match actions and lookups.
///
/// Every variant except the loading ones is recoverable: the caller reports it
/// and asks again without advancing the turn. A destroyed leader is not an
/// error, see `MatchState::Ended`.
#[derive(Error, Debug)]
pub enum DuelError {
    #[error("Cell ({x}, {y}) is unavailable")]
    CellUnavailable { x: i32, y: i32 },

    #[error("Speed is not enough: step of {distance} exceeds budget {budget}")]
    SpeedExceeded { distance: i32, budget: i32 },

    #[error("Knowledge of {school} is not enough: have {have}, need {need}")]
    InsufficientKnowledge { school: String, have: f64, need: f64 },

    #[error("Energy is not enough: have {have}, need {need}")]
    InsufficientEnergy { have: f64, need: f64 },

    #[error("Not enough XP to upgrade: have {have}, need {need}")]
    InsufficientXp { have: f64, need: f64 },

    #[error("No such skill: {school}/{skill}")]
    NoSuchSkill { school: String, skill: String },

    #[error("Skill {skill} already exists in {school}")]
    DuplicateSkill { school: String, skill: String },

    #[error("No such school: {0}")]
    NoSuchSchool(String),

    #[error("No opposing unit at ({x}, {y})")]
    NoUnitAt { x: i32, y: i32 },

    #[error("Target ({x}, {y}) is out of reach")]
    OutOfReach { x: i32, y: i32 },

    #[error("Unit not found: {0:?}")]
    UnitNotFound(UnitId),

    #[error("Unit is not a leader: {0:?}")]
    NotALeader(UnitId),

    #[error("The match is already over")]
    MatchOver,

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Save error: {0}")]
    Save(#[from] SaveError),
}

/// Malformed or inconsistent template data
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Skill {skill} references unknown unit {unit}")]
    UnknownUnit { skill: String, unit: String },

    #[error("School {school} references unknown skill {skill}")]
    UnknownSkill { school: String, skill: String },

    #[error("Obstacle ({x}, {y}) lies outside the field")]
    ObstacleOutOfBounds { x: i32, y: i32 },

    #[error("Missing template: {0}")]
    Missing(String),
}

/// Malformed save data
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Saved unit {0} has no template")]
    UnknownUnit(String),

    #[error("The {0} roster has no leader at index 0")]
    LeaderNotFirst(crate::core::types::Side),

    #[error("Saved unit {name} cannot be placed: {reason}")]
    Placement { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, DuelError>;
