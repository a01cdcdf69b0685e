//! Unit model: templates, troop variants, and leaders
//!
//! Variants:
//! - Plain troop: flat group damage, chase-or-attack AI
//! - Morale troop: morale in [-1, 1] scales damage
//! - Resurrecting troop: wraps a plain or morale troop, revives fallen creatures
//! - Area troop: hits the whole opposing roster once, then self-destructs
//! - Leader (summoner): summons troops, its death ends the match

pub mod area;
pub mod constants;
pub mod descriptor;
pub mod factory;
pub mod morale;
pub mod resurrection;
pub mod summoner;
pub mod troop;
pub mod unit;

pub use area::AreaTroop;
pub use descriptor::{SummonerDescriptor, UnitDescriptor};
pub use factory::{
    create_amoral_unit, create_kamikaze, create_moral_unit, create_resurrection_unit,
    create_summoner, create_unit,
};
pub use morale::MoraleTroop;
pub use resurrection::{InnerTroop, ResurrectingTroop};
pub use summoner::Summoner;
pub use troop::Troop;
pub use unit::{Unit, UnitKind};
