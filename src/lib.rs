//! Summoners - deterministic turn-based tactical duel
//!
//! Two leaders summon troops onto a grid and fight until one leader falls.

pub mod core;
pub mod data;
pub mod game;
pub mod knowledge;
pub mod spatial;
pub mod units;
