//! Knowledge domain: schools, their skills, and school dominance
//!
//! Dominance is a directed relation between two schools. It is neither
//! transitive nor total, and it only ever produces a damage multiplier.

pub mod school;
pub mod skill;
pub mod table;

pub use school::School;
pub use skill::{Production, Skill};
pub use table::{SchoolsTable, DOMINANT_MULTIPLIER, DOMINATED_MULTIPLIER};
