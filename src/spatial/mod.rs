//! Spatial layer: dense grids and the battlefield

pub mod field;
pub mod grid;

pub use field::{Cell, Field};
pub use grid::Grid;
