pub mod config;
pub mod error;
pub mod types;

pub use config::SimulationConfig;
pub use error::{DuelError, Result, SaveError, TemplateError};
pub use types::{GridPos, Side, Tick, UnitId};
