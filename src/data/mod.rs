//! Template and save-file IO

pub mod save;
pub mod templates;

pub use save::{SaveEntry, SaveFile, SaveKind};
pub use templates::{load_catalog, Catalog};
