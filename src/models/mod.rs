pub mod catalog;
pub mod config;

pub use catalog::{output_file_name, PaletteCatalog, PaletteSelection, ORIGINAL};
pub use config::{default_worker_count, AppConfig};
