pub mod export;

pub use export::{ExportFile, ExportService};
