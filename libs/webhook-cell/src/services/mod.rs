pub mod ingest;
pub mod nail_surgery;

pub use ingest::*;
pub use nail_surgery::*;
