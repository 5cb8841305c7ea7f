//! Report module - text report, tables, charts and JSON export

pub mod export;
pub mod plots;
pub mod summary;

pub use export::*;
pub use plots::*;
pub use summary::*;
