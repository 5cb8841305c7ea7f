//! Pipeline module - load, clean, partition, scale and benchmark

pub mod bench;
pub mod clean;
pub mod error;
pub mod folds;
pub mod loader;
pub mod metrics;
pub mod missing;
pub mod prepare;
pub mod scaler;
pub mod schema;
pub mod split;
pub mod target;

pub use bench::*;
pub use clean::*;
pub use error::*;
pub use folds::*;
pub use loader::*;
pub use metrics::*;
pub use missing::*;
pub use prepare::*;
pub use scaler::*;
pub use schema::*;
pub use split::*;
pub use target::*;
