//! cytobench: classifier benchmarking library
//!
//! Loads a tabular cytology dataset, cleans missing values and remaps the
//! binary outcome, partitions and standardizes the features, then compares
//! candidate classifiers by stratified k-fold cross-validation.

pub mod cli;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod utils;
