//! Command-line front end for the walk time engine.
//!
//! Reads a TOML run description and CSV inputs, runs
//! [`walkshed_core`] and writes the resulting relation back to CSV.

pub mod config;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod progress;

pub use config::{AppConfig, InputConfig, OutputConfig, load_config};
pub use pipeline::{RunSummary, inspect_graph, run};
pub use progress::OriginProgress;
