//! Pruner configuration module
//!
//! Bundles the schedule, initial mask fill and ranking key, with YAML/JSON
//! loading.

mod pruner_config;


pub use pruner_config::PrunerConfig;
