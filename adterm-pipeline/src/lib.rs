//! Recommendation pipeline, report loaders, configuration and export for
//! search-term optimization.

pub mod candidate_pipeline;
pub mod components;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod hydrator;
pub mod pipelines;
pub mod query_hydrator;
pub mod scorer;
pub mod search_term_loader;
pub mod selector;
pub mod side_effect;
pub mod source;
pub mod traffic_loader;
pub mod types;
pub mod util;

pub use error::{AdTermError, Result};
