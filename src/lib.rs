pub mod analysis;
pub mod config;
pub mod criteria;
pub mod error;
pub mod fixtures;
pub mod ingestion;
pub mod optimizer;
pub mod output;
pub mod scoring;
pub mod server;
pub mod types;
pub mod workset;
