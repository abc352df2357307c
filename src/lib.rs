pub mod config;
pub mod constants;
pub mod error;
pub mod filter;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod report;
pub mod types;

// Application use case and the ports it depends on
pub mod app;
// Adapters for the remote monitoring server
pub mod infra;
