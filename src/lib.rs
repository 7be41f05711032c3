//! FactLens command line and relay server.
//!
//! Exposes modules for integration testing

pub mod app_context;
pub mod cli;
pub mod config;
pub mod server;

pub use config::Config;
