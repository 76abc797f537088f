//! Configuration consumed by the data-access layer
//!
//! A single connection descriptor ([`DataConfig`]) supplied by the surrounding
//! application, either explicitly or via environment variables.

pub mod data_config;

pub use data_config::DataConfig;
