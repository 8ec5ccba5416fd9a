//! Tourmap library
//!
//! Exposes the directory's modules to the binary and to integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod events;
pub mod logging;
pub mod pipeline;
pub mod saved;
pub mod store;
pub mod ui;
