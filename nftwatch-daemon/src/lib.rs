//! nftwatch daemon library.
//!
//! This library exposes internal modules for integration testing.
//! In production, `nftwatch` is used as a binary (main.rs).

pub mod app;
pub mod cli;
pub mod exposition;
pub mod logging;
pub mod server;
