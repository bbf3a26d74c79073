//! # sx_app
//!
//! Configuration, logging and process plumbing for the top questions binary

pub mod cli;
pub mod config_loader;
pub mod runner;
pub mod shutdown_handler;
pub mod tracing_setup;
