//! # Tinted CLI
//!
//! Command-line front end for the theme loader.
//!
//! ## Modules
//!
//! - [`commands`] - Argument definitions and command execution
//! - [`config`] - `config.toml` and environment loading
//! - [`logger`] - fern-based logger setup
//! - [`output`] - Text and JSON rendering of results

pub mod commands;
pub mod config;
pub mod logger;
pub mod output;
