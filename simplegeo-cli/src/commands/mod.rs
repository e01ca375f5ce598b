//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (init, path, show)
//! - [`context`] - Context lookup by point, IP or address
//! - [`places`] - Places search and feature lookup
//! - [`storage`] - Record and layer management

pub mod common;
pub mod config;
pub mod context;
pub mod places;
pub mod storage;
