//! Shared utilities for the briefing bot workspace
//!
//! This crate provides common functionality used across the workspace,
//! including logging setup and environment-driven configuration helpers.

pub mod config;
pub mod logging;

pub use config::{env_flag, env_parse, env_var, load_dotenv};
pub use logging::{init_tracing, init_tracing_with};
