//! # ClipScout Common Library
//!
//! Shared code for the ClipScout services:
//! - Error type and result alias
//! - Configuration loading (TOML, environment, compiled defaults)
//! - Root folder resolution and initialization
//! - SQLite database initialization and schema

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
