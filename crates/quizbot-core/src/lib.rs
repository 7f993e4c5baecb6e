//! Core domain + application logic for the quiz bot backend.
//!
//! This crate is intentionally framework-agnostic. Telegram and the HTTP
//! server live in adapter crates; the pieces they share (configuration,
//! topic content, the welcome flow) live here behind plain types and ports.

pub mod config;
pub mod content;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod welcome;

pub use errors::{Error, Result};
