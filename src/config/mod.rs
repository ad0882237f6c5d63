//! # climdex Configuration Module
//!
//! This module centralizes all configuration constants for climdex. Constants
//! are grouped by their functional area and their interdependencies are
//! documented in one place.
//!
//! ## Why Centralization?
//!
//! The key tolerance used by `search` must match the tolerance used by
//! `level_of` and by the locate step of `remove`, or a record found by one
//! operation becomes invisible to another. Co-locating the constants makes
//! that coupling explicit.
//!
//! ## Module Organization
//!
//! - [`constants`]: All numeric and textual configuration values

pub mod constants;
pub use constants::*;
