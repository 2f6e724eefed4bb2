//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and 2D helpers
//! - Frame timing
//! - Logging and fatal-fault reporting

pub mod math;
pub mod time;
pub mod logging;
