//! Common utilities module
//!
//! This module contains shared utilities used across the fusion pipeline.

pub mod error;

pub use error::{FusionError, Result};
