//! Core types and layout definitions for the stockdata codec.
//!
//! This crate provides shared types used across all other crates:
//! - Fixed-layout records (ticks, bars, augmented bars)
//! - Binary header and record size constants
//! - Owning series aggregates
//! - Configuration and common error types

pub mod config;
pub mod error;
pub mod layout;
pub mod series;
pub mod types;

pub use config::{BarsLayout, CodecConfig};
pub use error::{Error, Result};
pub use layout::AugmentedFormat;
pub use series::{AugmentedBars, Bars, Ticks, UNDEFINED_SYMBOL};
pub use types::*;
