//! Series computations for the stockdata codec.
//!
//! This crate handles:
//! - Windowed lookups around an anchor date
//! - Min-max normalization of augmented bars

pub mod normalize;
pub mod window;

pub use normalize::{normalize, normalize_bars, MinMax, NormalizationRanges};
pub use window::{anchor_index, window_copied, window_refs, Direction, WindowedSeries};
