//! Binary layout constants for the tick, bar and augmented bar formats.
//!
//! Headers are written field by field with no alignment padding; record
//! payloads follow immediately. Byte order is the host's.

use std::mem::size_of;

use serde::{Deserialize, Serialize};

use crate::types::{AugmentedBar, Bar, Tick};

/// Symbol field width in a ticks header (6 characters + terminator + padding).
pub const TICKS_SYMBOL_SIZE: usize = 8;
/// Symbol field width in a bars header.
pub const BARS_SYMBOL_SIZE: usize = 6;
/// Symbol field width of the narrow augmented header generation.
pub const AUGMENTED_NARROW_SYMBOL_SIZE: usize = 6;
/// Symbol field width of the wide augmented header generation.
pub const AUGMENTED_WIDE_SYMBOL_SIZE: usize = 12;

/// Width of the frequency tag field.
pub const FREQUENCY_SIZE: usize = size_of::<i32>();

/// Ticks header: symbol, date (u64), declared count (native word).
pub const TICKS_HEADER_SIZE: usize = TICKS_SYMBOL_SIZE + size_of::<u64>() + size_of::<usize>();
/// Bars header: symbol, frequency tag. No count field.
pub const BARS_HEADER_SIZE: usize = BARS_SYMBOL_SIZE + FREQUENCY_SIZE;

pub const TICK_SIZE: usize = size_of::<Tick>();
pub const BAR_SIZE: usize = size_of::<Bar>();
pub const AUGMENTED_BAR_SIZE: usize = size_of::<AugmentedBar>();

/// Trailer carried by minute bar files in the wild.
pub const MINUTE_BARS_TRAILER_SIZE: usize = size_of::<u16>();

/// Header generation of an augmented bars file.
///
/// The two generations differ only in symbol width and cannot be told apart
/// from content; the caller picks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AugmentedFormat {
    /// 6-byte symbol.
    Narrow,
    /// 12-byte symbol.
    #[default]
    Wide,
}

impl AugmentedFormat {
    pub fn symbol_size(self) -> usize {
        match self {
            AugmentedFormat::Narrow => AUGMENTED_NARROW_SYMBOL_SIZE,
            AugmentedFormat::Wide => AUGMENTED_WIDE_SYMBOL_SIZE,
        }
    }

    /// Symbol, frequency tag and series-level average distance.
    pub fn header_size(self) -> usize {
        self.symbol_size() + FREQUENCY_SIZE + size_of::<f64>()
    }
}

/// Number of whole records after the header.
///
/// Returns `None` when the buffer cannot even hold the header. Trailing
/// bytes that do not fill a record are ignored.
#[inline]
pub fn record_count(total_bytes: usize, header_bytes: usize, record_size: usize) -> Option<usize> {
    total_bytes
        .checked_sub(header_bytes)
        .map(|data_bytes| data_bytes / record_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_sizes() {
        assert_eq!(TICKS_HEADER_SIZE, 16 + size_of::<usize>());
        assert_eq!(BARS_HEADER_SIZE, 10);
        assert_eq!(AugmentedFormat::Narrow.header_size(), 18);
        assert_eq!(AugmentedFormat::Wide.header_size(), 24);
    }

    #[test]
    fn test_record_count_floors() {
        assert_eq!(record_count(10 + 3 * BAR_SIZE, 10, BAR_SIZE), Some(3));
        assert_eq!(record_count(10 + 3 * BAR_SIZE + 55, 10, BAR_SIZE), Some(3));
        assert_eq!(record_count(10, 10, BAR_SIZE), Some(0));
    }

    #[test]
    fn test_record_count_rejects_short_buffer() {
        assert_eq!(record_count(9, 10, BAR_SIZE), None);
        assert_eq!(record_count(0, TICKS_HEADER_SIZE, TICK_SIZE), None);
    }
}
