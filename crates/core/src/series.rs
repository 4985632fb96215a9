//! Owning aggregates: a header plus an ordered sequence of records.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::layout::TICKS_SYMBOL_SIZE;
use crate::types::{date_from_key, AugmentedBar, Bar, DataFrequency, Tick};

/// Symbol used by cleared or never-loaded series.
pub const UNDEFINED_SYMBOL: &str = "UNDEFINED";

/// Trim NUL and space padding from a raw symbol field.
pub fn trim_symbol(raw: &[u8]) -> String {
    let end = raw
        .iter()
        .rposition(|&b| b != 0 && b != b' ')
        .map_or(0, |i| i + 1);
    String::from_utf8_lossy(&raw[..end]).into_owned()
}

/// One trading day of ticks for a symbol.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ticks {
    /// Raw symbol field, NUL padded.
    pub symbol: [u8; TICKS_SYMBOL_SIZE],
    /// YYYYMMDD.
    pub date: u64,
    /// Count stored in the header. Advisory only; `data.len()` is authoritative.
    pub declared_count: usize,
    pub data: Vec<Tick>,
}

impl Ticks {
    /// Symbol text without padding.
    pub fn symbol_str(&self) -> String {
        trim_symbol(&self.symbol)
    }

    pub fn trading_date(&self) -> Option<NaiveDate> {
        date_from_key(self.date)
    }

    /// Whether the header count agrees with the decoded records.
    pub fn count_matches(&self) -> bool {
        self.declared_count == self.data.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Bar series for one symbol at one frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bars {
    pub symbol: String,
    pub frequency: DataFrequency,
    /// Ascending by `time`; not enforced.
    pub data: Vec<Bar>,
}

impl Bars {
    pub fn new(symbol: impl Into<String>, frequency: DataFrequency, data: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            frequency,
            data,
        }
    }

    /// Reset to the undefined sentinel state.
    pub fn clear(&mut self) {
        self.symbol = UNDEFINED_SYMBOL.to_string();
        self.frequency = DataFrequency::Undefined;
        self.data.clear();
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.data.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.data.last()
    }

    pub fn times(&self) -> impl Iterator<Item = u64> + '_ {
        self.data.iter().map(|b| b.time)
    }
}

impl Default for Bars {
    fn default() -> Self {
        Self::new(UNDEFINED_SYMBOL, DataFrequency::Undefined, Vec::new())
    }
}

/// Augmented bar series with a series-level average distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentedBars {
    pub symbol: String,
    pub frequency: DataFrequency,
    pub average_distance: f64,
    pub data: Vec<AugmentedBar>,
}

impl AugmentedBars {
    /// Reset to the undefined sentinel state.
    pub fn clear(&mut self) {
        self.symbol = UNDEFINED_SYMBOL.to_string();
        self.frequency = DataFrequency::Undefined;
        self.average_distance = 0.0;
        self.data.clear();
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn first(&self) -> Option<&AugmentedBar> {
        self.data.first()
    }

    pub fn last(&self) -> Option<&AugmentedBar> {
        self.data.last()
    }

    pub fn times(&self) -> impl Iterator<Item = u64> + '_ {
        self.data.iter().map(|b| b.time)
    }
}

impl Default for AugmentedBars {
    fn default() -> Self {
        Self {
            symbol: UNDEFINED_SYMBOL.to_string(),
            frequency: DataFrequency::Undefined,
            average_distance: 0.0,
            data: Vec::new(),
        }
    }
}

impl From<&Bars> for AugmentedBars {
    /// Project raw bars; derived fields start zeroed.
    fn from(bars: &Bars) -> Self {
        Self {
            symbol: bars.symbol.clone(),
            frequency: bars.frequency,
            average_distance: 0.0,
            data: bars.data.iter().map(AugmentedBar::from).collect(),
        }
    }
}

impl fmt::Display for AugmentedBars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.average_distance, self.symbol)
    }
}
