//! Core record types for the stockdata codec.
//!
//! The record structs are `#[repr(C)]` plain-old-data: their in-memory
//! layout is the on-disk layout, so the codec copies them verbatim.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of levels in the tick order book snapshot.
pub const BOOK_DEPTH: usize = 5;

/// Records keyed by a `time` value (date or time of day).
pub trait Timed {
    /// Key used by windowed lookups.
    fn time(&self) -> u64;
}

/// Parse a `YYYYMMDD` key into a calendar date.
pub fn date_from_key(key: u64) -> Option<NaiveDate> {
    let year = i32::try_from(key / 10_000).ok()?;
    let month = ((key / 100) % 100) as u32;
    let day = (key % 100) as u32;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Bar granularity tag. Discriminants are seconds per bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i32)]
pub enum DataFrequency {
    #[default]
    Undefined = 0,
    Tick = 3,
    Bar1m = 60,
    /// Trading day of 4 hours.
    Bar1d = 14400,
}

impl DataFrequency {
    /// Raw tag as stored in file headers.
    #[inline]
    pub fn tag(self) -> i32 {
        self as i32
    }

    /// Seconds covered by one record of this frequency.
    #[inline]
    pub fn seconds(self) -> u32 {
        self as u32
    }
}

impl TryFrom<i32> for DataFrequency {
    type Error = Error;

    fn try_from(tag: i32) -> Result<Self> {
        match tag {
            0 => Ok(DataFrequency::Undefined),
            3 => Ok(DataFrequency::Tick),
            60 => Ok(DataFrequency::Bar1m),
            14400 => Ok(DataFrequency::Bar1d),
            other => Err(Error::UnknownFrequency(other)),
        }
    }
}

/// A point-in-time trade snapshot with a five-level book.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Tick {
    /// Time of day, e.g. 103003.
    pub time: u64,
    pub price: f64,
    pub transaction_count: f64,
    pub tick_volume: f64,
    pub tick_amount: f64,
    /// Day-cumulative volume.
    pub day_volume: f64,
    /// Day-cumulative amount.
    pub day_amount: f64,
    pub ask_volumes: [f64; BOOK_DEPTH],
    pub ask_prices: [f64; BOOK_DEPTH],
    pub bid_volumes: [f64; BOOK_DEPTH],
    pub bid_prices: [f64; BOOK_DEPTH],
}

impl Tick {
    /// Best ask/bid mid price, or `None` if either side is empty.
    pub fn mid(&self) -> Option<f64> {
        let (ask, bid) = (self.ask_prices[0], self.bid_prices[0]);
        if ask > 0.0 && bid > 0.0 {
            Some((ask + bid) / 2.0)
        } else {
            None
        }
    }
}

impl Timed for Tick {
    #[inline]
    fn time(&self) -> u64 {
        self.time
    }
}

/// OHLCV bar keyed by date (daily) or time of day (minute).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Bar {
    pub time: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub amount: f64,
}

impl Bar {
    /// Volume-weighted average price, 0.0 for an empty bar.
    #[inline]
    pub fn average(&self) -> f64 {
        if self.volume != 0.0 {
            self.amount / self.volume
        } else {
            0.0
        }
    }
}

impl Timed for Bar {
    #[inline]
    fn time(&self) -> u64 {
        self.time
    }
}

impl fmt::Display for Bar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {:.2} | {:.2} | {:.2} | {:.2} | {} | {}",
            self.time,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume.round() as i64,
            self.amount.round() as i64
        )
    }
}

/// Bar extended with normalized and distance-derived fields.
///
/// Field order is part of the file format: each raw value is followed by
/// its normalized counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct AugmentedBar {
    pub time: u64,
    pub open: f64,
    pub open_normalized: f64,
    pub high: f64,
    pub high_normalized: f64,
    pub low: f64,
    pub low_normalized: f64,
    pub close: f64,
    pub close_normalized: f64,
    /// amount / volume.
    pub average: f64,
    pub average_normalized: f64,
    pub volume: f64,
    pub volume_normalized: f64,
    pub amount: f64,
    pub amount_normalized: f64,
    pub bar_distance: f64,
    /// 1 once distance fields are computed, 0 otherwise.
    pub has_distances: u64,
}

impl AugmentedBar {
    #[inline]
    pub fn has_distances(&self) -> bool {
        self.has_distances != 0
    }
}

impl From<&Bar> for AugmentedBar {
    fn from(bar: &Bar) -> Self {
        Self {
            time: bar.time,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            average: bar.average(),
            volume: bar.volume,
            amount: bar.amount,
            ..Self::default()
        }
    }
}

impl Timed for AugmentedBar {
    #[inline]
    fn time(&self) -> u64 {
        self.time
    }
}

impl fmt::Display for AugmentedBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] O: {:.2} | H: {:.2} | L: {:.2} | C: {:.2} | V: {} | A: {}",
            self.time,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume.round() as i64,
            self.amount.round() as i64
        )
    }
}

/// Kind of market event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    LimitUp,
    LimitDown,
}

/// A symbol-level market event such as hitting the daily price limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub symbol: String,
    pub event_type: EventType,
    /// YYYYMMDD.
    pub date: u32,
    /// Time of day, 0 when the event applies to the whole day.
    pub time: u32,
}

impl Event {
    pub fn new(symbol: impl Into<String>, event_type: EventType, date: u32) -> Self {
        Self {
            symbol: symbol.into(),
            event_type,
            date,
            time: 0,
        }
    }

    /// Attach a time of day.
    pub fn at(mut self, time: u32) -> Self {
        self.time = time;
        self
    }

    pub fn date(&self) -> Option<NaiveDate> {
        date_from_key(u64::from(self.date))
    }
}
