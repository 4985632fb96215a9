//! Fixed-size windows of records around an anchor date.
//!
//! A window always has the requested length. Positions before the start or
//! past the end of the series are filled with a missing marker: `None` for
//! reference windows, the zeroed default record for copied windows.
//! Counts above [`MAX_WINDOW_COUNT`] are clamped to it.

use stockdata_core::{AugmentedBar, AugmentedBars, Bar, Bars, Timed};
use tracing::warn;

/// Largest `count` a window honours.
pub const MAX_WINDOW_COUNT: usize = 1 << 20;

/// Which side of the anchor the window extends to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `[anchor, anchor + count]`.
    Forward,
    /// `[anchor - count + 1, anchor]`.
    Backward,
}

/// Index of the first record whose time equals `anchor`.
pub fn anchor_index<T: Timed>(series: &[T], anchor: u64) -> Option<usize> {
    series.iter().position(|r| r.time() == anchor)
}

/// Inclusive index bounds of the window. May extend past either end.
///
/// A backward window of zero still holds the anchor.
fn bounds(index: usize, count: usize, direction: Direction) -> (i64, i64) {
    if count > MAX_WINDOW_COUNT {
        warn!(count, max = MAX_WINDOW_COUNT, "window count clamped");
    }
    let index = i64::try_from(index).unwrap_or(i64::MAX);
    // Clamped count always fits.
    let count = count.min(MAX_WINDOW_COUNT) as i64;
    match direction {
        Direction::Forward => (index, index.saturating_add(count)),
        Direction::Backward => (index - count.max(1) + 1, index),
    }
}

/// Slots of the window around `anchor`, in ascending index order.
fn slots<T: Timed>(
    series: &[T],
    anchor: u64,
    count: usize,
    direction: Direction,
) -> Option<impl Iterator<Item = Option<&T>>> {
    let index = anchor_index(series, anchor)?;
    let (start, end) = bounds(index, count, direction);
    Some((start..=end).map(move |i| usize::try_from(i).ok().and_then(|i| series.get(i))))
}

/// Window of references into `series`; `None` marks a missing slot.
///
/// Returns `None` only when `anchor` is not in the series. The series must
/// be sorted by time ascending for the result to be in date order.
pub fn window_refs<T: Timed>(
    series: &[T],
    anchor: u64,
    count: usize,
    direction: Direction,
) -> Option<Vec<Option<&T>>> {
    Some(slots(series, anchor, count, direction)?.collect())
}

/// Window of copies; missing slots hold `T::default()`.
pub fn window_copied<T: Timed + Copy + Default>(
    series: &[T],
    anchor: u64,
    count: usize,
    direction: Direction,
) -> Option<Vec<T>> {
    let window = slots(series, anchor, count, direction)?
        .map(|slot| slot.copied().unwrap_or_default())
        .collect();
    Some(window)
}

/// Windowed lookups on an owning series.
pub trait WindowedSeries {
    type Record: Timed + Copy + Default;

    fn records(&self) -> &[Self::Record];

    fn window_refs(
        &self,
        anchor: u64,
        count: usize,
        direction: Direction,
    ) -> Option<Vec<Option<&Self::Record>>> {
        window_refs(self.records(), anchor, count, direction)
    }

    fn window_copied(
        &self,
        anchor: u64,
        count: usize,
        direction: Direction,
    ) -> Option<Vec<Self::Record>> {
        window_copied(self.records(), anchor, count, direction)
    }
}

impl WindowedSeries for Bars {
    type Record = Bar;

    fn records(&self) -> &[Bar] {
        &self.data
    }
}

impl WindowedSeries for AugmentedBars {
    type Record = AugmentedBar;

    fn records(&self) -> &[AugmentedBar] {
        &self.data
    }
}
