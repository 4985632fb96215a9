//! Min-max normalization of augmented bars.
//!
//! Prices (open, high, low, close, average) share one range spanning the
//! lowest `low` to the highest `high`. Volume and amount each use their own
//! range. A zero-width range normalizes to exactly 0.0. NaN values take no
//! part in the ranges.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use stockdata_core::{AugmentedBar, AugmentedBars};
use tracing::debug;

/// Closed value range observed over a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    /// Range of the non-NaN `values`; zero-width when there are none.
    fn of(values: impl Iterator<Item = f64> + Clone) -> Self {
        Self::between(values.clone(), values)
    }

    /// Minimum of `lows` to maximum of `highs`, skipping NaN.
    fn between(lows: impl Iterator<Item = f64>, highs: impl Iterator<Item = f64>) -> Self {
        let min = lows.filter(|v| !v.is_nan()).map(OrderedFloat).min();
        let max = highs.filter(|v| !v.is_nan()).map(OrderedFloat).max();
        match (min, max) {
            (Some(min), Some(max)) => Self {
                min: min.into_inner(),
                max: max.into_inner(),
            },
            _ => Self { min: 0.0, max: 0.0 },
        }
    }

    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Position of `value` within the range.
    #[inline]
    pub fn scale(&self, value: f64) -> f64 {
        let span = self.span();
        if span == 0.0 {
            0.0
        } else {
            (value - self.min) / span
        }
    }
}

/// Ranges used by the last normalization pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationRanges {
    pub price: MinMax,
    pub volume: MinMax,
    pub amount: MinMax,
}

impl NormalizationRanges {
    /// Scan `bars` for price, volume and amount ranges.
    pub fn compute(bars: &[AugmentedBar]) -> Option<Self> {
        if bars.is_empty() {
            return None;
        }
        Some(Self {
            price: MinMax::between(bars.iter().map(|b| b.low), bars.iter().map(|b| b.high)),
            volume: MinMax::of(bars.iter().map(|b| b.volume)),
            amount: MinMax::of(bars.iter().map(|b| b.amount)),
        })
    }

    fn apply(&self, bar: &mut AugmentedBar) {
        bar.open_normalized = self.price.scale(bar.open);
        bar.high_normalized = self.price.scale(bar.high);
        bar.low_normalized = self.price.scale(bar.low);
        bar.close_normalized = self.price.scale(bar.close);
        bar.average_normalized = self.price.scale(bar.average);
        bar.volume_normalized = self.volume.scale(bar.volume);
        bar.amount_normalized = self.amount.scale(bar.amount);
    }
}

/// Rewrite every normalized field from the raw fields.
///
/// Returns the ranges used, or `None` for an empty slice (nothing changes).
pub fn normalize_bars(bars: &mut [AugmentedBar]) -> Option<NormalizationRanges> {
    let ranges = NormalizationRanges::compute(bars)?;
    for bar in bars.iter_mut() {
        ranges.apply(bar);
    }
    Some(ranges)
}

/// Normalize a series in place.
pub fn normalize(series: &mut AugmentedBars) -> Option<NormalizationRanges> {
    let ranges = normalize_bars(&mut series.data);
    if let Some(r) = &ranges {
        debug!(
            symbol = %series.symbol,
            bars = series.data.len(),
            price_min = r.price.min,
            price_max = r.price.max,
            "normalized series"
        );
    }
    ranges
}
