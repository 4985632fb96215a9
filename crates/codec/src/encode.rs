//! Encoding of aggregates into the packed binary formats read by
//! [`crate::decode`].

use std::path::Path;

use stockdata_core::layout::{BARS_SYMBOL_SIZE, TICKS_HEADER_SIZE, TICK_SIZE};
use stockdata_core::{AugmentedBars, AugmentedFormat, Bars, BarsLayout, Result, Ticks};
use tracing::warn;

/// Append `symbol` NUL padded (or truncated) to `width` bytes.
fn put_symbol(out: &mut Vec<u8>, symbol: &str, width: usize) {
    let bytes = symbol.as_bytes();
    if bytes.len() > width {
        warn!(symbol, width, "symbol truncated to header width");
    }
    let n = bytes.len().min(width);
    out.extend_from_slice(&bytes[..n]);
    out.resize(out.len() + width - n, 0);
}

/// Encode ticks. The declared count written is the actual number of ticks.
pub fn encode_ticks(ticks: &Ticks) -> Vec<u8> {
    let mut out = Vec::with_capacity(TICKS_HEADER_SIZE + ticks.len() * TICK_SIZE);
    out.extend_from_slice(&ticks.symbol);
    out.extend_from_slice(&ticks.date.to_ne_bytes());
    out.extend_from_slice(&ticks.data.len().to_ne_bytes());
    out.extend_from_slice(bytemuck::cast_slice(&ticks.data));
    out
}

/// Encode bars, zero-filling the trailer `layout` calls for.
pub fn encode_bars(bars: &Bars, layout: BarsLayout) -> Vec<u8> {
    let payload: &[u8] = bytemuck::cast_slice(&bars.data);
    let mut out = Vec::with_capacity(layout.overhead() + payload.len());
    put_symbol(&mut out, &bars.symbol, BARS_SYMBOL_SIZE);
    out.extend_from_slice(&bars.frequency.tag().to_ne_bytes());
    out.extend_from_slice(payload);
    out.resize(out.len() + layout.trailer_bytes, 0);
    out
}

/// Encode augmented bars with the given header generation.
pub fn encode_augmented_bars(bars: &AugmentedBars, format: AugmentedFormat) -> Vec<u8> {
    let payload: &[u8] = bytemuck::cast_slice(&bars.data);
    let mut out = Vec::with_capacity(format.header_size() + payload.len());
    put_symbol(&mut out, &bars.symbol, format.symbol_size());
    out.extend_from_slice(&bars.frequency.tag().to_ne_bytes());
    out.extend_from_slice(&bars.average_distance.to_ne_bytes());
    out.extend_from_slice(payload);
    out
}

pub fn write_ticks(path: impl AsRef<Path>, ticks: &Ticks) -> Result<()> {
    std::fs::write(path, encode_ticks(ticks))?;
    Ok(())
}

pub fn write_bars(path: impl AsRef<Path>, bars: &Bars, layout: BarsLayout) -> Result<()> {
    std::fs::write(path, encode_bars(bars, layout))?;
    Ok(())
}

pub fn write_augmented_bars(
    path: impl AsRef<Path>,
    bars: &AugmentedBars,
    format: AugmentedFormat,
) -> Result<()> {
    std::fs::write(path, encode_augmented_bars(bars, format))?;
    Ok(())
}
