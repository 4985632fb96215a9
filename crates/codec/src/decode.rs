//! Decoding of tick, bar and augmented bar buffers.
//!
//! Record counts always come from the buffer length: `(len - header) /
//! record_size`, floored. The ticks header carries a declared count, which is
//! only compared against the computed one. Records are copied verbatim in
//! host byte order.
//!
//! Every operation has a strict `try_*` form returning [`Result`] and a soft
//! form that logs the failure and returns the aggregate's default state.

use std::mem::size_of;
use std::path::Path;

use bytemuck::Pod;
use stockdata_core::layout::{
    record_count, AUGMENTED_BAR_SIZE, BARS_HEADER_SIZE, BARS_SYMBOL_SIZE, BAR_SIZE,
    TICKS_HEADER_SIZE, TICKS_SYMBOL_SIZE, TICK_SIZE,
};
use stockdata_core::series::trim_symbol;
use stockdata_core::{
    AugmentedBars, AugmentedFormat, Bars, BarsLayout, CodecConfig, DataFrequency, Error, Result,
    Ticks,
};
use tracing::{debug, error, warn};

/// Sequential reader over a packed header.
struct HeaderReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> HeaderReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Take the next `n` bytes. Callers check the header fits beforehand.
    fn bytes(&mut self, n: usize) -> &'a [u8] {
        let buf = self.buf;
        let field = &buf[self.pos..self.pos + n];
        self.pos += n;
        field
    }

    fn read<T: Pod>(&mut self) -> T {
        bytemuck::pod_read_unaligned(self.bytes(size_of::<T>()))
    }

    fn frequency(&mut self) -> DataFrequency {
        let tag: i32 = self.read();
        DataFrequency::try_from(tag).unwrap_or_else(|err| {
            warn!(tag, %err, "unknown frequency tag, using Undefined");
            DataFrequency::Undefined
        })
    }

    fn remaining(&self) -> &'a [u8] {
        let buf = self.buf;
        &buf[self.pos..]
    }
}

/// Copy `count` whole records from the start of `payload`.
fn read_records<T: Pod>(payload: &[u8], count: usize) -> Vec<T> {
    payload
        .chunks_exact(size_of::<T>())
        .take(count)
        .map(bytemuck::pod_read_unaligned)
        .collect()
}

fn ensure_header(buf: &[u8], header: usize) -> Result<()> {
    if buf.len() < header {
        return Err(Error::buffer_too_small(header, buf.len()));
    }
    Ok(())
}

/// Decode a ticks buffer.
pub fn try_decode_ticks(buf: &[u8]) -> Result<Ticks> {
    ensure_header(buf, TICKS_HEADER_SIZE)?;
    let count = record_count(buf.len(), TICKS_HEADER_SIZE, TICK_SIZE).unwrap_or(0);

    let mut header = HeaderReader::new(buf);
    let mut symbol = [0u8; TICKS_SYMBOL_SIZE];
    symbol.copy_from_slice(header.bytes(TICKS_SYMBOL_SIZE));
    let date: u64 = header.read();
    let declared_count: usize = header.read();

    if declared_count != count {
        warn!(
            symbol = %trim_symbol(&symbol),
            declared = declared_count,
            computed = count,
            "tick count mismatch, using computed count"
        );
    }

    Ok(Ticks {
        symbol,
        date,
        declared_count,
        data: read_records(header.remaining(), count),
    })
}

/// Decode a bars buffer. `layout` says how many trailing bytes to discount.
pub fn try_decode_bars(buf: &[u8], layout: BarsLayout) -> Result<Bars> {
    ensure_header(buf, BARS_HEADER_SIZE)?;
    let count = (buf.len() - BARS_HEADER_SIZE).saturating_sub(layout.trailer_bytes) / BAR_SIZE;

    let mut header = HeaderReader::new(buf);
    let symbol = trim_symbol(header.bytes(BARS_SYMBOL_SIZE));
    let frequency = header.frequency();

    Ok(Bars {
        symbol,
        frequency,
        data: read_records(header.remaining(), count),
    })
}

/// Decode an augmented bars buffer written with the given header generation.
pub fn try_decode_augmented_bars(buf: &[u8], format: AugmentedFormat) -> Result<AugmentedBars> {
    let header_size = format.header_size();
    ensure_header(buf, header_size)?;
    let count = record_count(buf.len(), header_size, AUGMENTED_BAR_SIZE).unwrap_or(0);

    let mut header = HeaderReader::new(buf);
    let symbol = trim_symbol(header.bytes(format.symbol_size()));
    let frequency = header.frequency();
    let average_distance: f64 = header.read();

    Ok(AugmentedBars {
        symbol,
        frequency,
        average_distance,
        data: read_records(header.remaining(), count),
    })
}

/// Decode a ticks buffer, logging failures and returning empty ticks.
pub fn decode_ticks(buf: &[u8]) -> Ticks {
    try_decode_ticks(buf).unwrap_or_else(|err| {
        error!(%err, "failed to decode ticks");
        Ticks::default()
    })
}

/// Decode a bars buffer, logging failures and returning the undefined series.
pub fn decode_bars(buf: &[u8], layout: BarsLayout) -> Bars {
    try_decode_bars(buf, layout).unwrap_or_else(|err| {
        error!(%err, "failed to decode bars");
        Bars::default()
    })
}

/// Decode an augmented bars buffer, logging failures and returning the
/// undefined series.
pub fn decode_augmented_bars(buf: &[u8], format: AugmentedFormat) -> AugmentedBars {
    try_decode_augmented_bars(buf, format).unwrap_or_else(|err| {
        error!(%err, ?format, "failed to decode augmented bars");
        AugmentedBars::default()
    })
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let buf = std::fs::read(path)?;
    debug!(path = %path.display(), bytes = buf.len(), "read data file");
    Ok(buf)
}

pub fn try_read_ticks(path: impl AsRef<Path>) -> Result<Ticks> {
    try_decode_ticks(&read_file(path.as_ref())?)
}

pub fn try_read_bars(path: impl AsRef<Path>, layout: BarsLayout) -> Result<Bars> {
    try_decode_bars(&read_file(path.as_ref())?, layout)
}

pub fn try_read_augmented_bars(
    path: impl AsRef<Path>,
    format: AugmentedFormat,
) -> Result<AugmentedBars> {
    try_decode_augmented_bars(&read_file(path.as_ref())?, format)
}

/// Read a ticks file. Unreadable or short files yield empty ticks.
pub fn read_ticks(path: impl AsRef<Path>) -> Ticks {
    let path = path.as_ref();
    try_read_ticks(path).unwrap_or_else(|err| {
        error!(path = %path.display(), %err, "failed to read ticks");
        Ticks::default()
    })
}

/// Read a bars file. Unreadable or short files yield the undefined series.
pub fn read_bars(path: impl AsRef<Path>, layout: BarsLayout) -> Bars {
    let path = path.as_ref();
    try_read_bars(path, layout).unwrap_or_else(|err| {
        error!(path = %path.display(), %err, "failed to read bars");
        Bars::default()
    })
}

/// Read an augmented bars file. Unreadable or short files yield the
/// undefined series.
pub fn read_augmented_bars(path: impl AsRef<Path>, format: AugmentedFormat) -> AugmentedBars {
    let path = path.as_ref();
    try_read_augmented_bars(path, format).unwrap_or_else(|err| {
        error!(path = %path.display(), %err, "failed to read augmented bars");
        AugmentedBars::default()
    })
}

/// Decoder bound to a [`CodecConfig`].
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: CodecConfig,
}

impl Decoder {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn decode_ticks(&self, buf: &[u8]) -> Ticks {
        decode_ticks(buf)
    }

    pub fn decode_bars(&self, buf: &[u8]) -> Bars {
        decode_bars(buf, self.config.bars)
    }

    pub fn decode_augmented_bars(&self, buf: &[u8]) -> AugmentedBars {
        decode_augmented_bars(buf, self.config.augmented_format)
    }

    pub fn read_ticks(&self, path: impl AsRef<Path>) -> Ticks {
        read_ticks(path)
    }

    pub fn read_bars(&self, path: impl AsRef<Path>) -> Bars {
        read_bars(path, self.config.bars)
    }

    pub fn read_augmented_bars(&self, path: impl AsRef<Path>) -> AugmentedBars {
        read_augmented_bars(path, self.config.augmented_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use stockdata_core::{Bar, Tick};

    fn bars_header(symbol: &[u8; 6], tag: i32) -> Vec<u8> {
        let mut buf = symbol.to_vec();
        buf.extend_from_slice(&tag.to_ne_bytes());
        buf
    }

    fn make_bar(time: u64, close: f64) -> Bar {
        Bar {
            time,
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000.0,
            amount: close * 1000.0,
        }
    }

    #[test]
    fn test_decode_bars_header_and_records() {
        let mut buf = bars_header(b"600000", 14400);
        let bars = [make_bar(20240102, 10.0), make_bar(20240103, 10.5)];
        buf.extend_from_slice(bytemuck::cast_slice(&bars));

        let decoded = try_decode_bars(&buf, BarsLayout::default()).unwrap();
        assert_eq!(decoded.symbol, "600000");
        assert_eq!(decoded.frequency, DataFrequency::Bar1d);
        assert_eq!(decoded.data, bars.to_vec());
    }

    #[test]
    fn test_remainder_bytes_ignored() {
        let mut buf = bars_header(b"600000", 60);
        buf.extend_from_slice(bytemuck::bytes_of(&make_bar(930, 10.0)));
        buf.extend_from_slice(&[0xAB; BAR_SIZE - 1]);

        let decoded = try_decode_bars(&buf, BarsLayout::default()).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_relative_eq!(decoded.data[0].close, 10.0);
    }

    #[test]
    fn test_trailer_discounted_before_count() {
        let mut buf = bars_header(b"000001", 60);
        buf.extend_from_slice(bytemuck::bytes_of(&make_bar(930, 10.0)));
        buf.extend_from_slice(&[0u8; BAR_SIZE]);

        // Trailer shorter than a record still leaves the second record partial.
        let decoded = try_decode_bars(&buf, BarsLayout::minute()).unwrap();
        assert_eq!(decoded.len(), 1);
        let decoded = try_decode_bars(&buf, BarsLayout::default()).unwrap();
        assert_eq!(decoded.len(), 2);
    }

    #[test]
    fn test_short_buffer_rejected_in_every_format() {
        let short = [0u8; 4];
        assert!(matches!(
            try_decode_ticks(&short),
            Err(Error::BufferTooSmall { actual: 4, .. })
        ));
        assert!(matches!(
            try_decode_bars(&short, BarsLayout::default()),
            Err(Error::BufferTooSmall { needed: 10, actual: 4 })
        ));
        assert!(matches!(
            try_decode_augmented_bars(&short, AugmentedFormat::Narrow),
            Err(Error::BufferTooSmall { needed: 18, actual: 4 })
        ));
    }

    #[test]
    fn test_soft_decode_returns_defaults() {
        assert_eq!(decode_ticks(&[]), Ticks::default());
        assert_eq!(decode_bars(&[1, 2, 3], BarsLayout::default()), Bars::default());
        assert_eq!(
            decode_augmented_bars(&[0; 23], AugmentedFormat::Wide),
            AugmentedBars::default()
        );
    }

    #[test]
    fn test_unknown_frequency_decodes_as_undefined() {
        let buf = bars_header(b"600000", 42);
        let decoded = try_decode_bars(&buf, BarsLayout::default()).unwrap();
        assert_eq!(decoded.frequency, DataFrequency::Undefined);
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_ticks_declared_count_is_advisory() {
        let mut buf = b"600000\0\0".to_vec();
        buf.extend_from_slice(&20240102u64.to_ne_bytes());
        buf.extend_from_slice(&7usize.to_ne_bytes());
        let tick = Tick {
            time: 93000,
            price: 10.0,
            ..Tick::default()
        };
        buf.extend_from_slice(bytemuck::bytes_of(&tick));

        let ticks = try_decode_ticks(&buf).unwrap();
        assert_eq!(ticks.declared_count, 7);
        assert_eq!(ticks.len(), 1);
        assert!(!ticks.count_matches());
        assert_eq!(ticks.data[0], tick);
    }

    #[test]
    fn test_augmented_symbol_trimmed() {
        let mut buf = b"SH600000  \0\0".to_vec();
        buf.extend_from_slice(&14400i32.to_ne_bytes());
        buf.extend_from_slice(&0.5f64.to_ne_bytes());

        let decoded = try_decode_augmented_bars(&buf, AugmentedFormat::Wide).unwrap();
        assert_eq!(decoded.symbol, "SH600000");
        assert_eq!(decoded.frequency, DataFrequency::Bar1d);
    }

    #[test]
    fn test_decoder_uses_config() {
        let decoder = Decoder::new(CodecConfig {
            augmented_format: AugmentedFormat::Narrow,
            ..CodecConfig::default()
        });
        let mut buf = b"000001".to_vec();
        buf.extend_from_slice(&60i32.to_ne_bytes());
        buf.extend_from_slice(&1.25f64.to_ne_bytes());

        let decoded = decoder.decode_augmented_bars(&buf);
        assert_eq!(decoded.symbol, "000001");
        assert_eq!(decoded.frequency, DataFrequency::Bar1m);
        assert_relative_eq!(decoded.average_distance, 1.25);
        assert!(decoded.is_empty());
    }
}
