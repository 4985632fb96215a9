//! Binary codec for the stockdata formats.
//!
//! This crate handles:
//! - Decoding ticks, bars and augmented bars from memory or files
//! - Record count derivation and header validation
//! - Encoding aggregates back into the same layouts

pub mod decode;
pub mod encode;

pub use decode::{
    decode_augmented_bars, decode_bars, decode_ticks, read_augmented_bars, read_bars, read_ticks,
    try_decode_augmented_bars, try_decode_bars, try_decode_ticks, try_read_augmented_bars,
    try_read_bars, try_read_ticks, Decoder,
};
pub use encode::{
    encode_augmented_bars, encode_bars, encode_ticks, write_augmented_bars, write_bars,
    write_ticks,
};
