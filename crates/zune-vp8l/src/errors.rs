/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during decoding.
use alloc::string::String;
use core::fmt::{Debug, Display, Formatter};

use crate::transform::TransformType;

/// Possible errors that may occur during decoding of a VP8L stream
///
/// Every error is terminal, the decoder does not attempt to recover
/// and no partial image is returned.
pub enum Vp8lDecodeErrors {
    /// The first byte of the stream is not the VP8L signature `0x2F`
    InvalidSignature(u8),
    /// The header carries a version other than `0`
    UnsupportedVersion(u8),
    /// The header encodes a zero width or height
    ZeroDimensions,
    /// Image dimensions are above the configured limit
    ///
    /// # Arguments
    /// - 1st argument: the dimension, `width` or `height`
    /// - 2nd argument: the limit
    /// - 3rd argument: the value found in the stream
    TooLargeDimensions(&'static str, usize, usize),
    /// Fewer bytes than the 5 byte header
    TruncatedHeader(usize),
    /// Output buffer passed to `decode_into` is too small
    ///
    /// # Arguments
    /// - 1st argument is the size we expected
    /// - 2nd argument is the size found
    TooSmallOutput(usize, usize),

    /// A code length above the maximum of 15
    ///
    /// # Arguments
    /// - 1st argument is the symbol
    /// - 2nd argument is the offending length
    CodeLengthTooLarge(usize, u8),
    /// All code lengths are zero
    EmptyAlphabet,
    /// Code lengths describe more codes than can exist
    OverSubscribedTree,
    /// Code lengths leave parts of the code space unused
    UnderSubscribedTree,
    /// No symbol matched after reading the maximum code length
    InvalidHuffmanCode {
        /// Bits read, first bit in the lowest position
        bits:   u32,
        /// Number of bits read
        length: u8
    },
    /// More than 19 code length code lengths
    OversizedMetaAlphabet(usize),
    /// More directly stored code lengths than the alphabet has symbols
    ///
    /// # Arguments
    /// - 1st argument is the number of lengths stored
    /// - 2nd argument is the alphabet size
    TooManyCodeLengths(usize, usize),
    /// A code length symbol outside `0..=18`
    InvalidMetaSymbol(u16),
    /// A repeat code writes past the end of the alphabet
    ///
    /// # Arguments
    /// - 1st argument is the position the run ends at
    /// - 2nd argument is the alphabet size
    CodeLengthRunOverflow(usize, usize),

    /// Bit count requested is zero or above 16
    InvalidBitCount(u8),
    /// Tried reading more bits than the stream has
    ExhaustedData {
        /// Number of bits requested
        requested: u8,
        /// Position in bits where the read started
        position:  usize
    },

    /// Backward reference distance is zero or above the limit
    ///
    /// # Arguments
    /// - 1st argument is the distance
    /// - 2nd argument is the limit
    InvalidDistance(usize, usize),
    /// Backward reference reaches before the first pixel
    ///
    /// # Arguments
    /// - 1st argument is the distance
    /// - 2nd argument is the current position
    DistanceBeyondHistory(usize, usize),
    /// Backward reference writes past the end of the image
    CopyOutOfBounds {
        /// Pixel position of the copy
        position: usize,
        /// Number of pixels to copy
        length:   usize,
        /// Number of pixels in the image
        size:     usize
    },

    /// Color cache index outside of the cache
    ///
    /// # Arguments
    /// - 1st argument is the index
    /// - 2nd argument is the cache size, zero when there is no cache
    ColorCacheIndexOutOfRange(usize, usize),
    /// Color cache bits above 11
    InvalidColorCacheBits(u8),

    /// A transform's sub-image does not cover its block grid
    ///
    /// # Arguments
    /// - 1st argument is the transform name
    /// - 2nd argument is the number of entries needed
    /// - 3rd argument is the number of entries present
    MissingTransformData(&'static str, usize, usize),
    /// A palette index larger than the palette
    ///
    /// # Arguments
    /// - 1st argument is the index
    /// - 2nd argument is the palette size
    PaletteIndexOutOfRange(usize, usize),
    /// More unique colors than a palette may hold
    ///
    /// # Arguments
    /// - 1st argument is the number of unique colors seen so far
    /// - 2nd argument is the maximum
    TooManyColors(usize, usize),
    /// A palette transform was found while inverting a transform chain
    PaletteNotInvertible,
    /// A pixel buffer whose length is not `width * height`
    ///
    /// # Arguments
    /// - 1st argument is the number of pixels expected
    /// - 2nd argument is the buffer length found
    PixelCountMismatch(usize, usize),
    /// The same transform type appears twice in a stream
    DuplicateTransform(TransformType),
    /// Predictor mode above 13
    InvalidPredictorMode(u8),

    /// Generic message
    Generic(String),
    /// Generic message that does not need heap allocation
    GenericStatic(&'static str)
}

impl Debug for Vp8lDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidSignature(sig) => {
                writeln!(
                    f,
                    "Invalid VP8L signature {sig:#04X}, expected 0x2F as stream start"
                )
            }
            Self::UnsupportedVersion(version) => {
                writeln!(f, "Unsupported VP8L version {version}, only 0 is known")
            }
            Self::ZeroDimensions => writeln!(f, "Image has a zero width or height"),
            Self::TooLargeDimensions(dimension, limit, found) => {
                writeln!(
                    f,
                    "Too large image {dimension} {found}, decoder limit is {limit}"
                )
            }
            Self::TruncatedHeader(found) => {
                writeln!(f, "Truncated header, expected 5 bytes but found {found}")
            }
            Self::TooSmallOutput(expected, found) => {
                writeln!(
                    f,
                    "Too small output size, expected {expected}, but found {found}"
                )
            }
            Self::CodeLengthTooLarge(symbol, length) => {
                writeln!(
                    f,
                    "Code length {length} for symbol {symbol} is larger than the maximum of 15"
                )
            }
            Self::EmptyAlphabet => writeln!(f, "Huffman code has no symbols"),
            Self::OverSubscribedTree => writeln!(f, "Over-subscribed huffman code lengths"),
            Self::UnderSubscribedTree => writeln!(f, "Under-subscribed huffman code lengths"),
            Self::InvalidHuffmanCode { bits, length } => {
                writeln!(
                    f,
                    "Invalid huffman code {bits:#b} after reading {length} bits"
                )
            }
            Self::OversizedMetaAlphabet(count) => {
                writeln!(
                    f,
                    "Too many code length code lengths {count}, at most 19 are allowed"
                )
            }
            Self::TooManyCodeLengths(count, alphabet) => {
                writeln!(
                    f,
                    "{count} code lengths stored for an alphabet of {alphabet} symbols"
                )
            }
            Self::InvalidMetaSymbol(symbol) => {
                writeln!(f, "Invalid code length symbol {symbol}, expected 0..=18")
            }
            Self::CodeLengthRunOverflow(end, alphabet) => {
                writeln!(
                    f,
                    "Code length run ends at {end}, past the alphabet size {alphabet}"
                )
            }
            Self::InvalidBitCount(count) => {
                writeln!(f, "Cannot read {count} bits, expected between 1 and 16")
            }
            Self::ExhaustedData {
                requested,
                position
            } => {
                writeln!(
                    f,
                    "No more data, tried reading {requested} bits at bit position {position}"
                )
            }
            Self::InvalidDistance(distance, limit) => {
                writeln!(
                    f,
                    "Invalid backward reference distance {distance}, allowed range is 1..={limit}"
                )
            }
            Self::DistanceBeyondHistory(distance, position) => {
                writeln!(
                    f,
                    "Backward reference distance {distance} at position {position} reaches before the image start"
                )
            }
            Self::CopyOutOfBounds {
                position,
                length,
                size
            } => {
                writeln!(
                    f,
                    "Backward reference of {length} pixels at {position} overruns image of {size} pixels"
                )
            }
            Self::ColorCacheIndexOutOfRange(index, size) => {
                writeln!(
                    f,
                    "Color cache index {index} out of range for a cache of {size} entries"
                )
            }
            Self::InvalidColorCacheBits(bits) => {
                writeln!(f, "Invalid color cache bits {bits}, expected 0..=11")
            }
            Self::MissingTransformData(name, expected, found) => {
                writeln!(
                    f,
                    "{name} transform needs {expected} entries but only {found} are present"
                )
            }
            Self::PaletteIndexOutOfRange(index, size) => {
                writeln!(
                    f,
                    "Palette index {index} out of range for a palette of {size} colors"
                )
            }
            Self::TooManyColors(found, max) => {
                writeln!(f, "Too many unique colors {found}, palette can hold {max}")
            }
            Self::PaletteNotInvertible => {
                writeln!(f, "Palette transform cannot be inverted, indices are lost")
            }
            Self::PixelCountMismatch(expected, found) => {
                writeln!(
                    f,
                    "Pixel buffer holds {found} pixels, but the image has {expected}"
                )
            }
            Self::DuplicateTransform(transform) => {
                writeln!(f, "Duplicate {transform:?} transform")
            }
            Self::InvalidPredictorMode(mode) => {
                writeln!(f, "Invalid predictor mode {mode}, expected 0..=13")
            }
            Self::Generic(val) => writeln!(f, "{val}"),
            Self::GenericStatic(val) => writeln!(f, "{val}")
        }
    }
}

impl Display for Vp8lDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

impl From<&'static str> for Vp8lDecodeErrors {
    fn from(r: &'static str) -> Self {
        Self::GenericStatic(r)
    }
}

impl From<String> for Vp8lDecodeErrors {
    fn from(r: String) -> Self {
        Self::Generic(r)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Vp8lDecodeErrors {}
