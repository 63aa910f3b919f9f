/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Decoding WebP lossless (VP8L) bitstreams
//!
//! [Format Specification](https://developers.google.com/speed/webp/docs/webp_lossless_bitstream_specification)
//!
//! The decoder takes the payload of a `VP8L` chunk, the RIFF container
//! is not parsed here.
//!
//! # Features
//! - Decoding of all four transforms, color cache and entropy images
//! - Safe, no `unsafe` code
//! - `no_std`
//! - Fuzz tested
//!
//! ## `no_std`
//! You can use `no_std` with alloc feature to compile for `no_std` endpoints
//!
//! # Example
//! ```no_run
//! use zune_vp8l::Vp8lDecoder;
//!
//! let data = std::fs::read("image.vp8l").unwrap();
//! let mut decoder = Vp8lDecoder::new(&data);
//! let pixels = decoder.decode().unwrap();
//! let (width, height) = decoder.dimensions().unwrap();
//!
//! assert_eq!(pixels.len(), width * height * 4);
//! ```
//!
//! # Logging
//! With the default `log` feature, messages go through the [`log`] crate
//! by way of `zune_core::log`. Header fields and the transforms found are
//! reported at `trace` level, unread trailing bytes at `warn` level.
//!
//! [`log`]: https://docs.rs/log

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
extern crate alloc;
extern crate core;

pub use bitstream::BitStreamReader;
pub use code_lengths::{read_code_lengths, read_huffman_table};
pub use color_cache::ColorCache;
pub use decoder::*;
pub use errors::*;
pub use headers::Vp8lHeader;
pub use huffman::HuffmanTable;
pub use lz77::{copy_backward, decode_prefix_value, plane_code_to_distance};
pub use predictor::{apply_forward, apply_inverse, predict, PredictorMode};
pub use transform::{
    apply_chain, apply_palette, create_palette, invert_chain, reconstruct_chain,
    subtract_green_forward, subtract_green_inverse, ColorTransformElement, Transform,
    TransformType
};
pub use zune_core;

mod bitstream;
mod code_lengths;
mod color_cache;
mod constants;
mod decoder;
mod entropy;
mod errors;
mod headers;
mod huffman;
mod lz77;
mod predictor;
mod transform;
mod utils;

#[cfg(test)]
mod test_utils;
