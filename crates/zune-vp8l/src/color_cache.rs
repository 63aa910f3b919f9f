/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A small hash table of recently seen colors
//!
//! Every pixel emitted by the entropy decoder is written into the cache,
//! the stream may then refer to a color by its slot instead of spelling
//! out all four channels again.
use alloc::vec;
use alloc::vec::Vec;

use crate::constants::{COLOR_CACHE_MULTIPLIER, MAX_COLOR_CACHE_BITS};
use crate::errors::Vp8lDecodeErrors;

#[derive(Clone, Debug)]
pub struct ColorCache {
    colors:    Vec<u32>,
    hash_bits: u8
}

impl ColorCache {
    /// Create a cache with `2^bits` slots, all initially zero
    pub fn new(bits: u8) -> Result<ColorCache, Vp8lDecodeErrors> {
        if bits > MAX_COLOR_CACHE_BITS {
            return Err(Vp8lDecodeErrors::InvalidColorCacheBits(bits));
        }
        Ok(ColorCache {
            colors:    vec![0; 1 << bits],
            hash_bits: bits
        })
    }

    /// Slot a pixel lands in
    #[inline(always)]
    pub const fn hash(&self, argb: u32) -> usize {
        if self.hash_bits == 0 {
            return 0;
        }
        (argb.wrapping_mul(COLOR_CACHE_MULTIPLIER) >> (32 - self.hash_bits)) as usize
    }

    /// Store a pixel, replacing whatever occupied its slot
    #[inline(always)]
    pub fn insert(&mut self, argb: u32) {
        let slot = self.hash(argb);
        self.colors[slot] = argb;
    }

    pub fn get(&self, index: usize) -> Result<u32, Vp8lDecodeErrors> {
        self.colors
            .get(index)
            .copied()
            .ok_or(Vp8lDecodeErrors::ColorCacheIndexOutOfRange(
                index,
                self.colors.len()
            ))
    }

    /// Number of slots
    pub fn size(&self) -> usize {
        self.colors.len()
    }
}
