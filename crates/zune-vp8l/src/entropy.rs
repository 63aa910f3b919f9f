/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Entropy coded images
//!
//! The main image and every transform sub-image are stored the same way,
//! a color cache size, one or more groups of five huffman codes and
//! then the pixels, each of which is either
//!
//! - a literal, the green symbol is below 256 and red, blue and alpha follow,
//! - a backward reference, green symbols `256..280` are length prefixes,
//! - a color cache reference for green symbols `280..`.
//!
//! Only the main image may use more than one group, it then carries an
//! entropy sub-image selecting the group for every `2^bits` square block.
use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

use zune_core::log::{debug, trace};

use crate::bitstream::BitStreamReader;
use crate::code_lengths::read_huffman_table;
use crate::color_cache::ColorCache;
use crate::constants::{
    MAX_BACKWARD_DISTANCE, MAX_COLOR_CACHE_BITS, MAX_HUFFMAN_GROUPS, NUM_DISTANCE_CODES,
    NUM_LENGTH_CODES, NUM_LITERAL_CODES
};
use crate::errors::Vp8lDecodeErrors;
use crate::huffman::HuffmanTable;
use crate::lz77::{copy_backward, decode_prefix_value, plane_code_to_distance};
use crate::utils::subsample_size;

/// First green symbol that refers to the color cache
const COLOR_CACHE_SYMBOL_START: u16 = (NUM_LITERAL_CODES + NUM_LENGTH_CODES) as u16;

/// The five codes used to decode pixels of one region
#[derive(Clone, Debug)]
pub struct HuffmanGroup {
    /// Green literals, length prefixes and color cache indices
    green:    HuffmanTable,
    red:      HuffmanTable,
    blue:     HuffmanTable,
    /// Absent when the image has no alpha, literals are then opaque
    alpha:    Option<HuffmanTable>,
    distance: HuffmanTable
}

impl HuffmanGroup {
    /// Read a group whose green alphabet has room for `cache_size`
    /// color cache symbols
    pub fn read(
        stream: &mut BitStreamReader, cache_size: usize, with_alpha: bool
    ) -> Result<HuffmanGroup, Vp8lDecodeErrors> {
        let green = read_huffman_table(stream, NUM_LITERAL_CODES + NUM_LENGTH_CODES + cache_size)?;
        let red = read_huffman_table(stream, NUM_LITERAL_CODES)?;
        let blue = read_huffman_table(stream, NUM_LITERAL_CODES)?;
        let alpha = if with_alpha {
            Some(read_huffman_table(stream, NUM_LITERAL_CODES)?)
        } else {
            None
        };
        let distance = read_huffman_table(stream, NUM_DISTANCE_CODES)?;

        Ok(HuffmanGroup {
            green,
            red,
            blue,
            alpha,
            distance
        })
    }

    /// Decode the red, blue and alpha symbols following a green literal
    #[inline(always)]
    fn read_literal(
        &self, stream: &mut BitStreamReader, green: u16
    ) -> Result<u32, Vp8lDecodeErrors> {
        let red = u32::from(self.red.decode(stream)?);
        let blue = u32::from(self.blue.decode(stream)?);
        let alpha = match &self.alpha {
            Some(table) => u32::from(table.decode(stream)?),
            None => 0xff
        };

        Ok((alpha << 24) | (red << 16) | (u32::from(green) << 8) | blue)
    }
}

/// Picks the huffman group of each pixel from the entropy sub-image
struct GroupSelector {
    bits:        u8,
    block_width: usize,
    groups:      Vec<u16>
}

impl GroupSelector {
    #[inline(always)]
    fn group_at(&self, x: usize, y: usize) -> usize {
        usize::from(self.groups[(y >> self.bits) * self.block_width + (x >> self.bits)])
    }
}

/// Read the 4 bit color cache size, zero means no cache
fn read_color_cache(stream: &mut BitStreamReader) -> Result<Option<ColorCache>, Vp8lDecodeErrors> {
    let bits = stream.read_bits(4)? as u8;

    if bits == 0 {
        return Ok(None);
    }
    if bits > MAX_COLOR_CACHE_BITS {
        return Err(Vp8lDecodeErrors::InvalidColorCacheBits(bits));
    }
    let cache = ColorCache::new(bits)?;

    trace!("Color cache size: {}", cache.size());

    Ok(Some(cache))
}

/// Decode a transform or entropy sub-image
///
/// Sub-images always use a single group whose alpha code is present.
pub fn decode_sub_image(
    stream: &mut BitStreamReader, width: usize, height: usize
) -> Result<Vec<u32>, Vp8lDecodeErrors> {
    debug!("Decoding sub-image of {width}x{height}");

    let cache = read_color_cache(stream)?;
    let cache_size = cache.as_ref().map_or(0, ColorCache::size);

    let group = HuffmanGroup::read(stream, cache_size, true)?;

    let mut pixels = vec![0; width * height];

    decode_pixels(
        stream,
        &mut pixels,
        width,
        core::slice::from_ref(&group),
        None,
        cache,
        MAX_BACKWARD_DISTANCE
    )?;

    Ok(pixels)
}

/// Decode the main image
///
/// `has_alpha` comes from the header, without it groups carry no alpha code.
pub fn decode_main_image(
    stream: &mut BitStreamReader, width: usize, height: usize, has_alpha: bool
) -> Result<Vec<u32>, Vp8lDecodeErrors> {
    let cache = read_color_cache(stream)?;
    let cache_size = cache.as_ref().map_or(0, ColorCache::size);

    let (selector, num_groups) = if stream.read_bit()? {
        let bits = stream.read_bits(3)? as u8 + 2;
        let block_width = subsample_size(width, bits);
        let block_height = subsample_size(height, bits);

        trace!("Entropy image block size: {}", 1_usize << bits);

        let entropy_image = decode_sub_image(stream, block_width, block_height)?;

        let groups: Vec<u16> = entropy_image
            .iter()
            .map(|pixel| ((pixel >> 8) & 0xffff) as u16)
            .collect();

        let num_groups = groups.iter().max().map_or(1, |max| usize::from(*max) + 1);

        if num_groups > MAX_HUFFMAN_GROUPS {
            return Err(Vp8lDecodeErrors::Generic(format!(
                "Too many huffman groups {num_groups}, limit is {MAX_HUFFMAN_GROUPS}"
            )));
        }
        let selector = GroupSelector {
            bits,
            block_width,
            groups
        };
        (Some(selector), num_groups)
    } else {
        (None, 1)
    };

    trace!("Huffman groups: {num_groups}");

    let groups = (0..num_groups)
        .map(|_| HuffmanGroup::read(stream, cache_size, has_alpha))
        .collect::<Result<Vec<_>, _>>()?;

    let mut pixels = vec![0; width * height];

    decode_pixels(
        stream,
        &mut pixels,
        width,
        &groups,
        selector.as_ref(),
        cache,
        MAX_BACKWARD_DISTANCE
    )?;

    Ok(pixels)
}

/// Fill `pixels` from the stream
fn decode_pixels(
    stream: &mut BitStreamReader, pixels: &mut [u32], width: usize, groups: &[HuffmanGroup],
    selector: Option<&GroupSelector>, mut cache: Option<ColorCache>, max_distance: usize
) -> Result<(), Vp8lDecodeErrors> {
    let total = pixels.len();
    let mut position = 0;

    while position < total {
        let group = match selector {
            Some(selector) => &groups[selector.group_at(position % width, position / width)],
            None => &groups[0]
        };

        let green = group.green.decode(stream)?;

        if green < NUM_LITERAL_CODES as u16 {
            let argb = group.read_literal(stream, green)?;

            pixels[position] = argb;

            if let Some(cache) = cache.as_mut() {
                cache.insert(argb);
            }
            position += 1;
        } else if green < COLOR_CACHE_SYMBOL_START {
            let length = decode_prefix_value(stream, green - NUM_LITERAL_CODES as u16)?;

            let distance_symbol = group.distance.decode(stream)?;
            let distance_code = decode_prefix_value(stream, distance_symbol)?;
            let distance = plane_code_to_distance(width, distance_code);

            copy_backward(pixels, position, distance, length, max_distance)?;

            if let Some(cache) = cache.as_mut() {
                for pixel in &pixels[position..position + length] {
                    cache.insert(*pixel);
                }
            }
            position += length;
        } else {
            let index = usize::from(green - COLOR_CACHE_SYMBOL_START);

            let argb = match cache.as_mut() {
                Some(cache) => {
                    let argb = cache.get(index)?;
                    cache.insert(argb);
                    argb
                }
                None => return Err(Vp8lDecodeErrors::ColorCacheIndexOutOfRange(index, 0))
            };
            pixels[position] = argb;
            position += 1;
        }
    }
    Ok(())
}
