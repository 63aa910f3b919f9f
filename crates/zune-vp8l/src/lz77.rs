/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Backward references
//!
//! A backward reference copies `length` pixels starting `distance`
//! pixels behind the write position. Both values are sent as a prefix
//! symbol plus extra bits, distances additionally go through the plane
//! code map which gives short codes to pixels in the 2d neighbourhood.
use crate::bitstream::BitStreamReader;
use crate::constants::{NUM_PLANE_CODES, PLANE_CODE_OFFSETS};
use crate::errors::Vp8lDecodeErrors;

/// Copy `length` pixels from `position - distance` to `position`
///
/// The copy moves one pixel at a time from low to high addresses,
/// so an overlapping copy (`distance < length`) repeats the last
/// `distance` pixels, a distance of 1 is a run of a single color.
///
/// # Errors
/// - `distance` is zero or above `max_distance`
/// - `distance` reaches before the start of `buffer`
/// - the copy would write past the end of `buffer`
pub fn copy_backward(
    buffer: &mut [u32], position: usize, distance: usize, length: usize, max_distance: usize
) -> Result<(), Vp8lDecodeErrors> {
    if distance == 0 || distance > max_distance {
        return Err(Vp8lDecodeErrors::InvalidDistance(distance, max_distance));
    }
    if distance > position {
        return Err(Vp8lDecodeErrors::DistanceBeyondHistory(distance, position));
    }
    let end = position.saturating_add(length);

    if end > buffer.len() {
        return Err(Vp8lDecodeErrors::CopyOutOfBounds {
            position,
            length,
            size: buffer.len()
        });
    }
    if distance >= length {
        // no overlap, let the compiler use a memmove
        buffer.copy_within(position - distance..end - distance, position);
    } else {
        for i in position..end {
            buffer[i] = buffer[i - distance];
        }
    }
    Ok(())
}

/// Turn a length or distance prefix symbol into its value
///
/// Prefixes below 4 stand for themselves plus one, larger ones
/// carry `(prefix - 2) >> 1` extra bits.
#[inline]
pub fn decode_prefix_value(
    stream: &mut BitStreamReader, prefix: u16
) -> Result<usize, Vp8lDecodeErrors> {
    if prefix < 4 {
        return Ok(usize::from(prefix) + 1);
    }
    let extra_bits = ((prefix - 2) >> 1) as u8;
    let offset = (2 + usize::from(prefix & 1)) << extra_bits;

    let extra = stream.read_bits_wide(extra_bits)? as usize;

    Ok(offset + extra + 1)
}

/// Map a decoded distance value to a pixel distance in an image
/// `width` pixels wide
///
/// The first 120 values are neighbourhood codes, each naming an
/// `(dx, dy)` offset; they never map to less than one pixel.
#[inline]
pub fn plane_code_to_distance(width: usize, value: usize) -> usize {
    if value > NUM_PLANE_CODES {
        return value - NUM_PLANE_CODES;
    }
    if value == 0 {
        // never produced by decode_prefix_value, copy_backward rejects it
        return 0;
    }
    let (dx, dy) = PLANE_CODE_OFFSETS[value - 1];

    let distance = isize::from(dx) + isize::from(dy) * width as isize;

    distance.max(1) as usize
}
