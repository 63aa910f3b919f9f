/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Pixel helpers shared by the transforms and the entropy decoder
//!
//! Pixels are packed as `0xAARRGGBB`.
use crate::errors::Vp8lDecodeErrors;

/// Number of `2^bits` sized blocks needed to cover `size` pixels
#[inline]
pub const fn subsample_size(size: usize, bits: u8) -> usize {
    (size + (1 << bits) - 1) >> bits
}

/// Check that a buffer of `found` pixels is exactly a `width` x `height` image
pub(crate) fn check_pixel_count(
    found: usize, width: usize, height: usize
) -> Result<(), Vp8lDecodeErrors> {
    if width == 0 || height == 0 {
        return Err(Vp8lDecodeErrors::ZeroDimensions);
    }
    let expected = width
        .checked_mul(height)
        .ok_or(Vp8lDecodeErrors::GenericStatic("Image size overflows usize"))?;

    if found != expected {
        return Err(Vp8lDecodeErrors::PixelCountMismatch(expected, found));
    }
    Ok(())
}

/// Per channel addition modulo 256
///
/// Alpha/green and red/blue are added as two pairs of lanes,
/// the carry out of each lane lands in a masked out byte.
#[inline(always)]
pub(crate) const fn add_pixels(a: u32, b: u32) -> u32 {
    let alpha_green = (a & 0xff00_ff00).wrapping_add(b & 0xff00_ff00);
    let red_blue = (a & 0x00ff_00ff).wrapping_add(b & 0x00ff_00ff);

    (alpha_green & 0xff00_ff00) | (red_blue & 0x00ff_00ff)
}

/// Per channel subtraction modulo 256
///
/// The `0xff` in the byte above each lane absorbs its borrow.
#[inline(always)]
pub(crate) const fn sub_pixels(a: u32, b: u32) -> u32 {
    let alpha_green = 0x00ff_00ff_u32
        .wrapping_add(a & 0xff00_ff00)
        .wrapping_sub(b & 0xff00_ff00);
    let red_blue = 0xff00_ff00_u32
        .wrapping_add(a & 0x00ff_00ff)
        .wrapping_sub(b & 0x00ff_00ff);

    (alpha_green & 0xff00_ff00) | (red_blue & 0x00ff_00ff)
}

/// Split a pixel into `[a, r, g, b]`
#[inline(always)]
pub(crate) const fn channels(argb: u32) -> [u8; 4] {
    argb.to_be_bytes()
}

/// Pack `[a, r, g, b]` into a pixel
#[inline(always)]
pub(crate) const fn pack(channels: [u8; 4]) -> u32 {
    u32::from_be_bytes(channels)
}

/// Write ARGB pixels out as RGBA bytes
///
/// When `has_alpha` is false the alpha byte is forced to `255`
pub(crate) fn argb_to_rgba(pixels: &[u32], output: &mut [u8], has_alpha: bool) {
    for (pixel, out) in pixels.iter().zip(output.chunks_exact_mut(4)) {
        let [a, r, g, b] = channels(*pixel);

        out[0] = r;
        out[1] = g;
        out[2] = b;
        out[3] = if has_alpha { a } else { 255 };
    }
}
