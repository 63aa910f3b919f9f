/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Spatial predictors
//!
//! Each pixel is predicted from up to four already decoded neighbours,
//!
//! ```text
//!  TL | T | TR
//!  ---+---+---
//!  L  | X
//! ```
//!
//! and the stream stores the per channel difference between the pixel and
//! its prediction. Neighbours outside of the image are the zero pixel.
//!
//! The mode is chosen per `2^size_bits` square block, the green channel of
//! the block's entry in the predictor sub-image holds it.
use alloc::vec::Vec;

use crate::constants::ARGB_BLACK;
use crate::errors::Vp8lDecodeErrors;
use crate::utils::{add_pixels, channels, check_pixel_count, pack, sub_pixels, subsample_size};

/// Prediction modes
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PredictorMode {
    /// Opaque black
    Black,
    Left,
    Top,
    TopRight,
    TopLeft,
    AverageLeftTopRight,
    AverageLeftTopLeft,
    AverageLeftTop,
    AverageTopLeftTop,
    AverageTopTopRight,
    AverageTopLeftTopRight,
    /// Left or top, whichever is closer to the top left pixel
    Select,
    /// `left + top - top_left`, clamped per channel
    ClampAddSubtractFull,
    /// Same prediction as [`PredictorMode::AverageLeftTopRight`]
    ClampAddSubtractHalf
}

impl TryFrom<u8> for PredictorMode {
    type Error = Vp8lDecodeErrors;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let mode = match value {
            0 => PredictorMode::Black,
            1 => PredictorMode::Left,
            2 => PredictorMode::Top,
            3 => PredictorMode::TopRight,
            4 => PredictorMode::TopLeft,
            5 => PredictorMode::AverageLeftTopRight,
            6 => PredictorMode::AverageLeftTopLeft,
            7 => PredictorMode::AverageLeftTop,
            8 => PredictorMode::AverageTopLeftTop,
            9 => PredictorMode::AverageTopTopRight,
            10 => PredictorMode::AverageTopLeftTopRight,
            11 => PredictorMode::Select,
            12 => PredictorMode::ClampAddSubtractFull,
            13 => PredictorMode::ClampAddSubtractHalf,
            _ => return Err(Vp8lDecodeErrors::InvalidPredictorMode(value))
        };
        Ok(mode)
    }
}

/// Per channel average, rounding down
#[inline(always)]
const fn average2(a: u32, b: u32) -> u32 {
    (((a ^ b) & 0xfefe_fefe) >> 1) + (a & b)
}

#[inline(always)]
fn manhattan_distance(a: u32, b: u32) -> u32 {
    let (a, b) = (channels(a), channels(b));

    a.iter()
        .zip(b.iter())
        .map(|(x, y)| u32::from(x.abs_diff(*y)))
        .sum()
}

#[inline(always)]
fn select(left: u32, top: u32, top_left: u32) -> u32 {
    if manhattan_distance(left, top_left) < manhattan_distance(top, top_left) {
        left
    } else {
        top
    }
}

#[inline(always)]
fn clamp_add_subtract_full(left: u32, top: u32, top_left: u32) -> u32 {
    let (l, t, tl) = (channels(left), channels(top), channels(top_left));
    let mut out = [0; 4];

    for i in 0..4 {
        let value = i16::from(l[i]) + i16::from(t[i]) - i16::from(tl[i]);
        out[i] = value.clamp(0, 255) as u8;
    }
    pack(out)
}

/// Predict a pixel from its neighbours
#[inline]
pub fn predict(mode: PredictorMode, left: u32, top: u32, top_left: u32, top_right: u32) -> u32 {
    match mode {
        PredictorMode::Black => ARGB_BLACK,
        PredictorMode::Left => left,
        PredictorMode::Top => top,
        PredictorMode::TopRight => top_right,
        PredictorMode::TopLeft => top_left,
        PredictorMode::AverageLeftTopRight | PredictorMode::ClampAddSubtractHalf => {
            average2(left, top_right)
        }
        PredictorMode::AverageLeftTopLeft => average2(left, top_left),
        PredictorMode::AverageLeftTop => average2(left, top),
        PredictorMode::AverageTopLeftTop => average2(top_left, top),
        PredictorMode::AverageTopTopRight => average2(top, top_right),
        PredictorMode::AverageTopLeftTopRight => average2(top_left, top_right),
        PredictorMode::Select => select(left, top, top_left),
        PredictorMode::ClampAddSubtractFull => clamp_add_subtract_full(left, top, top_left)
    }
}

/// Neighbours of pixel `(x, y)` as `(left, top, top_left, top_right)`
#[inline(always)]
fn neighbours(pixels: &[u32], width: usize, x: usize, y: usize) -> (u32, u32, u32, u32) {
    let pos = y * width + x;

    let left = if x > 0 { pixels[pos - 1] } else { 0 };

    if y == 0 {
        return (left, 0, 0, 0);
    }
    let top = pixels[pos - width];
    let top_left = if x > 0 { pixels[pos - width - 1] } else { 0 };
    let top_right = if x + 1 < width { pixels[pos - width + 1] } else { 0 };

    (left, top, top_left, top_right)
}

/// Decode the mode of every block from the predictor sub-image
fn block_modes(
    width: usize, height: usize, size_bits: u8, data: &[u32]
) -> Result<(Vec<PredictorMode>, usize), Vp8lDecodeErrors> {
    let block_width = subsample_size(width, size_bits);
    let needed = block_width * subsample_size(height, size_bits);

    if data.len() < needed {
        return Err(Vp8lDecodeErrors::MissingTransformData(
            "Predictor",
            needed,
            data.len()
        ));
    }
    let modes = data[..needed]
        .iter()
        .map(|pix| PredictorMode::try_from(((pix >> 8) & 0xf) as u8))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((modes, block_width))
}

/// Undo prediction in place
///
/// Pixels are visited in raster order so every neighbour used for a
/// prediction has already been reconstructed.
pub fn apply_inverse(
    pixels: &mut [u32], width: usize, height: usize, size_bits: u8, data: &[u32]
) -> Result<(), Vp8lDecodeErrors> {
    check_pixel_count(pixels.len(), width, height)?;

    let (modes, block_width) = block_modes(width, height, size_bits, data)?;

    for y in 0..height {
        let mode_row = &modes[(y >> size_bits) * block_width..];

        for x in 0..width {
            let mode = mode_row[x >> size_bits];
            let (l, t, tl, tr) = neighbours(pixels, width, x, y);

            let pos = y * width + x;
            pixels[pos] = add_pixels(pixels[pos], predict(mode, l, t, tl, tr));
        }
    }
    Ok(())
}

/// Replace pixels with their prediction residuals, in place
///
/// Residuals are computed from the original neighbours, walking the image
/// backwards keeps the pixels above and to the left untouched until
/// they are needed.
pub fn apply_forward(
    pixels: &mut [u32], width: usize, height: usize, size_bits: u8, data: &[u32]
) -> Result<(), Vp8lDecodeErrors> {
    check_pixel_count(pixels.len(), width, height)?;

    let (modes, block_width) = block_modes(width, height, size_bits, data)?;

    for y in (0..height).rev() {
        let mode_row = &modes[(y >> size_bits) * block_width..];

        for x in (0..width).rev() {
            let mode = mode_row[x >> size_bits];
            let (l, t, tl, tr) = neighbours(pixels, width, x, y);

            let pos = y * width + x;
            pixels[pos] = sub_pixels(pixels[pos], predict(mode, l, t, tl, tr));
        }
    }
    Ok(())
}
