/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Image transforms
//!
//! An encoder runs transforms over the image before entropy coding it,
//! the decoder undoes them in reverse order once every pixel is known.
//!
//! The palette transform is one way. Going from colors to indices loses
//! nothing an encoder needs, but the decoder only ever goes from indices
//! to colors, so for a palette the decode step is the forward lookup and
//! an actual inversion is reported as [`PaletteNotInvertible`].
//!
//! [`PaletteNotInvertible`]: Vp8lDecodeErrors::PaletteNotInvertible
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use zune_core::log::trace;

use crate::constants::MAX_PALETTE_SIZE;
use crate::errors::Vp8lDecodeErrors;
use crate::predictor;
use crate::utils::{add_pixels, channels, check_pixel_count, pack, subsample_size};

/// The four transform kinds, numbered as in the bitstream
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TransformType {
    Predictor,
    Color,
    SubtractGreen,
    Palette
}

impl TransformType {
    /// Map the 2 bit transform type read from the stream
    pub const fn from_bits(bits: u32) -> TransformType {
        match bits & 3 {
            0 => TransformType::Predictor,
            1 => TransformType::Color,
            2 => TransformType::SubtractGreen,
            _ => TransformType::Palette
        }
    }
}

/// A transform together with the data needed to run it
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Transform {
    SubtractGreen,
    /// Red and blue adjusted by multiples of the other channels,
    /// one set of multipliers per `2^size_bits` block
    Color {
        size_bits:    u8,
        block_width:  usize,
        block_height: usize,
        data:         Vec<u32>
    },
    /// Pixels hold an index into `palette` in their low 8 bits
    Palette { palette: Vec<u32> },
    /// Pixels hold residuals against a spatial prediction,
    /// one predictor mode per `2^size_bits` block
    Predictor {
        size_bits:    u8,
        block_width:  usize,
        block_height: usize,
        data:         Vec<u32>
    }
}

impl Transform {
    pub const fn transform_type(&self) -> TransformType {
        match self {
            Transform::SubtractGreen => TransformType::SubtractGreen,
            Transform::Color { .. } => TransformType::Color,
            Transform::Palette { .. } => TransformType::Palette,
            Transform::Predictor { .. } => TransformType::Predictor
        }
    }

    /// Run the transform the way an encoder does
    ///
    /// For the palette this is the index to color lookup.
    ///
    /// # Errors
    /// [`Vp8lDecodeErrors::PixelCountMismatch`] if `pixels` is not
    /// `width * height` long
    pub fn forward(
        &self, pixels: &mut [u32], width: usize, height: usize
    ) -> Result<(), Vp8lDecodeErrors> {
        check_pixel_count(pixels.len(), width, height)?;

        match self {
            Transform::SubtractGreen => {
                subtract_green_forward(pixels);
                Ok(())
            }
            Transform::Color {
                size_bits,
                block_width,
                block_height,
                data
            } => {
                check_block_grid(
                    "Color",
                    width,
                    height,
                    *size_bits,
                    (*block_width, *block_height),
                    data
                )?;
                color_transform(pixels, width, *size_bits, *block_width, data, false);
                Ok(())
            }
            Transform::Palette { palette } => apply_palette(pixels, palette),
            Transform::Predictor {
                size_bits,
                block_width,
                block_height,
                data
            } => {
                check_block_grid(
                    "Predictor",
                    width,
                    height,
                    *size_bits,
                    (*block_width, *block_height),
                    data
                )?;
                predictor::apply_forward(pixels, width, height, *size_bits, data)
            }
        }
    }

    /// Undo [`Transform::forward`]
    ///
    /// # Errors
    /// - [`Vp8lDecodeErrors::PaletteNotInvertible`] for a palette
    /// - [`Vp8lDecodeErrors::PixelCountMismatch`] if `pixels` is not
    ///   `width * height` long
    pub fn inverse(
        &self, pixels: &mut [u32], width: usize, height: usize
    ) -> Result<(), Vp8lDecodeErrors> {
        check_pixel_count(pixels.len(), width, height)?;

        match self {
            Transform::SubtractGreen => {
                subtract_green_inverse(pixels);
                Ok(())
            }
            Transform::Color {
                size_bits,
                block_width,
                block_height,
                data
            } => {
                check_block_grid(
                    "Color",
                    width,
                    height,
                    *size_bits,
                    (*block_width, *block_height),
                    data
                )?;
                color_transform(pixels, width, *size_bits, *block_width, data, true);
                Ok(())
            }
            Transform::Palette { .. } => Err(Vp8lDecodeErrors::PaletteNotInvertible),
            Transform::Predictor {
                size_bits,
                block_width,
                block_height,
                data
            } => {
                check_block_grid(
                    "Predictor",
                    width,
                    height,
                    *size_bits,
                    (*block_width, *block_height),
                    data
                )?;
                predictor::apply_inverse(pixels, width, height, *size_bits, data)
            }
        }
    }

    /// The decode step, the inverse for every transform except the palette
    /// which is expanded with its forward lookup
    pub fn reconstruct(
        &self, pixels: &mut [u32], width: usize, height: usize
    ) -> Result<(), Vp8lDecodeErrors> {
        match self {
            Transform::Palette { .. } => self.forward(pixels, width, height),
            _ => self.inverse(pixels, width, height)
        }
    }
}

/// Check that a transform's sub-image covers the image
fn check_block_grid(
    name: &'static str, width: usize, height: usize, size_bits: u8,
    (block_width, block_height): (usize, usize), data: &[u32]
) -> Result<(), Vp8lDecodeErrors> {
    let grid_width = subsample_size(width, size_bits);
    let grid_height = subsample_size(height, size_bits);
    let needed = grid_width * grid_height;

    if block_width != grid_width || block_height != grid_height {
        return Err(Vp8lDecodeErrors::MissingTransformData(
            name,
            needed,
            block_width * block_height
        ));
    }
    if data.len() < needed {
        return Err(Vp8lDecodeErrors::MissingTransformData(
            name,
            needed,
            data.len()
        ));
    }
    Ok(())
}

/// Run transforms in list order, the way an encoder applies them
pub fn apply_chain(
    transforms: &[Transform], pixels: &mut [u32], width: usize, height: usize
) -> Result<(), Vp8lDecodeErrors> {
    check_pixel_count(pixels.len(), width, height)?;

    for transform in transforms {
        transform.forward(pixels, width, height)?;
    }
    Ok(())
}

/// Undo [`apply_chain`], running inverses in reverse order
///
/// Fails before touching any pixel if the chain contains a palette.
pub fn invert_chain(
    transforms: &[Transform], pixels: &mut [u32], width: usize, height: usize
) -> Result<(), Vp8lDecodeErrors> {
    check_pixel_count(pixels.len(), width, height)?;

    if transforms
        .iter()
        .any(|t| t.transform_type() == TransformType::Palette)
    {
        return Err(Vp8lDecodeErrors::PaletteNotInvertible);
    }
    for transform in transforms.iter().rev() {
        transform.inverse(pixels, width, height)?;
    }
    Ok(())
}

/// Decode side of a transform chain read from a stream,
/// see [`Transform::reconstruct`]
pub fn reconstruct_chain(
    transforms: &[Transform], pixels: &mut [u32], width: usize, height: usize
) -> Result<(), Vp8lDecodeErrors> {
    check_pixel_count(pixels.len(), width, height)?;

    for transform in transforms.iter().rev() {
        trace!("Reconstructing {:?} transform", transform.transform_type());
        transform.reconstruct(pixels, width, height)?;
    }
    Ok(())
}

/// `r -= g`, `b -= g`
pub fn subtract_green_forward(pixels: &mut [u32]) {
    for pixel in pixels.iter_mut() {
        let [a, r, g, b] = channels(*pixel);
        *pixel = pack([a, r.wrapping_sub(g), g, b.wrapping_sub(g)]);
    }
}

/// `r += g`, `b += g`
pub fn subtract_green_inverse(pixels: &mut [u32]) {
    for pixel in pixels.iter_mut() {
        let [a, r, g, b] = channels(*pixel);
        *pixel = pack([a, r.wrapping_add(g), g, b.wrapping_add(g)]);
    }
}

/// Multipliers of one color transform block
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ColorTransformElement {
    pub green_to_red:  i8,
    pub green_to_blue: i8,
    pub red_to_blue:   i8
}

impl ColorTransformElement {
    /// Unpack from a sub-image pixel,
    /// `green_to_red` in bits 0..8, `green_to_blue` 8..16, `red_to_blue` 16..24
    pub const fn from_pixel(pixel: u32) -> ColorTransformElement {
        ColorTransformElement {
            green_to_red:  pixel as u8 as i8,
            green_to_blue: (pixel >> 8) as u8 as i8,
            red_to_blue:   (pixel >> 16) as u8 as i8
        }
    }

    /// Pack into a sub-image pixel
    pub const fn to_pixel(self) -> u32 {
        (self.green_to_red as u8 as u32)
            | ((self.green_to_blue as u8 as u32) << 8)
            | ((self.red_to_blue as u8 as u32) << 16)
    }
}

/// `(multiplier * color) >> 8`, both read as signed 8 bit values
#[inline(always)]
const fn color_transform_delta(multiplier: i8, color: u8) -> u8 {
    ((multiplier as i32 * (color as i8) as i32) >> 8) as u8
}

fn color_transform(
    pixels: &mut [u32], width: usize, size_bits: u8, block_width: usize, data: &[u32],
    inverse: bool
) {
    for (y, row) in pixels.chunks_exact_mut(width).enumerate() {
        let block_row = &data[(y >> size_bits) * block_width..];

        for (x, pixel) in row.iter_mut().enumerate() {
            let element = ColorTransformElement::from_pixel(block_row[x >> size_bits]);
            let [a, r, g, b] = channels(*pixel);

            let green_to_red = color_transform_delta(element.green_to_red, g);
            let green_to_blue = color_transform_delta(element.green_to_blue, g);

            *pixel = if inverse {
                let new_r = r.wrapping_sub(green_to_red);
                let new_b = b
                    .wrapping_sub(green_to_blue)
                    .wrapping_sub(color_transform_delta(element.red_to_blue, new_r));
                pack([a, new_r, g, new_b])
            } else {
                let new_r = r.wrapping_add(green_to_red);
                let new_b = b
                    .wrapping_add(green_to_blue)
                    .wrapping_add(color_transform_delta(element.red_to_blue, r));
                pack([a, new_r, g, new_b])
            };
        }
    }
}

/// Build a palette of the unique colors in `pixels`, in order of first
/// appearance, and the index of every pixel into it
///
/// # Errors
/// [`Vp8lDecodeErrors::TooManyColors`] when there are more than `max_colors`
/// unique colors, `max_colors` itself is capped at 256
pub fn create_palette(
    pixels: &[u32], max_colors: usize
) -> Result<(Vec<u32>, Vec<u32>), Vp8lDecodeErrors> {
    let max_colors = max_colors.min(MAX_PALETTE_SIZE);

    let mut palette = Vec::new();
    let mut lookup = BTreeMap::new();
    let mut indices = Vec::with_capacity(pixels.len());

    for pixel in pixels {
        let index = match lookup.get(pixel) {
            Some(index) => *index,
            None => {
                if palette.len() == max_colors {
                    return Err(Vp8lDecodeErrors::TooManyColors(
                        palette.len() + 1,
                        max_colors
                    ));
                }
                let index = palette.len() as u32;
                palette.push(*pixel);
                lookup.insert(*pixel, index);
                index
            }
        };
        indices.push(index);
    }
    Ok((palette, indices))
}

/// Replace every index in the low 8 bits of a pixel with its palette color
pub fn apply_palette(pixels: &mut [u32], palette: &[u32]) -> Result<(), Vp8lDecodeErrors> {
    for pixel in pixels.iter_mut() {
        let index = (*pixel & 0xff) as usize;

        *pixel = *palette
            .get(index)
            .ok_or(Vp8lDecodeErrors::PaletteIndexOutOfRange(index, palette.len()))?;
    }
    Ok(())
}

/// Palettes are stored with each entry relative to the previous one
pub(crate) fn undo_palette_delta(palette: &mut [u32]) {
    for i in 1..palette.len() {
        palette[i] = add_pixels(palette[i], palette[i - 1]);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use nanorand::Rng;

    use crate::errors::Vp8lDecodeErrors;
    use crate::transform::{
        apply_chain, apply_palette, create_palette, invert_chain, reconstruct_chain,
        subtract_green_forward, subtract_green_inverse, undo_palette_delta,
        ColorTransformElement, Transform, TransformType
    };

    fn random_pixels(rand: &mut nanorand::WyRand, count: usize) -> Vec<u32> {
        (0..count).map(|_| rand.generate()).collect()
    }

    #[test]
    fn subtract_green_wraps() {
        // r = 10, g = 50, b = 60
        let mut pixels = vec![0xff0a_323c];

        subtract_green_forward(&mut pixels);
        assert_eq!(pixels, [0xffd8_320a]);

        subtract_green_inverse(&mut pixels);
        assert_eq!(pixels, [0xff0a_323c]);
    }

    #[test]
    fn subtract_green_round_trip() {
        let mut rand = nanorand::WyRand::new_seed(7);
        let original = random_pixels(&mut rand, 1000);
        let mut pixels = original.clone();

        subtract_green_forward(&mut pixels);
        subtract_green_inverse(&mut pixels);

        assert_eq!(pixels, original);
    }

    #[test]
    fn color_transform_element_layout() {
        let element = ColorTransformElement::from_pixel(0x0020_c040);

        assert_eq!(element.green_to_red, 0x40);
        assert_eq!(element.green_to_blue, -64);
        assert_eq!(element.red_to_blue, 0x20);
        assert_eq!(element.to_pixel(), 0x0020_c040);
    }

    #[test]
    fn color_transform_known_values() {
        let transform = Transform::Color {
            size_bits:    2,
            block_width:  1,
            block_height: 1,
            data:         vec![0x0020_c040]
        };
        // r = 0x50, g = 0x80 (-128 as signed), b = 0x30
        let mut pixels = vec![0xff50_8030];

        transform.forward(&mut pixels, 1, 1).unwrap();
        // r + (64 * -128) >> 8 = 0x50 - 32
        // b + (-64 * -128) >> 8 + (32 * 0x50) >> 8 = 0x30 + 32 + 10
        assert_eq!(pixels, [0xff30_805a]);

        transform.inverse(&mut pixels, 1, 1).unwrap();
        assert_eq!(pixels, [0xff50_8030]);
    }

    #[test]
    fn color_transform_round_trip() {
        let mut rand = nanorand::WyRand::new_seed(0xABCD);
        let (width, height) = (19, 13);
        // 8x8 blocks
        let transform = Transform::Color {
            size_bits:    3,
            block_width:  3,
            block_height: 2,
            data:         random_pixels(&mut rand, 6)
        };
        let original = random_pixels(&mut rand, width * height);
        let mut pixels = original.clone();

        transform.forward(&mut pixels, width, height).unwrap();
        assert_ne!(pixels, original);
        transform.inverse(&mut pixels, width, height).unwrap();

        assert_eq!(pixels, original);
    }

    #[test]
    fn short_block_data() {
        let transform = Transform::Color {
            size_bits:    2,
            block_width:  2,
            block_height: 2,
            data:         vec![0; 3]
        };
        let mut pixels = vec![0; 64];

        assert!(matches!(
            transform.inverse(&mut pixels, 8, 8),
            Err(Vp8lDecodeErrors::MissingTransformData("Color", 4, 3))
        ));

        // grid smaller than the image needs
        let transform = Transform::Predictor {
            size_bits:    2,
            block_width:  1,
            block_height: 1,
            data:         vec![0; 4]
        };
        assert!(matches!(
            transform.inverse(&mut pixels, 8, 8),
            Err(Vp8lDecodeErrors::MissingTransformData("Predictor", 4, 1))
        ));
    }

    #[test]
    fn pixel_buffer_must_match_dimensions() {
        let predictor = Transform::Predictor {
            size_bits:    2,
            block_width:  1,
            block_height: 1,
            data:         vec![0x0000_0100]
        };
        let mut pixels = vec![0; 3];

        assert!(matches!(
            predictor.inverse(&mut pixels, 2, 2),
            Err(Vp8lDecodeErrors::PixelCountMismatch(4, 3))
        ));
        assert!(matches!(
            predictor.forward(&mut pixels, 2, 2),
            Err(Vp8lDecodeErrors::PixelCountMismatch(4, 3))
        ));

        // a partial last row is not skipped
        let color = Transform::Color {
            size_bits:    2,
            block_width:  1,
            block_height: 1,
            data:         vec![0x0011_2233]
        };
        let mut pixels = vec![0; 7];
        assert!(matches!(
            color.reconstruct(&mut pixels, 4, 2),
            Err(Vp8lDecodeErrors::PixelCountMismatch(8, 7))
        ));
        assert!(matches!(
            color.inverse(&mut [], 0, 5),
            Err(Vp8lDecodeErrors::ZeroDimensions)
        ));

        assert!(matches!(
            apply_chain(&[Transform::SubtractGreen], &mut pixels, 3, 3),
            Err(Vp8lDecodeErrors::PixelCountMismatch(9, 7))
        ));
        assert!(matches!(
            invert_chain(&[], &mut pixels, 2, 2),
            Err(Vp8lDecodeErrors::PixelCountMismatch(4, 7))
        ));
        assert!(matches!(
            reconstruct_chain(&[color], &mut pixels, 1, 1),
            Err(Vp8lDecodeErrors::PixelCountMismatch(1, 7))
        ));
        // nothing was touched
        assert_eq!(pixels, [0; 7]);
    }

    #[test]
    fn palette_round_trip() {
        let mut rand = nanorand::WyRand::new_seed(99);
        let colors = random_pixels(&mut rand, 256);
        let pixels: Vec<u32> = (0..2000)
            .map(|_| colors[rand.generate_range(0_usize..256)])
            .collect();

        let (palette, mut indices) = create_palette(&pixels, 256).unwrap();

        assert!(palette.len() <= 256);
        apply_palette(&mut indices, &palette).unwrap();
        assert_eq!(indices, pixels);
    }

    #[test]
    fn palette_keeps_first_appearance_order() {
        let pixels = [5, 9, 5, 7, 9];
        let (palette, indices) = create_palette(&pixels, 16).unwrap();

        assert_eq!(palette, [5, 9, 7]);
        assert_eq!(indices, [0, 1, 0, 2, 1]);
    }

    #[test]
    fn palette_errors() {
        let pixels: Vec<u32> = (0..10).collect();

        assert!(matches!(
            create_palette(&pixels, 4),
            Err(Vp8lDecodeErrors::TooManyColors(5, 4))
        ));

        let pixels: Vec<u32> = (0..300).collect();
        assert!(matches!(
            create_palette(&pixels, 1000),
            Err(Vp8lDecodeErrors::TooManyColors(257, 256))
        ));

        let mut indices = vec![0, 1, 2];
        assert!(matches!(
            apply_palette(&mut indices, &[0xff00_0000, 0xffff_ffff]),
            Err(Vp8lDecodeErrors::PaletteIndexOutOfRange(2, 2))
        ));
    }

    #[test]
    fn palette_lookup_ignores_high_bits() {
        let mut indices = vec![0xff00_0001, 0x0000_0100];

        apply_palette(&mut indices, &[0xaa, 0xbb]).unwrap();
        assert_eq!(indices, [0xbb, 0xaa]);
    }

    #[test]
    fn palette_delta_coding() {
        let mut palette = vec![0xff10_2030, 0x0001_0203, 0x00ff_ffff];

        undo_palette_delta(&mut palette);

        assert_eq!(palette, [0xff10_2030, 0xff11_2233, 0xff10_2132]);
    }

    #[test]
    fn chains_round_trip_in_reverse() {
        let mut rand = nanorand::WyRand::new_seed(1234);
        let (width, height) = (10, 7);
        let transforms = vec![
            Transform::SubtractGreen,
            Transform::Predictor {
                size_bits:    2,
                block_width:  3,
                block_height: 2,
                data:         (0..6).map(|i| (i * 2) << 8).collect()
            },
            Transform::Color {
                size_bits:    4,
                block_width:  1,
                block_height: 1,
                data:         vec![0x0011_f0e1]
            },
        ];
        let original = random_pixels(&mut rand, width * height);
        let mut pixels = original.clone();

        apply_chain(&transforms, &mut pixels, width, height).unwrap();
        invert_chain(&transforms, &mut pixels, width, height).unwrap();

        assert_eq!(pixels, original);
    }

    #[test]
    fn palette_in_chain_is_not_invertible() {
        let transforms = vec![
            Transform::SubtractGreen,
            Transform::Palette {
                palette: vec![0xff00_0000]
            },
        ];
        let mut pixels = vec![0x0012_3456; 4];

        assert!(matches!(
            invert_chain(&transforms, &mut pixels, 2, 2),
            Err(Vp8lDecodeErrors::PaletteNotInvertible)
        ));
        // nothing was touched
        assert_eq!(pixels, [0x0012_3456; 4]);

        // the decode step expands the palette instead
        let mut indices = vec![0; 4];
        transforms[1].reconstruct(&mut indices, 2, 2).unwrap();
        assert_eq!(indices, [0xff00_0000; 4]);
    }

    #[test]
    fn transform_type_bits() {
        assert_eq!(TransformType::from_bits(0), TransformType::Predictor);
        assert_eq!(TransformType::from_bits(1), TransformType::Color);
        assert_eq!(TransformType::from_bits(2), TransformType::SubtractGreen);
        assert_eq!(TransformType::from_bits(3), TransformType::Palette);
        assert_eq!(
            Transform::SubtractGreen.transform_type(),
            TransformType::SubtractGreen
        );
    }
}
