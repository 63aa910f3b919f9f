/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec;
use alloc::vec::Vec;

use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;
use zune_core::log::{trace, warn};
use zune_core::options::DecoderOptions;

use crate::bitstream::BitStreamReader;
use crate::constants::VP8L_HEADER_SIZE;
use crate::entropy::{decode_main_image, decode_sub_image};
use crate::errors::Vp8lDecodeErrors;
use crate::headers::Vp8lHeader;
use crate::transform::{reconstruct_chain, undo_palette_delta, Transform, TransformType};
use crate::utils::{argb_to_rgba, subsample_size};

/// A VP8L (WebP lossless) decoder
///
/// The decoder takes the raw VP8L payload, i.e the bytes of a `VP8L`
/// chunk with the RIFF container already stripped.
///
/// The decoder is initialized by calling `new`
/// and either of [`decode_headers`] to decode headers
/// or [`decode`] to return uncompressed pixels
///
/// [`decode_headers`]:Vp8lDecoder::decode_headers
/// [`decode`]:Vp8lDecoder::decode
pub struct Vp8lDecoder<'a> {
    data:            &'a [u8],
    width:           usize,
    height:          usize,
    has_alpha:       bool,
    decoded_headers: bool,
    options:         DecoderOptions
}

impl<'a> Vp8lDecoder<'a> {
    /// Create a new decoder with the default options
    ///
    /// # Example
    ///
    /// ```no_run
    /// let mut decoder = zune_vp8l::Vp8lDecoder::new(&[]);
    /// // additional code
    /// ```
    pub fn new(data: &'a [u8]) -> Vp8lDecoder<'a> {
        Vp8lDecoder::new_with_options(data, DecoderOptions::default())
    }

    /// Create a new decoder that obeys specified restrictions
    ///
    /// Only the width and height limits of `options` apply to VP8L,
    /// the header itself cannot describe images above 16384 pixels
    /// in either dimension.
    ///
    /// # Example
    /// ```
    /// use zune_core::options::DecoderOptions;
    /// use zune_vp8l::Vp8lDecoder;
    /// // only decode images less than 10 in both width and height
    /// let options = DecoderOptions::default().set_max_width(10).set_max_height(10);
    ///
    /// let mut decoder = Vp8lDecoder::new_with_options(&[], options);
    /// ```
    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> Vp8lDecoder<'a> {
        Vp8lDecoder {
            data,
            width: 0,
            height: 0,
            has_alpha: false,
            decoded_headers: false,
            options
        }
    }

    /// Decode the 5 byte header, storing dimensions and the
    /// alpha flag in the decoder
    pub fn decode_headers(&mut self) -> Result<(), Vp8lDecodeErrors> {
        if self.decoded_headers {
            return Ok(());
        }
        let header = Vp8lHeader::parse(
            self.data,
            self.options.get_max_width(),
            self.options.get_max_height()
        )?;

        self.width = header.width;
        self.height = header.height;
        self.has_alpha = header.has_alpha;
        self.decoded_headers = true;

        Ok(())
    }

    /// Return the width and height of the image
    ///
    /// Or none if the headers haven't been decoded
    pub const fn dimensions(&self) -> Option<(usize, usize)> {
        if self.decoded_headers {
            return Some((self.width, self.height));
        }
        None
    }

    /// Whether the header marks the alpha channel as used
    ///
    /// Or none if the headers haven't been decoded
    pub const fn has_alpha(&self) -> Option<bool> {
        if self.decoded_headers {
            return Some(self.has_alpha);
        }
        None
    }

    /// Colorspace of the encoded image, [RGBA] when the alpha channel is
    /// used and [RGB] otherwise
    ///
    /// Decoded output is always four channels, for [RGB] images the alpha
    /// byte is 255.
    ///
    /// [RGB]: zune_core::colorspace::ColorSpace::RGB
    /// [RGBA]: zune_core::colorspace::ColorSpace::RGBA
    pub const fn colorspace(&self) -> Option<ColorSpace> {
        if !self.decoded_headers {
            return None;
        }
        if self.has_alpha {
            Some(ColorSpace::RGBA)
        } else {
            Some(ColorSpace::RGB)
        }
    }

    /// VP8L only stores 8 bit channels
    pub const fn bit_depth(&self) -> BitDepth {
        BitDepth::Eight
    }

    /// Return the number of bytes required to hold the decoded RGBA image
    ///
    /// # Returns
    ///  - `Some(usize)`: Minimum size for a buffer needed to decode the image
    ///  - `None`: Indicates the image headers were not decoded, or the size
    ///    does not fit a usize
    pub fn output_buffer_size(&self) -> Option<usize> {
        if !self.decoded_headers {
            return None;
        }
        self.width.checked_mul(self.height)?.checked_mul(4)
    }

    /// Decode the image into a newly allocated RGBA buffer
    pub fn decode(&mut self) -> Result<Vec<u8>, Vp8lDecodeErrors> {
        self.decode_headers()?;

        let size = self.buffer_size()?;
        let mut output = vec![0; size];

        self.decode_into(&mut output)?;

        Ok(output)
    }

    /// Decode the image as RGBA into `output`
    ///
    /// # Errors
    /// [`TooSmallOutput`](Vp8lDecodeErrors::TooSmallOutput) if `output`
    /// cannot hold [`output_buffer_size`](Self::output_buffer_size) bytes,
    /// any decoding error otherwise
    pub fn decode_into(&mut self, output: &mut [u8]) -> Result<(), Vp8lDecodeErrors> {
        self.decode_headers()?;

        let size = self.buffer_size()?;

        if output.len() < size {
            return Err(Vp8lDecodeErrors::TooSmallOutput(size, output.len()));
        }
        let pixels = self.decode_argb()?;

        argb_to_rgba(&pixels, &mut output[..size], self.has_alpha);

        Ok(())
    }

    /// Decode the image into packed `0xAARRGGBB` pixels, row by row
    ///
    /// Alpha is returned as stored, images without alpha have
    /// opaque literals but transforms may still change the byte.
    pub fn decode_argb(&mut self) -> Result<Vec<u32>, Vp8lDecodeErrors> {
        self.decode_headers()?;

        let (width, height) = (self.width, self.height);
        let mut stream = BitStreamReader::new_at(self.data, VP8L_HEADER_SIZE);

        let transforms = read_transforms(&mut stream, width, height)?;

        let mut pixels = decode_main_image(&mut stream, width, height, self.has_alpha)?;

        reconstruct_chain(&transforms, &mut pixels, width, height)?;

        // bytes touched by the last read count as used
        let used = stream.byte_position() + usize::from(stream.bit_offset() != 0);

        if self.data.len() > used {
            warn!(
                "{} bytes left unread after the pixel stream",
                self.data.len() - used
            );
        }
        trace!("Finished decoding image");

        Ok(pixels)
    }

    fn buffer_size(&self) -> Result<usize, Vp8lDecodeErrors> {
        self.output_buffer_size()
            .ok_or(Vp8lDecodeErrors::GenericStatic("Image size overflows usize"))
    }
}

/// Read the transforms preceding the main image, in stream order
fn read_transforms(
    stream: &mut BitStreamReader, width: usize, height: usize
) -> Result<Vec<Transform>, Vp8lDecodeErrors> {
    let mut transforms = Vec::with_capacity(4);
    let mut seen = [false; 4];

    while stream.read_bit()? {
        let transform_type = TransformType::from_bits(stream.read_bits(2)?);

        if seen[transform_type as usize] {
            return Err(Vp8lDecodeErrors::DuplicateTransform(transform_type));
        }
        seen[transform_type as usize] = true;

        trace!("Transform: {:?}", transform_type);

        let transform = match transform_type {
            TransformType::Predictor | TransformType::Color => {
                let size_bits = stream.read_bits(3)? as u8 + 2;
                let block_width = subsample_size(width, size_bits);
                let block_height = subsample_size(height, size_bits);

                let data = decode_sub_image(stream, block_width, block_height)?;

                if transform_type == TransformType::Predictor {
                    Transform::Predictor {
                        size_bits,
                        block_width,
                        block_height,
                        data
                    }
                } else {
                    Transform::Color {
                        size_bits,
                        block_width,
                        block_height,
                        data
                    }
                }
            }
            TransformType::SubtractGreen => Transform::SubtractGreen,
            TransformType::Palette => {
                let size = stream.read_bits(8)? as usize + 1;

                trace!("Palette size: {size}");

                let mut palette = decode_sub_image(stream, size, 1)?;
                undo_palette_delta(&mut palette);

                Transform::Palette { palette }
            }
        };
        transforms.push(transform);
    }
    Ok(transforms)
}

/// Decode a VP8L stream into RGBA pixels
///
/// # Returns
/// `(pixels, width, height)`
///
/// # Example
/// ```no_run
/// let data = std::fs::read("image.vp8l").unwrap();
/// let (pixels, width, height) = zune_vp8l::decode_vp8l(&data).unwrap();
/// assert_eq!(pixels.len(), width * height * 4);
/// ```
pub fn decode_vp8l(data: &[u8]) -> Result<(Vec<u8>, usize, usize), Vp8lDecodeErrors> {
    let mut decoder = Vp8lDecoder::new(data);

    let pixels = decoder.decode()?;

    Ok((pixels, decoder.width, decoder.height))
}
