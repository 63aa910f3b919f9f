/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The 5 byte VP8L header
//!
//! ```text
//! byte 0     : signature, 0x2F
//! bytes 1..5 : little endian u32
//!              bits 0..14  width - 1
//!              bits 14..28 height - 1
//!              bit 28      alpha is used
//!              bits 29..32 version, always 0
//! ```
use zune_core::log::trace;

use crate::constants::{VP8L_HEADER_SIZE, VP8L_SIGNATURE};
use crate::errors::Vp8lDecodeErrors;

/// Information found in the stream header
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Vp8lHeader {
    pub width:     usize,
    pub height:    usize,
    pub has_alpha: bool,
    pub version:   u8
}

impl Vp8lHeader {
    /// Parse the header at the start of `data`
    ///
    /// Dimensions are checked against `max_width` and `max_height`
    pub fn parse(
        data: &[u8], max_width: usize, max_height: usize
    ) -> Result<Vp8lHeader, Vp8lDecodeErrors> {
        if data.len() < VP8L_HEADER_SIZE {
            return Err(Vp8lDecodeErrors::TruncatedHeader(data.len()));
        }
        if data[0] != VP8L_SIGNATURE {
            return Err(Vp8lDecodeErrors::InvalidSignature(data[0]));
        }
        let packed = u32::from_le_bytes([data[1], data[2], data[3], data[4]]);

        let width = (packed & 0x3fff) as usize + 1;
        let height = ((packed >> 14) & 0x3fff) as usize + 1;
        let has_alpha = (packed >> 28) & 1 == 1;
        let version = (packed >> 29) as u8;

        trace!("Width: {width}");
        trace!("Height: {height}");
        trace!("Alpha used: {has_alpha}");
        trace!("Version: {version}");

        if version != 0 {
            return Err(Vp8lDecodeErrors::UnsupportedVersion(version));
        }

        let header = Vp8lHeader {
            width,
            height,
            has_alpha,
            version
        };
        header.check_dimensions(max_width, max_height)?;

        Ok(header)
    }

    pub(crate) fn check_dimensions(
        &self, max_width: usize, max_height: usize
    ) -> Result<(), Vp8lDecodeErrors> {
        if self.width == 0 || self.height == 0 {
            return Err(Vp8lDecodeErrors::ZeroDimensions);
        }
        if self.width > max_width {
            return Err(Vp8lDecodeErrors::TooLargeDimensions(
                "width",
                max_width,
                self.width
            ));
        }
        if self.height > max_height {
            return Err(Vp8lDecodeErrors::TooLargeDimensions(
                "height",
                max_height,
                self.height
            ));
        }
        Ok(())
    }
}
