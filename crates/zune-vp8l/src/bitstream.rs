/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! `BitStreamReader` API
//!
//! VP8L packs values least significant bit first, the first bit read
//! is bit 0 of the first byte and ends up as bit 0 of the returned value.
//!
//! Unlike a deflate bit reader, which may over-read into padding,
//! every read here is checked, running out of data is an error and
//! a failed read consumes nothing.

use crate::errors::Vp8lDecodeErrors;

pub struct BitStreamReader<'src> {
    // buffer from which we are pulling in bits from
    src:       &'src [u8],
    // where the stream started, `tell` is relative to this
    start:     usize,
    // position of the next byte to be moved into the bit buffer
    position:  usize,
    bits_left: u8,
    buffer:    u64
}

impl<'src> BitStreamReader<'src> {
    /// Create a new `BitStreamReader` reading from the start
    /// of `in_buffer`
    pub fn new(in_buffer: &'src [u8]) -> BitStreamReader<'src> {
        BitStreamReader::new_at(in_buffer, 0)
    }
    /// Create a new `BitStreamReader` whose first bit is bit 0 of
    /// `in_buffer[offset]`
    ///
    /// An offset past the end of the buffer gives an empty reader
    pub fn new_at(in_buffer: &'src [u8], offset: usize) -> BitStreamReader<'src> {
        let start = offset.min(in_buffer.len());

        BitStreamReader {
            src: in_buffer,
            start,
            position: start,
            bits_left: 0,
            buffer: 0
        }
    }
    /// Refill the bit buffer so that it holds between 56 and 63 bits,
    /// or every remaining bit when we are near the end of the stream
    #[inline(always)]
    fn refill(&mut self) {
        match self.src.get(self.position..self.position + 8) {
            Some(bytes) => {
                let mut buf = [0; 8];
                buf.copy_from_slice(bytes);
                // create a u64 from an array of u8's
                let new_buffer = u64::from_le_bytes(buf);
                // num indicates how many bits we can take in
                let num = 63 ^ self.bits_left;
                // only whole bytes are consumed, bits of a partially
                // taken byte are or-ed in again on the next refill
                self.position += usize::from(num >> 3);
                self.buffer |= new_buffer << self.bits_left;
                // bits left are now between 56-63
                self.bits_left |= 56;
            }
            None => self.refill_slow()
        }
    }
    #[inline(never)]
    fn refill_slow(&mut self) {
        let bytes = &self.src[self.position..];

        for byte in bytes {
            if self.bits_left >= 56 {
                break;
            }

            self.buffer |= u64::from(*byte) << self.bits_left;
            self.bits_left += 8;
            self.position += 1;
        }
    }

    /// Read `num_bits` bits, `1 <= num_bits <= 16`
    ///
    /// # Errors
    /// - [`InvalidBitCount`] when `num_bits` is outside `1..=16`
    /// - [`ExhaustedData`] when fewer than `num_bits` bits remain,
    ///   in which case nothing is consumed
    ///
    /// [`InvalidBitCount`]: Vp8lDecodeErrors::InvalidBitCount
    /// [`ExhaustedData`]: Vp8lDecodeErrors::ExhaustedData
    #[inline(always)]
    pub fn read_bits(&mut self, num_bits: u8) -> Result<u32, Vp8lDecodeErrors> {
        if num_bits == 0 || num_bits > 16 {
            return Err(Vp8lDecodeErrors::InvalidBitCount(num_bits));
        }
        if self.bits_left < num_bits {
            self.refill();

            if self.bits_left < num_bits {
                return Err(Vp8lDecodeErrors::ExhaustedData {
                    requested: num_bits,
                    position:  self.tell()
                });
            }
        }
        let mask = (1_u64 << num_bits) - 1;

        let value = self.buffer & mask;

        self.buffer >>= num_bits;

        self.bits_left -= num_bits;

        Ok(value as u32)
    }

    /// Read a single bit as a flag
    #[inline(always)]
    pub fn read_bit(&mut self) -> Result<bool, Vp8lDecodeErrors> {
        Ok(self.read_bits(1)? == 1)
    }

    /// Read up to 32 bits, splitting into 16 bit reads.
    ///
    /// Reading zero bits returns zero without touching the stream.
    pub fn read_bits_wide(&mut self, num_bits: u8) -> Result<u32, Vp8lDecodeErrors> {
        match num_bits {
            0 => Ok(0),
            1..=16 => self.read_bits(num_bits),
            17..=32 => {
                if self.bits_remaining() < usize::from(num_bits) {
                    return Err(Vp8lDecodeErrors::ExhaustedData {
                        requested: num_bits,
                        position:  self.tell()
                    });
                }
                let low = self.read_bits(16)?;
                let high = self.read_bits(num_bits - 16)?;

                Ok(low | (high << 16))
            }
            _ => Err(Vp8lDecodeErrors::InvalidBitCount(num_bits))
        }
    }

    /// Return true if at least one bit can still be read
    pub const fn has_data(&self) -> bool {
        self.bits_left > 0 || self.position < self.src.len()
    }

    /// Number of bits consumed since the reader's start
    pub const fn tell(&self) -> usize {
        (self.position - self.start) * 8 - self.bits_left as usize
    }

    /// Number of bits that can still be read
    pub const fn bits_remaining(&self) -> usize {
        (self.src.len() - self.position) * 8 + self.bits_left as usize
    }

    /// Absolute index of the byte holding the next unread bit
    pub const fn byte_position(&self) -> usize {
        self.start + self.tell() / 8
    }

    /// Offset of the next unread bit inside its byte, always in `0..8`
    pub const fn bit_offset(&self) -> u8 {
        (self.tell() % 8) as u8
    }
}
