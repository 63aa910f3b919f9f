/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Helpers for building bitstreams in unit tests
use alloc::vec;
use alloc::vec::Vec;

use crate::constants::{CODE_LENGTH_CODE_ORDER, MAX_CODE_LENGTH};

/// Least significant bit first writer, the mirror of `BitStreamReader`
pub(crate) struct BitWriter {
    bytes:   Vec<u8>,
    current: u8,
    used:    u8
}

impl BitWriter {
    pub(crate) fn new() -> BitWriter {
        BitWriter {
            bytes:   Vec::new(),
            current: 0,
            used:    0
        }
    }

    pub(crate) fn write_bits(&mut self, value: u32, num_bits: u8) {
        for i in 0..num_bits {
            let bit = ((value >> i) & 1) as u8;
            self.current |= bit << self.used;
            self.used += 1;

            if self.used == 8 {
                self.bytes.push(self.current);
                self.current = 0;
                self.used = 0;
            }
        }
    }

    /// Write a huffman code, most significant bit first
    pub(crate) fn write_code(&mut self, code: u32, length: u8) {
        for i in (0..length).rev() {
            self.write_bits((code >> i) & 1, 1);
        }
    }

    pub(crate) fn finish(mut self) -> Vec<u8> {
        if self.used > 0 {
            self.bytes.push(self.current);
        }
        self.bytes
    }
}

/// `(code, length)` for every symbol of a canonical code,
/// a single used symbol gets code `0` of length 1.
pub(crate) fn canonical_codes(lengths: &[u8]) -> Vec<(u32, u8)> {
    let mut len_counts = [0_u32; MAX_CODE_LENGTH + 1];

    for length in lengths {
        len_counts[usize::from(*length)] += 1;
    }
    len_counts[0] = 0;

    let mut next_code = [0_u32; MAX_CODE_LENGTH + 1];
    let mut code = 0;

    for len in 1..=MAX_CODE_LENGTH {
        code = (code + len_counts[len - 1]) << 1;
        next_code[len] = code;
    }
    let mut codes = vec![(0, 0); lengths.len()];

    for (symbol, length) in lengths.iter().enumerate() {
        if *length != 0 {
            codes[symbol] = (next_code[usize::from(*length)], *length);
            next_code[usize::from(*length)] += 1;
        }
    }
    codes
}

/// Write code lengths for a whole alphabet through the code length code,
/// lengths `0..=15` each get a 4 bit code equal to their value
pub(crate) fn write_tree(writer: &mut BitWriter, lengths: &[u8]) {
    writer.write_bits(1, 1);
    // all 19 code length code lengths
    writer.write_bits(15, 4);

    for symbol in CODE_LENGTH_CODE_ORDER {
        writer.write_bits(if symbol < 16 { 4 } else { 0 }, 3);
    }

    for length in lengths {
        writer.write_code(u32::from(*length), 4);
    }
}
