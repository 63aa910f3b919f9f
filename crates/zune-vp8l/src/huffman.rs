/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Canonical huffman decoding
//!
//! Codes are stored in a single flat table with `2^max_code_length` slots.
//! Since the stream is read least significant bit first, each canonical
//! code is bit reversed and written into every slot whose low `length`
//! bits equal the reversed code, i.e every `2^length` slots.
//!
//! Each slot also records the length of the code that filled it, which
//! lets [`HuffmanTable::decode`] resolve a symbol one bit at a time:
//! after reading `k` bits a symbol is found when the slot addressed by
//! those bits was filled by a code of exactly `k` bits.
use alloc::vec;
use alloc::vec::Vec;

use crate::bitstream::BitStreamReader;
use crate::constants::MAX_CODE_LENGTH;
use crate::errors::Vp8lDecodeErrors;

/// A decode table for a canonical huffman code
#[derive(Clone, Debug)]
pub struct HuffmanTable {
    symbols:         Vec<u16>,
    lengths:         Vec<u8>,
    max_code_length: u8,
    num_symbols:     usize
}

impl HuffmanTable {
    /// Build a decode table from one code length per symbol,
    /// a length of zero marks an unused symbol.
    ///
    /// # Errors
    /// - A length above 15
    /// - No used symbol
    /// - Lengths whose Kraft sum is above 1 (over-subscribed) or
    ///   below 1 (under-subscribed). The only incomplete code
    ///   accepted is a single symbol with a length of 1.
    pub fn build(code_lengths: &[u8]) -> Result<HuffmanTable, Vp8lDecodeErrors> {
        let mut len_counts = [0_u32; MAX_CODE_LENGTH + 1];

        // count how many codewords have each length, including 0.
        for (symbol, length) in code_lengths.iter().enumerate() {
            if usize::from(*length) > MAX_CODE_LENGTH {
                return Err(Vp8lDecodeErrors::CodeLengthTooLarge(symbol, *length));
            }
            len_counts[usize::from(*length)] += 1;
        }
        len_counts[0] = 0;

        let num_symbols = len_counts.iter().sum::<u32>() as usize;

        if num_symbols == 0 {
            return Err(Vp8lDecodeErrors::EmptyAlphabet);
        }

        let max_code_length = (1..=MAX_CODE_LENGTH)
            .rev()
            .find(|len| len_counts[*len] != 0)
            .unwrap_or(1);

        // A codeword of length `n` uses `2^(15-n)` out of the `2^15` units
        // of codespace, a complete code uses every unit.
        let codespace_used: u32 = (1..=MAX_CODE_LENGTH)
            .map(|len| len_counts[len] << (MAX_CODE_LENGTH - len))
            .sum();

        if codespace_used > 1 << MAX_CODE_LENGTH {
            return Err(Vp8lDecodeErrors::OverSubscribedTree);
        }
        if codespace_used < 1 << MAX_CODE_LENGTH {
            if num_symbols == 1 && len_counts[1] == 1 {
                // the one symbol decodes from any bit
                let symbol = code_lengths
                    .iter()
                    .position(|len| *len != 0)
                    .unwrap_or(0);

                return Ok(HuffmanTable::single_symbol(symbol as u16));
            }
            return Err(Vp8lDecodeErrors::UnderSubscribedTree);
        }

        // first canonical code of each length
        let mut next_code = [0_u32; MAX_CODE_LENGTH + 1];
        let mut code = 0;

        for len in 1..=MAX_CODE_LENGTH {
            code = (code + len_counts[len - 1]) << 1;
            next_code[len] = code;
        }

        let table_size = 1_usize << max_code_length;

        let mut symbols = vec![0_u16; table_size];
        let mut lengths = vec![0_u8; table_size];

        for (symbol, length) in code_lengths.iter().enumerate() {
            if *length == 0 {
                continue;
            }
            let len = usize::from(*length);

            let codeword = next_code[len];
            next_code[len] += 1;

            // first bit read is the codeword's most significant bit
            let reversed = (codeword.reverse_bits() >> (32 - len)) as usize;

            for slot in (reversed..table_size).step_by(1 << len) {
                symbols[slot] = symbol as u16;
                lengths[slot] = *length;
            }
        }

        Ok(HuffmanTable {
            symbols,
            lengths,
            max_code_length: max_code_length as u8,
            num_symbols
        })
    }

    fn single_symbol(symbol: u16) -> HuffmanTable {
        HuffmanTable {
            symbols:         vec![symbol; 2],
            lengths:         vec![1; 2],
            max_code_length: 1,
            num_symbols:     1
        }
    }

    /// Decode one symbol from the stream
    ///
    /// # Errors
    /// - When the stream runs out of bits
    /// - When `max_code_length` bits were read without
    ///   matching a code, the error carries the bits read
    pub fn decode(&self, stream: &mut BitStreamReader) -> Result<u16, Vp8lDecodeErrors> {
        let mut bits = 0_u32;

        for length in 1..=self.max_code_length {
            bits |= stream.read_bits(1)? << (length - 1);

            let slot = bits as usize;

            if self.lengths[slot] == length {
                return Ok(self.symbols[slot]);
            }
        }
        Err(Vp8lDecodeErrors::InvalidHuffmanCode {
            bits,
            length: self.max_code_length
        })
    }

    /// Length of the longest code in the table
    pub const fn max_code_length(&self) -> u8 {
        self.max_code_length
    }

    /// Number of symbols with a code
    pub const fn num_symbols(&self) -> usize {
        self.num_symbols
    }

    /// Whether the table holds a single symbol
    pub const fn is_single_symbol(&self) -> bool {
        self.num_symbols == 1
    }
}
