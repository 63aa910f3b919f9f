/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Reading code lengths of a huffman code
//!
//! Lengths are either stored directly as a handful of 3 bit values,
//! or compressed with a huffman code over the 19 symbol code length
//! alphabet (the precode), where
//!
//! - `0..=15`: a literal code length
//! - `16`: repeat the previous non-zero length 3 to 6 times
//! - `17`: 3 to 10 zero lengths
//! - `18`: 11 to 138 zero lengths
use alloc::vec;
use alloc::vec::Vec;

use crate::bitstream::BitStreamReader;
use crate::constants::{CODE_LENGTH_CODE_ORDER, DEFAULT_CODE_LENGTH, NUM_CODE_LENGTH_CODES};
use crate::errors::Vp8lDecodeErrors;
use crate::huffman::HuffmanTable;

/// Read the code lengths of an alphabet with `alphabet_size` symbols
pub fn read_code_lengths(
    stream: &mut BitStreamReader, alphabet_size: usize
) -> Result<Vec<u8>, Vp8lDecodeErrors> {
    let mut code_lengths = vec![0_u8; alphabet_size];

    if !stream.read_bit()? {
        // lengths for the first symbols, stored directly
        let count = 4 + stream.read_bits(4)? as usize;

        if count > alphabet_size {
            return Err(Vp8lDecodeErrors::TooManyCodeLengths(count, alphabet_size));
        }
        for length in code_lengths.iter_mut().take(count) {
            *length = stream.read_bits(3)? as u8;
        }
        return Ok(code_lengths);
    }

    let num_precode_lens = 4 + stream.read_bits(4)? as usize;

    if num_precode_lens > NUM_CODE_LENGTH_CODES {
        return Err(Vp8lDecodeErrors::OversizedMetaAlphabet(num_precode_lens));
    }
    let mut precode_lens = [0_u8; NUM_CODE_LENGTH_CODES];

    for i in CODE_LENGTH_CODE_ORDER.iter().take(num_precode_lens) {
        precode_lens[*i] = stream.read_bits(3)? as u8;
    }
    let precode = HuffmanTable::build(&precode_lens)?;

    let mut prev_code_len = DEFAULT_CODE_LENGTH;
    let mut symbol = 0;

    while symbol < alphabet_size {
        let presym = precode.decode(stream)?;

        if presym < 16 {
            // explicit codeword length
            code_lengths[symbol] = presym as u8;
            symbol += 1;

            if presym != 0 {
                prev_code_len = presym as u8;
            }
            continue;
        }

        let (extra_bits, repeat_offset, repeat_value) = match presym {
            16 => (2, 3, prev_code_len),
            17 => (3, 3, 0),
            18 => (7, 11, 0),
            _ => return Err(Vp8lDecodeErrors::InvalidMetaSymbol(presym))
        };
        let repeat = repeat_offset + stream.read_bits(extra_bits)? as usize;
        let end = symbol + repeat;

        if end > alphabet_size {
            return Err(Vp8lDecodeErrors::CodeLengthRunOverflow(end, alphabet_size));
        }
        code_lengths[symbol..end].fill(repeat_value);

        symbol = end;
    }

    Ok(code_lengths)
}

/// Read code lengths and build the decode table for an alphabet
pub fn read_huffman_table(
    stream: &mut BitStreamReader, alphabet_size: usize
) -> Result<HuffmanTable, Vp8lDecodeErrors> {
    let code_lengths = read_code_lengths(stream, alphabet_size)?;

    HuffmanTable::build(&code_lengths)
}
