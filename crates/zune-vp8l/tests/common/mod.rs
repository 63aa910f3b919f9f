/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! A tiny VP8L writer, just enough to build test streams
#![allow(dead_code)]

/// Order in which code length code lengths are stored
const CODE_LENGTH_CODE_ORDER: [usize; 19] = [
    17, 18, 0, 1, 2, 3, 4, 5, 16, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15
];

/// Least significant bit first writer
pub struct BitWriter {
    bytes:   Vec<u8>,
    current: u8,
    used:    u8
}

impl BitWriter {
    pub fn new() -> BitWriter {
        BitWriter {
            bytes:   Vec::new(),
            current: 0,
            used:    0
        }
    }

    pub fn write_bits(&mut self, value: u32, num_bits: u8) {
        for i in 0..num_bits {
            self.current |= (((value >> i) & 1) as u8) << self.used;
            self.used += 1;

            if self.used == 8 {
                self.bytes.push(self.current);
                self.current = 0;
                self.used = 0;
            }
        }
    }

    /// Huffman codes go out most significant bit first
    pub fn write_code(&mut self, code: u32, length: u8) {
        for i in (0..length).rev() {
            self.write_bits((code >> i) & 1, 1);
        }
    }

    pub fn finish(mut self) -> Vec<u8> {
        if self.used > 0 {
            self.bytes.push(self.current);
        }
        self.bytes
    }
}

/// Start a stream with the 5 byte header
pub fn header(width: usize, height: usize, alpha: bool) -> BitWriter {
    let mut writer = BitWriter::new();
    let packed = (width as u32 - 1) | ((height as u32 - 1) << 14) | (u32::from(alpha) << 28);

    writer.write_bits(0x2F, 8);
    writer.write_bits(packed & 0xffff, 16);
    writer.write_bits(packed >> 16, 16);
    writer
}

/// A canonical huffman code over `alphabet` symbols
pub struct Code {
    lengths: Vec<u8>,
    codes:   Vec<(u32, u8)>
}

impl Code {
    /// A complete code where only `used` symbols get codewords
    pub fn new(alphabet: usize, used: &[usize]) -> Code {
        let mut used = used.to_vec();
        used.sort_unstable();
        used.dedup();

        let mut lengths = vec![0_u8; alphabet];
        let n = used.len();

        if n == 1 {
            lengths[used[0]] = 1;
        } else {
            // `short` symbols one bit shorter than the rest keep the code complete
            let k = (usize::BITS - (n - 1).leading_zeros()) as u8;
            let short = (1 << k) - n;

            for (i, symbol) in used.iter().enumerate() {
                lengths[*symbol] = if i < short { k - 1 } else { k };
            }
        }
        let codes = canonical_codes(&lengths);

        Code { lengths, codes }
    }

    /// Store the code lengths, every length gets a 4 bit code length code
    pub fn write_lengths(&self, writer: &mut BitWriter) {
        writer.write_bits(1, 1);
        writer.write_bits(15, 4);

        for symbol in CODE_LENGTH_CODE_ORDER {
            writer.write_bits(if symbol < 16 { 4 } else { 0 }, 3);
        }

        for length in &self.lengths {
            writer.write_code(u32::from(*length), 4);
        }
    }

    pub fn put(&self, writer: &mut BitWriter, symbol: usize) {
        let (code, length) = self.codes[symbol];
        assert_ne!(length, 0, "symbol {symbol} has no code");
        writer.write_code(code, length);
    }
}

fn canonical_codes(lengths: &[u8]) -> Vec<(u32, u8)> {
    let mut len_counts = [0_u32; 16];

    for length in lengths {
        len_counts[usize::from(*length)] += 1;
    }
    len_counts[0] = 0;

    let mut next_code = [0_u32; 16];
    let mut code = 0;

    for len in 1..16 {
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

/// The five codes of a huffman group
pub struct Group {
    pub green:    Code,
    pub red:      Code,
    pub blue:     Code,
    pub alpha:    Option<Code>,
    pub distance: Code
}

fn channel(argb: u32, shift: u32) -> usize {
    ((argb >> shift) & 0xff) as usize
}

impl Group {
    /// A group able to code `pixels` as literals, plus any extra green
    /// symbols (length prefixes, cache indices) and distance symbols
    pub fn new(
        pixels: &[u32], with_alpha: bool, cache_size: usize, extra_green: &[usize],
        distances: &[usize]
    ) -> Group {
        let mut green: Vec<usize> = pixels.iter().map(|p| channel(*p, 8)).collect();
        green.extend_from_slice(extra_green);

        let red: Vec<usize> = pixels.iter().map(|p| channel(*p, 16)).collect();
        let blue: Vec<usize> = pixels.iter().map(|p| channel(*p, 0)).collect();
        let alpha: Vec<usize> = pixels.iter().map(|p| channel(*p, 24)).collect();

        let distances = if distances.is_empty() { &[0][..] } else { distances };

        Group {
            green:    Code::new(280 + cache_size, &green),
            red:      Code::new(256, &red),
            blue:     Code::new(256, &blue),
            alpha:    with_alpha.then(|| Code::new(256, &alpha)),
            distance: Code::new(40, distances)
        }
    }

    pub fn literals(pixels: &[u32], with_alpha: bool) -> Group {
        Group::new(pixels, with_alpha, 0, &[], &[])
    }

    pub fn write(&self, writer: &mut BitWriter) {
        self.green.write_lengths(writer);
        self.red.write_lengths(writer);
        self.blue.write_lengths(writer);
        if let Some(alpha) = &self.alpha {
            alpha.write_lengths(writer);
        }
        self.distance.write_lengths(writer);
    }

    pub fn put_literal(&self, writer: &mut BitWriter, argb: u32) {
        self.green.put(writer, channel(argb, 8));
        self.red.put(writer, channel(argb, 16));
        self.blue.put(writer, channel(argb, 0));
        if let Some(alpha) = &self.alpha {
            alpha.put(writer, channel(argb, 24));
        }
    }
}

/// A sub-image without color cache, every pixel a literal
pub fn write_sub_image(writer: &mut BitWriter, pixels: &[u32]) {
    writer.write_bits(0, 4);

    let group = Group::literals(pixels, true);
    group.write(writer);

    for pixel in pixels {
        group.put_literal(writer, *pixel);
    }
}

/// Main image without color cache or entropy image, every pixel a literal
pub fn write_main_image(writer: &mut BitWriter, pixels: &[u32], with_alpha: bool) {
    writer.write_bits(0, 4);
    writer.write_bits(0, 1);

    let group = Group::literals(pixels, with_alpha);
    group.write(writer);

    for pixel in pixels {
        group.put_literal(writer, *pixel);
    }
}

/// Packed ARGB to the RGBA bytes the decoder returns
pub fn to_rgba(pixels: &[u32]) -> Vec<u8> {
    pixels
        .iter()
        .flat_map(|p| {
            let [a, r, g, b] = p.to_be_bytes();
            [r, g, b, a]
        })
        .collect()
}
