/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// First byte of every VP8L stream
pub const VP8L_SIGNATURE: u8 = 0x2F;

/// Size of the signature + packed dimensions header
pub const VP8L_HEADER_SIZE: usize = 5;

/// Longest huffman code allowed in the stream
pub const MAX_CODE_LENGTH: usize = 15;

/// Number of symbols in the code length alphabet
pub const NUM_CODE_LENGTH_CODES: usize = 19;

/// Order in which code length code lengths are stored
pub static CODE_LENGTH_CODE_ORDER: [usize; NUM_CODE_LENGTH_CODES] = [
    17, 18, 0, 1, 2, 3, 4, 5, 16, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15
];

/// Repeat length used by code length symbol 16 before any
/// non-zero length was seen
pub const DEFAULT_CODE_LENGTH: u8 = 8;

/// Symbols for literal values of a single channel
pub const NUM_LITERAL_CODES: usize = 256;

/// Prefix symbols for backward reference lengths
pub const NUM_LENGTH_CODES: usize = 24;

/// Prefix symbols for backward reference distances
pub const NUM_DISTANCE_CODES: usize = 40;

/// Largest color cache, in bits
pub const MAX_COLOR_CACHE_BITS: u8 = 11;

/// Multiplier for the color cache hash
pub const COLOR_CACHE_MULTIPLIER: u32 = 0x1e35_a7bd;

/// Limit on backward reference distances
pub const MAX_BACKWARD_DISTANCE: usize = 32768;

/// Limit on the number of huffman groups an entropy image may select,
/// each group holds five decode tables
pub const MAX_HUFFMAN_GROUPS: usize = 4096;

/// Largest number of entries a palette may hold
pub const MAX_PALETTE_SIZE: usize = 256;

/// Opaque black in ARGB
pub const ARGB_BLACK: u32 = 0xff00_0000;

/// Number of distances with a short 2d plane code
pub const NUM_PLANE_CODES: usize = 120;

/// `(dx, dy)` offsets for the short plane codes,
/// distance is `dx + dy * width`
#[rustfmt::skip]
pub static PLANE_CODE_OFFSETS: [(i8, i8); NUM_PLANE_CODES] = [
    (0, 1),  (1, 0),  (1, 1),  (-1, 1), (0, 2),  (2, 0),  (1, 2),  (-1, 2),
    (2, 1),  (-2, 1), (2, 2),  (-2, 2), (0, 3),  (3, 0),  (1, 3),  (-1, 3),
    (3, 1),  (-3, 1), (2, 3),  (-2, 3), (3, 2),  (-3, 2), (0, 4),  (4, 0),
    (1, 4),  (-1, 4), (4, 1),  (-4, 1), (3, 3),  (-3, 3), (2, 4),  (-2, 4),
    (4, 2),  (-4, 2), (0, 5),  (3, 4),  (-3, 4), (4, 3),  (-4, 3), (5, 0),
    (1, 5),  (-1, 5), (5, 1),  (-5, 1), (2, 5),  (-2, 5), (5, 2),  (-5, 2),
    (4, 4),  (-4, 4), (3, 5),  (-3, 5), (5, 3),  (-5, 3), (0, 6),  (6, 0),
    (1, 6),  (-1, 6), (6, 1),  (-6, 1), (2, 6),  (-2, 6), (6, 2),  (-6, 2),
    (4, 5),  (-4, 5), (5, 4),  (-5, 4), (3, 6),  (-3, 6), (6, 3),  (-6, 3),
    (0, 7),  (7, 0),  (1, 7),  (-1, 7), (5, 5),  (-5, 5), (7, 1),  (-7, 1),
    (4, 6),  (-4, 6), (6, 4),  (-6, 4), (2, 7),  (-2, 7), (7, 2),  (-7, 2),
    (3, 7),  (-3, 7), (7, 3),  (-7, 3), (5, 6),  (-5, 6), (6, 5),  (-6, 5),
    (8, 0),  (4, 7),  (-4, 7), (7, 4),  (-7, 4), (8, 1),  (8, 2),  (6, 6),
    (-6, 6), (8, 3),  (5, 7),  (-5, 7), (7, 5),  (-7, 5), (8, 4),  (6, 7),
    (-6, 7), (7, 6),  (-7, 6), (8, 5),  (7, 7),  (-7, 7), (8, 6),  (8, 7)
];
