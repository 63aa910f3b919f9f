/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
#![no_main]

use libfuzzer_sys::fuzz_target;
use zune_vp8l::zune_core::options::DecoderOptions;

fuzz_target!(|data: &[u8]| {
    // keep allocations bounded, the header allows up to 16384x16384
    let opts = DecoderOptions::default()
        .set_max_width(2048)
        .set_max_height(2048);

    let mut decoder = zune_vp8l::Vp8lDecoder::new_with_options(data, opts);
    let _ = decoder.decode();
});
