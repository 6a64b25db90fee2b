// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

#![no_main]

use gitsift_git::stats::{parse_numstat, parse_numstat_z};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        let _ = parse_numstat(raw);
        let _ = parse_numstat_z(raw);
    }
});
