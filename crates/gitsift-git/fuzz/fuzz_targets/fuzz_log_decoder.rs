// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

#![no_main]

use gitsift_git::decode::decode_log_output;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        // Either every fragment decodes or the whole batch is rejected.
        if let Ok(commits) = decode_log_output(raw, "/fuzz") {
            assert!(commits.iter().all(|c| !c.hash().is_empty()));
        }
    }
});
