//! Fuzz the count-prefixed set reader
//!
//! Malformed counts and elements must come back as parse errors.

#![no_main]

use libfuzzer_sys::fuzz_target;
use setcalc::input::TextSource;
use setcalc::Set;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let mut source = TextSource::from_text(input);
        while let Ok(set) = Set::read(&mut source) {
            let _ = set.product(&set);
        }
    }
});
