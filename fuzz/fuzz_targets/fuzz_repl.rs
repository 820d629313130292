//! Fuzz the setcalc dispatcher
//!
//! The input is used as a console script and run through the full
//! interactive loop. It should never panic on any input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use setcalc::input::TextSource;
use setcalc::ReplState;

fuzz_target!(|data: &[u8]| {
    if let Ok(script) = std::str::from_utf8(data) {
        let console = Box::new(TextSource::from_text(script));
        if let Ok(mut state) = ReplState::new(console, std::io::sink(), 10) {
            // Failures are reported on the sink; only I/O errors come back
            let _ = state.run();
        }
    }
});
