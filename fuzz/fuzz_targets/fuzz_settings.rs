//! Fuzz target for settings.json parsing and validation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ra_config::{validate_settings, Settings};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(settings) = Settings::from_json(text) {
            let _ = validate_settings(&settings);
            let _ = settings.listen_addr();
        }
    }
});
