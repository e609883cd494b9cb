#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(outcome) = volley::fuzzing::parse_http1_request_input(data) {
        if let Some(status) = outcome {
            debug_assert!(status == 400 || status == 413);
        }
    }
});
