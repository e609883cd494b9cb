#![no_main]

use libfuzzer_sys::fuzz_target;
use volley::config::types::ConfigFile;

fuzz_target!(|data: &[u8]| {
    let parsed: Option<ConfigFile> = serde_json::from_slice(data).ok();
    let applied = volley::fuzzing::apply_config_from_json(data);
    if applied.is_ok() {
        if let Some(config) = parsed {
            if let Some(timeout) = config.timeout.as_ref() {
                debug_assert!(timeout.to_duration().is_ok());
            }
        }
    }
});
