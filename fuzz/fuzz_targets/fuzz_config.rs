//! Fuzz target: `SystemConfig::from_json`
//!
//! Any document that parses must also pass validation on its own, and
//! must survive a serialise/parse round trip unchanged.
//!
//! cargo fuzz run fuzz_config

#![no_main]

use libfuzzer_sys::fuzz_target;
use tiltmorse::config::SystemConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = SystemConfig::from_json(text) {
        assert!(config.validate().is_ok());
        let json = serde_json::to_string(&config).expect("serialise");
        assert_eq!(SystemConfig::from_json(&json), Ok(config));
    }
});
