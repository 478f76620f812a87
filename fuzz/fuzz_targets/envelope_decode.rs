#![no_main]

use ec_crypto::{Decoded, EnvelopeCodec};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding must never panic, and anything it cannot open comes back byte for byte.
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    let codec = EnvelopeCodec::upstream();
    if let Decoded::Raw(passed) = codec.decode(raw) {
        assert_eq!(passed, raw, "pass-through must not alter the body");
    }
});
