#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = caddis_cbor::decode::decode(data, &[&caddis_cbor::decode::DefaultDecoder]);
});
