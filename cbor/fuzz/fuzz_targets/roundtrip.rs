#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // anything that parses must re-serialize, and the minimal re-encoding
    // must parse back to an identically-encoding item tree
    if let Ok((item, _)) = caddis_cbor::read::read(data) {
        let bytes = caddis_cbor::write::to_bytes(&item).unwrap();
        let (reparsed, len) = caddis_cbor::read::read(&bytes).unwrap();
        assert_eq!(len, bytes.len());
        assert_eq!(bytes, caddis_cbor::write::to_bytes(&reparsed).unwrap());
    }
});
