#![no_main]

use buildtimer::event_log::scan_bytes;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes must never panic or point past the input
    let scan = scan_bytes(data);
    if let Some(corruption) = scan.corruption {
        assert!(corruption.offset < data.len());
        assert_eq!(corruption.index, scan.events.len());
    }
});
