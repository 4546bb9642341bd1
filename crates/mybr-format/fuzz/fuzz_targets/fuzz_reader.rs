//! Fuzz target for the MYBR container reader.
//!
//! Feeds arbitrary bytes to `MybrReader::new` to find crashes, panics,
//! and hangs in the parser.

#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use mybr_format::MybrReader;

fuzz_target!(|data: &[u8]| {
    // Parsing must never panic, only return errors
    if let Ok(mut reader) = MybrReader::new(Cursor::new(data)) {
        // If the input parsed, every declared track must be readable
        let _ = reader.loop_metadata();
        for i in 0..reader.track_count() {
            let _ = reader.read_track_pcm(i);
        }
    }
});
