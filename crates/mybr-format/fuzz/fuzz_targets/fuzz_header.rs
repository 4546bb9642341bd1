//! Fuzz target for MYBR header and track-table parsing.
//!
//! Generates inputs that start with the MYBR magic bytes so coverage
//! reaches past the first check into header validation logic.

#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use mybr_format::{MybrReader, MYBR_MAGIC};

fuzz_target!(|data: &[u8]| {
    let mut input = MYBR_MAGIC.to_vec();
    input.extend_from_slice(data);

    // Must never panic, only return errors
    let _ = MybrReader::new(Cursor::new(input));
});
