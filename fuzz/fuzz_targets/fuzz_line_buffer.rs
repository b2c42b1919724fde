//! Fuzz target: `LineBuffer::push`
//!
//! Drives arbitrary byte streams through the serial line accumulator and
//! asserts it never exceeds its capacity or yields a line containing a
//! terminator.
//!
//! cargo fuzz run fuzz_line_buffer

#![no_main]

use libfuzzer_sys::fuzz_target;
use trafficlight::config::LINE_BUFFER_LEN;
use trafficlight::parser::{LineBuffer, LineEvent};

fuzz_target!(|data: &[u8]| {
    let mut buffer = LineBuffer::<LINE_BUFFER_LEN>::new();
    for &byte in data {
        if let Some(LineEvent::Line(line)) = buffer.push(byte) {
            assert!(!line.is_empty());
            assert!(!line.bytes().any(|b| b == b'\r' || b == b'\n'));
        }
        assert!(buffer.pending() <= LINE_BUFFER_LEN);
    }
});
