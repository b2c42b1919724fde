//! Fuzz target: `parse_line`
//!
//! Feeds arbitrary UTF-8 text to the serial command parser and checks
//! that accepted alarms stay within a day and that accepted commands
//! name a real lane.
//!
//! cargo fuzz run fuzz_line_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use trafficlight::config::ControllerConfig;
use trafficlight::parser::{LineCommand, parse_line};

fuzz_target!(|data: &[u8]| {
    let Ok(line) = core::str::from_utf8(data) else {
        return;
    };
    let config = ControllerConfig::default();
    match parse_line(line, &config) {
        Ok(Some(LineCommand::SetAlarm { seconds, .. })) => {
            assert!(seconds > 0, "zero delay accepted");
            assert!(seconds < 24 * 3600, "delay beyond one day");
        }
        Ok(Some(LineCommand::Immediate(command))) => {
            assert!(!command.color.lamps().is_empty());
        }
        Ok(None) => assert!(line.trim().is_empty(), "non-blank line ignored"),
        Err(_) => {}
    }
});
