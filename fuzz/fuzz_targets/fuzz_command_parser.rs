//! Fuzz target: `parse_command`
//!
//! Arbitrary command lines, with and without a configured group.  The
//! parser must never panic, a blank line is always a resume tick, and
//! a configured group always wins over the second token.
//!
//! cargo fuzz run fuzz_command_parser

#![no_main]

use airlock::app::commands::{AppCommand, parse_command};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    for configured in [None, Some("Airlock")] {
        match parse_command(line, configured) {
            Ok(AppCommand::Sequence { verb, group }) => {
                assert!(!verb.is_demo_toggle());
                if configured.is_some() {
                    assert_eq!(group, "Airlock");
                }
            }
            Ok(AppCommand::Resume) => assert!(line.trim().is_empty()),
            Ok(AppCommand::SetDemoMode(_)) | Err(_) => {}
        }
    }
});
