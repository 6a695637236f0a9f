//! Fuzz target: `AirlockService::invoke`
//!
//! Splits the input into lines and replays them against the simulated
//! grid, each line half a second after the previous one.  The stage
//! index stays in range, and a device fault leaves the engine idle with
//! every door enabled.
//!
//! cargo fuzz run fuzz_service_invoke

#![no_main]

use std::time::{Duration, Instant};

use airlock::adapters::log_sink::LogEventSink;
use airlock::adapters::sim::{GridLayout, SimulatedGrid};
use airlock::scheduler::TickScheduler;
use airlock::{AirlockConfig, AirlockService, Error};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let mut grid = SimulatedGrid::from_layout(&GridLayout::demo());
    let mut ticks = TickScheduler::new(Duration::from_millis(166));
    let mut sink = LogEventSink::new();
    let mut app = AirlockService::new(AirlockConfig::default());
    let doors = ["Airlock Door [Outer]", "Airlock Door Inner"].map(|n| grid.find(n));
    let mut now = Instant::now();

    for line in text.lines().take(64) {
        now += Duration::from_millis(500);
        let result = app.invoke(line, now, &mut grid, &mut ticks, &mut sink);
        assert!((-1..=1).contains(&app.stage_index()));
        if let Err(Error::Device(_)) = result {
            assert!(app.is_idle());
            for door in doors.iter().flatten() {
                assert!(grid.door(*door).is_some_and(|d| d.enabled));
            }
        }
    }
});
