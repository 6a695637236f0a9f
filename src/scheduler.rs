//! Host tick scheduler.
//!
//! The engine asks for resume ticks through [`SchedulerPort`]; this is
//! the host-side implementation.  It only keeps a deadline: the main
//! loop polls it and invokes the engine with an empty argument each time
//! it reports due.
//!
//! ```text
//!   AirlockService ──set_update_frequency──▶ TickScheduler
//!         ▲                                       │
//!         └────────── invoke("") ◀──── poll(now) ─┘
//! ```

use std::time::{Duration, Instant};

use log::debug;

use crate::app::ports::{SchedulerPort, UpdateFrequency};

pub struct TickScheduler {
    frequency: UpdateFrequency,
    interval: Duration,
    next_due: Option<Instant>,
    fired: u64,
}

impl TickScheduler {
    /// `interval` is the period of one `Update10` tick.
    pub fn new(interval: Duration) -> Self {
        Self {
            frequency: UpdateFrequency::None,
            interval,
            next_due: None,
            fired: 0,
        }
    }

    /// `true` when a resume tick is due.  Re-arms for the next period.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.frequency == UpdateFrequency::None {
            self.next_due = None;
            return false;
        }
        let due = *self.next_due.get_or_insert(now + self.interval);
        if now < due {
            return false;
        }
        self.next_due = Some(now + self.interval);
        self.fired += 1;
        true
    }

    /// How long the host may sleep before the next tick; `None` while
    /// stopped.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        if self.frequency == UpdateFrequency::None {
            return None;
        }
        Some(
            self.next_due
                .map_or(self.interval, |due| due.saturating_duration_since(now)),
        )
    }

    pub fn frequency(&self) -> UpdateFrequency {
        self.frequency
    }

    /// Ticks delivered since startup.
    pub fn fired(&self) -> u64 {
        self.fired
    }
}

impl SchedulerPort for TickScheduler {
    fn set_update_frequency(&mut self, frequency: UpdateFrequency) {
        if frequency != self.frequency {
            debug!("Scheduler: {:?} -> {:?}", self.frequency, frequency);
        }
        if frequency == UpdateFrequency::None {
            self.next_due = None;
        }
        self.frequency = frequency;
    }
}
