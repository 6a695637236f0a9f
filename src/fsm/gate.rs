//! Wait gate: the sequencer's only notion of suspension.
//!
//! Holds at most one absolute deadline.  Every resume tick asks
//! [`WaitGate::is_waiting`] first; the deadline expires by being checked,
//! never by a timer callback.

use std::time::{Duration, Instant};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaitGate {
    deadline: Option<Instant>,
}

impl WaitGate {
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm a deadline `secs` from `now`.  Zero seconds arms nothing.
    pub fn arm(&mut self, now: Instant, secs: u32) -> Result<()> {
        if self.deadline.is_some() {
            return Err(Error::OperationAlreadyWaiting);
        }
        if secs > 0 {
            self.deadline = Some(now + Duration::from_secs(u64::from(secs)));
        }
        Ok(())
    }

    /// `true` while `now` is before the deadline.  Clears an expired one.
    pub fn is_waiting(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now < deadline => true,
            Some(_) => {
                self.deadline = None;
                false
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left before the deadline, zero if unarmed or passed.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline
            .map(|d| d.saturating_duration_since(now))
            .unwrap_or_default()
    }
}
