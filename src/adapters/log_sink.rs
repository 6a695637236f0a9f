//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing the engine's status lines to the
//! `log` facade.  Failures go out at `warn`, everything else at `info`.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink {
    emitted: u64,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events written so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        self.emitted += 1;
        match event {
            AppEvent::CommandRejected(_) | AppEvent::SequenceAborted { .. } => {
                warn!("STATUS | {}", event);
            }
            _ => info!("STATUS | {}", event),
        }
    }
}
