//! Outbound application events.
//!
//! The [`AirlockService`](super::service::AirlockService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Each event
//! renders as one human-readable status line via `Display`.

use core::fmt;

use crate::fsm::StageId;

use super::commands::Verb;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A non-empty command was received.
    CommandReceived,

    /// The command could not be parsed or the group failed validation.
    CommandRejected(String),

    /// Demo mode flag changed.
    DemoModeChanged(bool),

    /// A sequence was set up and periodic resumption requested.
    SequenceStarted { verb: Verb, group: String },

    /// A stage began executing.
    StageEntered(StageId),

    /// Stage 1 finished; doors are in their final state.
    SequenceComplete,

    /// A stage failed; doors were re-enabled.
    SequenceAborted {
        stage: Option<StageId>,
        reason: String,
    },
}

impl fmt::Display for AppEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommandReceived => f.write_str("Starting sequence."),
            Self::CommandRejected(line) => f.write_str(line),
            Self::DemoModeChanged(on) => {
                let state = if *on { "enabled" } else { "disabled" };
                write!(f, "Demo mode {state}. Sequence complete.")
            }
            Self::SequenceStarted { verb, group } => write!(f, "{verb} \"{group}\"."),
            Self::StageEntered(stage) => write!(f, "Stage {}: {}.", stage.index(), stage.name()),
            Self::SequenceComplete => f.write_str("Sequence complete."),
            Self::SequenceAborted {
                stage: Some(StageId::ChangePressure),
                reason,
            } => write!(f, "Failed to change the pressure: {reason}"),
            Self::SequenceAborted { reason, .. } => write!(f, "Failed to cycle doors: {reason}"),
        }
    }
}
