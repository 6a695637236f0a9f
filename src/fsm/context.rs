//! Sequencer state threaded through every stage handler.
//!
//! `SequenceContext` is the single process-wide state of the engine:
//! the active verb and group, the stage pointer, the wait gate and the
//! demo-mode flag.  Stage handlers never call the grid; they append
//! [`Effect`]s here and the service applies them through the ports.

use std::time::Instant;

use crate::app::commands::Verb;
use crate::app::ports::UpdateFrequency;
use crate::config::AirlockConfig;
use crate::drivers::doors::DoorAction;
use crate::group::{AirlockGroup, BlockId, DoorSide};

use super::StageId;
use super::gate::WaitGate;

// ---------------------------------------------------------------------------
// Effects (written by stage handlers; applied by the service)
// ---------------------------------------------------------------------------

/// A device operation requested by a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Doors {
        doors: Vec<BlockId>,
        action: DoorAction,
    },
    Vent {
        vent: BlockId,
        pressurize: bool,
    },
}

// ---------------------------------------------------------------------------
// SequenceContext
// ---------------------------------------------------------------------------

pub struct SequenceContext {
    // -- Sequence --
    /// Verb of the running sequence.  `SpaceReady` when idle.
    pub verb: Verb,
    /// Group of the running sequence.  Cleared by teardown.
    pub group: Option<AirlockGroup>,
    /// Current stage, `None` when idle.
    pub stage: Option<StageId>,
    /// The current stage has executed and is waiting to hand over.
    pub stage_ran: bool,

    // -- Timing --
    /// Pending deadline, if any.
    pub gate: WaitGate,
    /// Time of the invocation being processed.
    pub now: Instant,
    /// What the host scheduler was last asked for.
    pub update_frequency: UpdateFrequency,

    // -- Outputs --
    /// Device operations queued by the current stage.
    pub effects: Vec<Effect>,

    // -- Persistent across sequences --
    pub demo_mode: bool,
    pub config: AirlockConfig,
}

impl SequenceContext {
    pub fn new(config: AirlockConfig) -> Self {
        Self {
            verb: Verb::SpaceReady,
            group: None,
            stage: None,
            stage_ran: false,
            gate: WaitGate::new(),
            now: Instant::now(),
            update_frequency: UpdateFrequency::None,
            effects: Vec::new(),
            demo_mode: false,
            config,
        }
    }

    /// -1 when idle, otherwise the stage number.
    pub fn stage_index(&self) -> i8 {
        self.stage.map_or(-1, |s| s.index() as i8)
    }

    pub fn is_idle(&self) -> bool {
        self.stage.is_none()
    }

    pub fn is_pressurizing(&self) -> bool {
        self.verb.is_pressurizing()
    }

    /// Queue `action` for every door on `side` of the active group.
    /// No-op without a group.
    pub fn push_doors(&mut self, side: DoorSide, action: DoorAction) {
        if let Some(group) = &self.group {
            self.effects.push(Effect::Doors {
                doors: group.doors(side),
                action,
            });
        }
    }

    /// Queue a vent direction change for the active group.
    pub fn push_vent(&mut self, pressurize: bool) {
        if let Some(group) = &self.group {
            self.effects.push(Effect::Vent {
                vent: group.vent(),
                pressurize,
            });
        }
    }

    pub fn take_effects(&mut self) -> Vec<Effect> {
        core::mem::take(&mut self.effects)
    }
}
