//! Function-pointer stage machine.
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │  StageTable                                      │
//! │  ┌────────────────┬──────────────────────────┐   │
//! │  │ StageId        │ run                      │   │
//! │  ├────────────────┼──────────────────────────┤   │
//! │  │ ChangePressure │ fn(ctx) -> Result<Step>  │   │
//! │  │ CycleDoors     │ fn(ctx) -> Result<Step>  │   │
//! │  └────────────────┴──────────────────────────┘   │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! The sequencer holds no sequence state of its own; everything lives in
//! [`SequenceContext`].  Each resume tick:
//!
//! 1. If the wait gate is still armed, do nothing.
//! 2. If the current stage already ran, move to the next stage.
//! 3. Run the stage handler, which queues effects and may arm the gate.
//!
//! A stage therefore spans every tick from its execution until its wait
//! clears, and the next stage runs on the first tick after that.

pub mod context;
pub mod gate;
pub mod stages;

use std::time::Instant;

use context::SequenceContext;
use log::{debug, error, info};

use crate::error::Result;

// ---------------------------------------------------------------------------
// Stage identity
// ---------------------------------------------------------------------------

/// The two stages of every sequence.
/// Must stay in sync with the table built in [`stages::build_stage_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StageId {
    ChangePressure = 0,
    CycleDoors = 1,
}

impl StageId {
    pub const COUNT: usize = 2;

    pub fn from_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(Self::ChangePressure),
            1 => Some(Self::CycleDoors),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ChangePressure => "ChangePressure",
            Self::CycleDoors => "CycleDoors",
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }
}

// ---------------------------------------------------------------------------
// Stage descriptor
// ---------------------------------------------------------------------------

/// What a stage handler reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStep {
    /// Stay on this stage until the gate clears.
    Continue,
    /// The sequence is finished.
    Complete,
}

pub type StageFn = fn(&mut SequenceContext) -> Result<StageStep>;

pub struct StageDescriptor {
    pub id: StageId,
    pub name: &'static str,
    pub run: StageFn,
}

/// Result of one resume tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No sequence is active.
    Idle,
    /// The gate is armed and in the future.
    Waiting,
    /// A stage executed and the sequence continues.
    Ran(StageId),
    /// A stage executed and finished the sequence.
    Completed(StageId),
}

// ---------------------------------------------------------------------------
// Sequencer engine
// ---------------------------------------------------------------------------

pub struct Sequencer {
    table: [StageDescriptor; StageId::COUNT],
    /// Ticks spent blocked on the gate in the current stage.
    waiting_ticks: u64,
}

impl Sequencer {
    pub fn new(table: [StageDescriptor; StageId::COUNT]) -> Self {
        Self {
            table,
            waiting_ticks: 0,
        }
    }

    /// Point the context at stage 0.  Nothing runs until the next tick.
    pub fn begin(&mut self, ctx: &mut SequenceContext) {
        ctx.stage = Some(StageId::ChangePressure);
        ctx.stage_ran = false;
        self.waiting_ticks = 0;
    }

    /// Advance the sequence by one resume tick.
    ///
    /// Effects queued by the stage are left in `ctx.effects`.  On `Err`
    /// the caller must tear the sequence down.
    pub fn tick(&mut self, ctx: &mut SequenceContext, now: Instant) -> Result<TickOutcome> {
        ctx.now = now;
        let Some(mut stage) = ctx.stage else {
            return Ok(TickOutcome::Idle);
        };

        if ctx.gate.is_waiting(now) {
            self.waiting_ticks += 1;
            debug!(
                "{}: waiting, {:?} left",
                stage.name(),
                ctx.gate.remaining(now)
            );
            return Ok(TickOutcome::Waiting);
        }

        if ctx.stage_ran {
            // A completed sequence resumed without teardown: drop it rather
            // than report a second completion.
            let Some(next) = stage.next() else {
                error!("{}: resumed after the last stage, dropping", stage.name());
                ctx.stage = None;
                ctx.stage_ran = false;
                return Ok(TickOutcome::Idle);
            };
            info!(
                "Sequencer transition: {} -> {} after {} waiting ticks",
                self.table[stage.index()].name,
                self.table[next.index()].name,
                self.waiting_ticks
            );
            stage = next;
            ctx.stage = Some(next);
            ctx.stage_ran = false;
            self.waiting_ticks = 0;
        }

        ctx.stage_ran = true;
        match (self.table[stage.index()].run)(ctx)? {
            StageStep::Continue => Ok(TickOutcome::Ran(stage)),
            StageStep::Complete => Ok(TickOutcome::Completed(stage)),
        }
    }

    pub fn stage_name(&self, stage: StageId) -> &'static str {
        self.table[stage.index()].name
    }
}
