//! Application service — the hexagonal core.
//!
//! [`AirlockService`] owns the stage machine and the sequence context.
//! The host calls [`AirlockService::invoke`] once per command and once per
//! scheduler tick; all I/O flows through port traits passed in at the
//! call site, so the whole engine runs against mock adapters in tests.
//!
//! ```text
//!  BlockQuery ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                 │      AirlockService      │
//!  DevicePort ◀── │ Parser · Stages · Gate   │ ──▶ SchedulerPort
//!                 └──────────────────────────┘
//! ```

use std::time::Instant;

use log::{error, info, warn};

use crate::config::AirlockConfig;
use crate::drivers;
use crate::drivers::doors::DoorAction;
use crate::error::{Error, Result, ValidationError};
use crate::fsm::context::SequenceContext;
use crate::fsm::stages::build_stage_table;
use crate::fsm::{Sequencer, StageId, TickOutcome};
use crate::group::{AirlockGroup, DoorSide};
use crate::safety;

use super::commands::{AppCommand, Verb, parse_command};
use super::events::AppEvent;
use super::ports::{BlockQuery, DevicePort, EventSink, SchedulerPort, UpdateFrequency};

/// What one invocation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Tick with no active sequence.
    Idle,
    /// Tick blocked on the wait gate.
    Waiting,
    /// Tick executed a stage; the sequence continues.
    StageRan(StageId),
    /// Tick executed the last stage.
    Complete,
    /// A sequence was set up.  `pre_closed` if doors were closed first.
    Started { verb: Verb, pre_closed: bool },
    /// Demo mode was set.
    DemoMode(bool),
}

// ───────────────────────────────────────────────────────────────
// AirlockService
// ───────────────────────────────────────────────────────────────

pub struct AirlockService {
    sequencer: Sequencer,
    ctx: SequenceContext,
    invocations: u64,
}

impl AirlockService {
    pub fn new(config: AirlockConfig) -> Self {
        Self {
            sequencer: Sequencer::new(build_stage_table()),
            ctx: SequenceContext::new(config),
            invocations: 0,
        }
    }

    // ── Entry point ───────────────────────────────────────────

    /// Handle one host invocation.  Empty `argument` is a resume tick.
    pub fn invoke(
        &mut self,
        argument: &str,
        now: Instant,
        hw: &mut (impl BlockQuery + DevicePort),
        scheduler: &mut impl SchedulerPort,
        sink: &mut impl EventSink,
    ) -> Result<Outcome> {
        self.invocations += 1;
        let parsed = parse_command(argument, self.ctx.config.group_name.as_deref());
        match parsed {
            Ok(AppCommand::Resume) => self.tick(now, hw, scheduler, sink),
            Ok(cmd) => self.handle_command(cmd, now, hw, scheduler, sink),
            Err(e) => {
                sink.emit(&AppEvent::CommandReceived);
                self.reject(e, sink)
            }
        }
    }

    // ── Commands ──────────────────────────────────────────────

    /// Process a fresh command.  A valid sequence command supersedes any
    /// running sequence; parse and validation failures change nothing.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        now: Instant,
        hw: &mut (impl BlockQuery + DevicePort),
        scheduler: &mut impl SchedulerPort,
        sink: &mut impl EventSink,
    ) -> Result<Outcome> {
        let (verb, group_name) = match cmd {
            AppCommand::Resume => return self.tick(now, hw, scheduler, sink),
            AppCommand::SetDemoMode(on) => {
                sink.emit(&AppEvent::CommandReceived);
                if !self.ctx.is_idle() {
                    warn!("Demo toggle interrupts the running sequence");
                    self.teardown(false, hw, scheduler);
                }
                self.ctx.demo_mode = on;
                info!("Demo mode {}", if on { "enabled" } else { "disabled" });
                sink.emit(&AppEvent::DemoModeChanged(on));
                return Ok(Outcome::DemoMode(on));
            }
            AppCommand::Sequence { verb, group } => (verb, group),
        };
        sink.emit(&AppEvent::CommandReceived);

        let airlock = match self.resolve(&*hw, &group_name) {
            Ok(airlock) => airlock,
            Err(e) => return self.reject(e.into(), sink),
        };

        self.teardown(false, hw, scheduler);

        info!("Starting {} on '{}'", verb, airlock.name());
        self.ctx.verb = verb;
        self.ctx.group = Some(airlock);

        let pre_closed = match self.pre_close(now, hw) {
            Ok(closed) => closed,
            Err(e) => return self.fail(None, e, hw, scheduler, sink),
        };

        self.sequencer.begin(&mut self.ctx);
        self.request(UpdateFrequency::Update10, scheduler);
        sink.emit(&AppEvent::SequenceStarted {
            verb,
            group: group_name,
        });
        Ok(Outcome::Started { verb, pre_closed })
    }

    // ── Resume ticks ──────────────────────────────────────────

    /// Advance the running sequence if its wait has cleared.
    pub fn tick(
        &mut self,
        now: Instant,
        hw: &mut impl DevicePort,
        scheduler: &mut impl SchedulerPort,
        sink: &mut impl EventSink,
    ) -> Result<Outcome> {
        let outcome = match self.sequencer.tick(&mut self.ctx, now) {
            Ok(outcome) => outcome,
            Err(e) => {
                let stage = self.ctx.stage;
                return self.fail(stage, e, hw, scheduler, sink);
            }
        };

        match outcome {
            TickOutcome::Idle => {
                self.request(UpdateFrequency::None, scheduler);
                Ok(Outcome::Idle)
            }
            TickOutcome::Waiting => Ok(Outcome::Waiting),
            TickOutcome::Ran(stage) => {
                sink.emit(&AppEvent::StageEntered(stage));
                self.apply(stage, hw, scheduler, sink)?;
                Ok(Outcome::StageRan(stage))
            }
            TickOutcome::Completed(stage) => {
                sink.emit(&AppEvent::StageEntered(stage));
                self.apply(stage, hw, scheduler, sink)?;
                sink.emit(&AppEvent::SequenceComplete);
                self.teardown(true, hw, scheduler);
                Ok(Outcome::Complete)
            }
        }
    }

    // ── Teardown ──────────────────────────────────────────────

    /// Reset to idle.  On `success == false` every door of the last
    /// known group is enabled.  Safe to call at any time.
    pub fn teardown(
        &mut self,
        success: bool,
        hw: &mut impl DevicePort,
        scheduler: &mut impl SchedulerPort,
    ) {
        safety::teardown(&mut self.ctx, hw, success);
        scheduler.set_update_frequency(self.ctx.update_frequency);
    }

    // ── Queries ───────────────────────────────────────────────

    /// -1 when idle, else the current stage number.
    pub fn stage_index(&self) -> i8 {
        self.ctx.stage_index()
    }

    pub fn is_idle(&self) -> bool {
        self.ctx.is_idle()
    }

    pub fn verb(&self) -> Verb {
        self.ctx.verb
    }

    pub fn group_name(&self) -> Option<&str> {
        self.ctx.group.as_ref().map(AirlockGroup::name)
    }

    pub fn demo_mode(&self) -> bool {
        self.ctx.demo_mode
    }

    /// `true` while a deadline is armed (expired or not).
    pub fn is_wait_armed(&self) -> bool {
        self.ctx.gate.is_armed()
    }

    pub fn update_frequency(&self) -> UpdateFrequency {
        self.ctx.update_frequency
    }

    pub fn config(&self) -> &AirlockConfig {
        &self.ctx.config
    }

    /// Total invocations handled since startup.
    pub fn invocations(&self) -> u64 {
        self.invocations
    }

    // ── Internal ──────────────────────────────────────────────

    fn resolve(
        &self,
        hw: &impl BlockQuery,
        group_name: &str,
    ) -> core::result::Result<AirlockGroup, ValidationError> {
        let group = hw
            .resolve_group(group_name)
            .ok_or_else(|| ValidationError::GroupNotFound(group_name.to_owned()))?;
        AirlockGroup::validate(&group, &self.ctx.config.outer_door_tag)
    }

    /// Close every door and arm the door wait unless the chamber already
    /// matches the verb.  AtmoReady never pre-closes.
    fn pre_close(&mut self, now: Instant, hw: &mut impl DevicePort) -> Result<bool> {
        if self.ctx.verb == Verb::AtmoReady || self.in_target_state(&*hw)? {
            return Ok(false);
        }

        self.ctx.push_doors(DoorSide::All, DoorAction::Close);
        let effects = self.ctx.take_effects();
        drivers::apply_effects(hw, &effects)?;
        self.ctx.gate.arm(now, self.ctx.config.door_wait_secs)?;
        info!(
            "Pre-close: doors closing, stage 0 deferred {}s",
            self.ctx.config.door_wait_secs
        );
        Ok(true)
    }

    fn in_target_state(&self, hw: &impl DevicePort) -> Result<bool> {
        if self.ctx.demo_mode {
            return Ok(false);
        }
        let Some(group) = &self.ctx.group else {
            return Ok(false);
        };
        Ok(drivers::vent::in_target_state(
            hw,
            group.vent(),
            self.ctx.is_pressurizing(),
        )?)
    }

    /// Apply the effects queued by `stage`; tear down on failure.
    fn apply(
        &mut self,
        stage: StageId,
        hw: &mut impl DevicePort,
        scheduler: &mut impl SchedulerPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let effects = self.ctx.take_effects();
        match drivers::apply_effects(hw, &effects) {
            Ok(()) => Ok(()),
            Err(e) => self.fail(Some(stage), e.into(), hw, scheduler, sink),
        }
    }

    /// Teardown after a fault, then hand the fault back.
    fn fail<T>(
        &mut self,
        stage: Option<StageId>,
        e: Error,
        hw: &mut impl DevicePort,
        scheduler: &mut impl SchedulerPort,
        sink: &mut impl EventSink,
    ) -> Result<T> {
        error!(
            "Sequence fault in {}: {}",
            stage.map_or("setup", StageId::name),
            e
        );
        self.teardown(false, hw, scheduler);
        let reason = match &e {
            Error::Device(d) => d.to_string(),
            other => other.to_string(),
        };
        sink.emit(&AppEvent::SequenceAborted { stage, reason });
        Err(e)
    }

    fn reject<T>(&self, e: Error, sink: &mut impl EventSink) -> Result<T> {
        warn!("Command rejected: {}", e);
        sink.emit(&AppEvent::CommandRejected(e.status_line()));
        Err(e)
    }

    fn request(&mut self, frequency: UpdateFrequency, scheduler: &mut impl SchedulerPort) {
        self.ctx.update_frequency = frequency;
        scheduler.set_update_frequency(frequency);
    }
}
