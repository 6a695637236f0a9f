//! Teardown: the one safety reset of the engine.
//!
//! Every exit from a sequence goes through [`teardown`]: completion,
//! a stage fault, a failed pre-close, or a new command (demo toggles
//! included) superseding the running one.
//!
//! ## Invariant
//!
//! A fault or interruption never leaves a door disabled.  On any
//! non-success exit every door of the last known group is enabled again.
//! On success the doors stay as stage 1 left them (the near side of a
//! pressurize cycle stays disabled on purpose).
//!
//! Teardown is idempotent: with no group remembered it only resets the
//! scalar state and asks the scheduler to stop.

use log::{info, warn};

use crate::app::commands::Verb;
use crate::app::ports::{DevicePort, UpdateFrequency};
use crate::drivers::doors;
use crate::fsm::context::SequenceContext;
use crate::group::DoorSide;

/// Reset the sequence state; re-enable doors unless `success`.
///
/// The caller forwards `ctx.update_frequency` to its scheduler.
/// Returns the number of doors that could not be re-enabled.
pub fn teardown(ctx: &mut SequenceContext, port: &mut impl DevicePort, success: bool) -> usize {
    let group = ctx.group.take();
    let was_active = ctx.stage.is_some();

    ctx.verb = Verb::SpaceReady;
    ctx.stage = None;
    ctx.stage_ran = false;
    ctx.gate.clear();
    ctx.effects.clear();
    ctx.update_frequency = UpdateFrequency::None;

    let Some(group) = group else {
        return 0;
    };

    if success {
        info!("TEARDOWN: '{}' finished, doors left as cycled", group.name());
        return 0;
    }

    if was_active {
        warn!("TEARDOWN: '{}' interrupted, re-enabling all doors", group.name());
    }
    let failed = doors::force_enable(port, &group.doors(DoorSide::All));
    if failed > 0 {
        warn!(
            "TEARDOWN: {} door(s) in '{}' could not be re-enabled",
            failed,
            group.name()
        );
    }
    failed
}
