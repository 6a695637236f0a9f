//! Concrete stage handlers and table builder.
//!
//! ```text
//!  IDLE ──[command]──▶ CHANGE PRESSURE ──[vent wait over]──▶ CYCLE DOORS ──▶ IDLE
//!   ▲                        │                                    │
//!   └────────[fault: teardown, doors re-enabled]──────────────────┘
//! ```
//!
//! Handlers only queue effects and arm the wait gate; the service applies
//! the effects once the handler returns.

use log::info;

use super::context::SequenceContext;
use super::{StageDescriptor, StageId, StageStep};
use crate::app::commands::Verb;
use crate::drivers::doors::DoorAction;
use crate::error::Result;
use crate::group::DoorSide;

/// Build the stage table.  Called once at startup.
pub fn build_stage_table() -> [StageDescriptor; StageId::COUNT] {
    [
        StageDescriptor {
            id: StageId::ChangePressure,
            name: "ChangePressure",
            run: change_pressure,
        },
        StageDescriptor {
            id: StageId::CycleDoors,
            name: "CycleDoors",
            run: cycle_doors,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Stage 0 — seal the chamber and switch the vent
// ═══════════════════════════════════════════════════════════════════════════

fn change_pressure(ctx: &mut SequenceContext) -> Result<StageStep> {
    // AtmoReady opens every door next, so leave them operable.
    if ctx.verb != Verb::AtmoReady {
        ctx.push_doors(DoorSide::All, DoorAction::Disable);
    }

    let pressurizing = ctx.is_pressurizing();
    ctx.push_vent(pressurizing);

    let wait = ctx.config.pressure_wait_secs(pressurizing);
    ctx.gate.arm(ctx.now, wait)?;

    info!(
        "CHANGE PRESSURE: {} for {}s",
        if pressurizing {
            "pressurizing"
        } else {
            "depressurizing"
        },
        wait
    );
    Ok(StageStep::Continue)
}

// ═══════════════════════════════════════════════════════════════════════════
//  Stage 1 — open the far side, then the verb's post-action
// ═══════════════════════════════════════════════════════════════════════════

fn cycle_doors(ctx: &mut SequenceContext) -> Result<StageStep> {
    let far_side = if ctx.is_pressurizing() {
        DoorSide::Inner
    } else {
        DoorSide::Outer
    };
    ctx.push_doors(far_side, DoorAction::Open);

    match ctx.verb {
        Verb::SpaceReady => ctx.push_doors(DoorSide::Outer, DoorAction::Close),
        Verb::AtmoReady => ctx.push_doors(DoorSide::All, DoorAction::Open),
        _ => {}
    }

    info!("CYCLE DOORS: opened {:?} doors for {}", far_side, ctx.verb);
    Ok(StageStep::Complete)
}
