//! Door and vent drivers, plus the effect applier that feeds them.

pub mod doors;
pub mod vent;

use crate::app::ports::DevicePort;
use crate::error::DeviceError;
use crate::fsm::context::Effect;

/// Apply queued effects in order, stopping at the first failure.
pub fn apply_effects(port: &mut impl DevicePort, effects: &[Effect]) -> Result<(), DeviceError> {
    for effect in effects {
        match effect {
            Effect::Doors { doors, action } => doors::perform_door_action(port, doors, *action)?,
            Effect::Vent { vent, pressurize } => vent::set_pressurizing(port, *vent, *pressurize)?,
        }
    }
    Ok(())
}
