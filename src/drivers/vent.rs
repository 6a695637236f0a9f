//! Air vent driver.
//!
//! One vent per airlock.  Direction only; the vent decides how fast the
//! chamber fills or empties.

use crate::app::ports::DevicePort;
use crate::error::DeviceError;
use crate::group::BlockId;

/// Point the vent at filling (`true`) or emptying (`false`) the chamber.
pub fn set_pressurizing(
    port: &mut impl DevicePort,
    vent: BlockId,
    pressurizing: bool,
) -> Result<(), DeviceError> {
    port.set_vent_depressurize(vent, !pressurizing)
}

/// Whether the chamber already matches the requested direction.
pub fn in_target_state(
    port: &impl DevicePort,
    vent: BlockId,
    pressurizing: bool,
) -> Result<bool, DeviceError> {
    Ok(port.vent_is_pressurized(vent)? == pressurizing)
}
