//! Door driver.
//!
//! Stateless façade over [`DevicePort`] door operations.
//!
//! ## Enable contract
//!
//! A disabled door cannot move, so every action first enables the door,
//! then opens or closes it, then leaves it enabled unless the action was
//! [`DoorAction::Disable`].  Nothing waits for the door to finish moving;
//! the configured door wait stands in for that.

use log::warn;

use crate::app::ports::DevicePort;
use crate::error::DeviceError;
use crate::group::BlockId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorAction {
    Open,
    Close,
    Enable,
    Disable,
}

/// Apply `action` to every door, stopping at the first failure.
pub fn perform_door_action(
    port: &mut impl DevicePort,
    doors: &[BlockId],
    action: DoorAction,
) -> Result<(), DeviceError> {
    for &door in doors {
        port.set_door_enabled(door, true)?;
        match action {
            DoorAction::Open => port.open_door(door)?,
            DoorAction::Close => port.close_door(door)?,
            DoorAction::Enable | DoorAction::Disable => {}
        }
        port.set_door_enabled(door, action != DoorAction::Disable)?;
    }
    Ok(())
}

pub fn set_doors_enabled(
    port: &mut impl DevicePort,
    doors: &[BlockId],
    enabled: bool,
) -> Result<(), DeviceError> {
    let action = if enabled {
        DoorAction::Enable
    } else {
        DoorAction::Disable
    };
    perform_door_action(port, doors, action)
}

pub fn set_doors_open(
    port: &mut impl DevicePort,
    doors: &[BlockId],
    open: bool,
) -> Result<(), DeviceError> {
    let action = if open {
        DoorAction::Open
    } else {
        DoorAction::Close
    };
    perform_door_action(port, doors, action)
}

/// Enable every door, carrying on past failures.  Returns how many
/// doors could not be enabled.
pub fn force_enable(port: &mut impl DevicePort, doors: &[BlockId]) -> usize {
    let mut failed = 0;
    for &door in doors {
        if let Err(e) = port.set_door_enabled(door, true) {
            warn!("Door {door}: could not re-enable ({e})");
            failed += 1;
        }
    }
    failed
}
