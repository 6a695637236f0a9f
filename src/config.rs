//! Airlock configuration parameters
//!
//! Static, externally supplied settings.  Loaded from a JSON file by the
//! host binary; every field has a default so a partial file is fine.

use serde::{Deserialize, Serialize};

/// Core sequencer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirlockConfig {
    // --- Group ---
    /// Airlock group to operate on.  When `None`, the group name is the
    /// second command token.
    pub group_name: Option<String>,
    /// Name fragment marking a door as facing vacuum.  All other doors in
    /// the group are inner doors.
    pub outer_door_tag: String,

    // --- Waits ---
    /// Time allowed for doors to close before the pressure change (seconds)
    pub door_wait_secs: u32,
    /// Time allowed for the vent to fill the chamber (seconds)
    pub pressurize_wait_secs: u32,
    /// Time allowed for the vent to empty the chamber (seconds)
    pub depressurize_wait_secs: u32,

    // --- Timing ---
    /// Resume-tick cadence while a sequence is running (milliseconds)
    pub tick_interval_ms: u32,
}

impl Default for AirlockConfig {
    fn default() -> Self {
        Self {
            // Group
            group_name: None,
            outer_door_tag: "[Outer]".into(),

            // Waits
            door_wait_secs: 1,
            pressurize_wait_secs: 2,
            depressurize_wait_secs: 4,

            // Timing
            tick_interval_ms: 166, // ten 60 Hz simulation steps
        }
    }
}

impl AirlockConfig {
    /// Range-check the configuration.  Returns the offending field on failure.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.outer_door_tag.is_empty() {
            return Err("outer_door_tag must not be empty");
        }
        if self.group_name.as_deref().is_some_and(str::is_empty) {
            return Err("group_name must be omitted or non-empty");
        }
        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be > 0");
        }
        Ok(())
    }

    /// Wait after the vent has been switched, in seconds.
    pub fn pressure_wait_secs(&self, pressurizing: bool) -> u32 {
        if pressurizing {
            self.pressurize_wait_secs
        } else {
            self.depressurize_wait_secs
        }
    }
}
