//! Port traits — the hexagonal boundary between the sequencer and the grid.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AirlockService (domain)
//! ```
//!
//! Driven adapters (block query, device operations, scheduler, event
//! sinks, config storage) implement these traits.  The
//! [`AirlockService`](super::service::AirlockService) consumes them via
//! generics, so the sequencer never touches a real grid directly.

use crate::config::AirlockConfig;
use crate::error::DeviceError;
use crate::group::{BlockGroup, BlockId};

// ───────────────────────────────────────────────────────────────
// Block query (driven adapter: grid → domain)
// ───────────────────────────────────────────────────────────────

/// Resolves a group name to the blocks it contains.
pub trait BlockQuery {
    /// `None` when no group carries this name.
    fn resolve_group(&self, name: &str) -> Option<BlockGroup>;
}

// ───────────────────────────────────────────────────────────────
// Device port (driven adapter: domain → doors and vents)
// ───────────────────────────────────────────────────────────────

/// Low-level door and vent operations.
///
/// Every call is fire-and-forget: `Ok` means the block accepted the
/// command, not that the door finished moving.
pub trait DevicePort {
    fn set_door_enabled(&mut self, door: BlockId, enabled: bool) -> Result<(), DeviceError>;

    fn open_door(&mut self, door: BlockId) -> Result<(), DeviceError>;

    fn close_door(&mut self, door: BlockId) -> Result<(), DeviceError>;

    /// `true` pumps air out of the chamber, `false` fills it.
    fn set_vent_depressurize(&mut self, vent: BlockId, on: bool) -> Result<(), DeviceError>;

    /// Whether the vent currently reports a pressurized chamber.
    fn vent_is_pressurized(&self, vent: BlockId) -> Result<bool, DeviceError>;
}

// ───────────────────────────────────────────────────────────────
// Scheduler port (driven adapter: domain → host scheduler)
// ───────────────────────────────────────────────────────────────

/// How often the host should invoke the engine with a resume tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateFrequency {
    /// Only invoke on commands.
    #[default]
    None,
    /// Invoke every ten simulation steps.
    Update10,
}

/// The engine never owns a clock; it asks the host to keep invoking it
/// or to stop.
pub trait SchedulerPort {
    fn set_update_frequency(&mut self, frequency: UpdateFrequency);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → status channel)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ← static config)
// ───────────────────────────────────────────────────────────────

/// Loads the static configuration.
///
/// Implementations MUST run [`AirlockConfig::validate`] and reject
/// invalid values with [`ConfigError::ValidationFailed`].
pub trait ConfigPort {
    fn load(&self) -> Result<AirlockConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config found at the configured location.
    NotFound,
    /// Stored config failed to deserialize.
    Corrupted(String),
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError(std::io::Error),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted(msg) => write!(f, "config corrupted: {}", msg),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
