//! Unified error types for the airlock sequencer.
//!
//! A single `Error` enum that every subsystem converts into, so the
//! service's teardown path handles every failure the same way.  Device
//! errors are `Copy`; command and validation errors carry the text that
//! ends up on the status channel.

use core::fmt;

use crate::group::BlockId;

/// Usage hint appended to every command-line error.
pub const USAGE: &str =
    "Expected: {Pressurize|Depressurize|AtmoReady|SpaceReady} [airlock_group_name]";

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible engine operation funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Bad token count, unterminated quote or unknown verb.  No state change.
    InvalidCommand(String),
    /// The resolved group is not a structurally valid airlock.  No state change.
    Validation(ValidationError),
    /// A second wait was armed while one is outstanding.
    OperationAlreadyWaiting,
    /// A door or vent operation failed during a sequence.
    Device(DeviceError),
}

impl Error {
    /// Human-readable line for the status channel.
    pub fn status_line(&self) -> String {
        match self {
            Self::InvalidCommand(reason) => with_usage(reason),
            Self::Validation(e) => with_usage(&e.to_string()),
            Self::OperationAlreadyWaiting => "Another wait is in progress".into(),
            Self::Device(e) => format!("Device fault: {e}"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCommand(reason) => write!(f, "invalid command: {reason}"),
            Self::Validation(e) => write!(f, "validation: {e}"),
            Self::OperationAlreadyWaiting => write!(f, "another wait is in progress"),
            Self::Device(e) => write!(f, "device: {e}"),
        }
    }
}

impl std::error::Error for Error {}

fn with_usage(prefix: &str) -> String {
    if prefix.ends_with(". ") {
        format!("{prefix}{USAGE}")
    } else {
        format!("{prefix}. {USAGE}")
    }
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The block query returned nothing for this name.
    GroupNotFound(String),
    /// No door carries the outer tag.
    NoOuterDoor { tag: String },
    /// Every door carries the outer tag.
    NoInnerDoor { tag: String },
    /// Vent count other than one.
    VentCount(usize),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GroupNotFound(name) => {
                write!(f, "No airlock group found by this name (\"{name}\")")
            }
            Self::NoOuterDoor { tag } => write!(
                f,
                "An airlock must have at least 1 door with the \"{tag}\" tag (no quotes)"
            ),
            Self::NoInnerDoor { tag } => write!(
                f,
                "An airlock must have at least 1 door without the \"{tag}\" tag (no quotes)"
            ),
            Self::VentCount(n) => {
                write!(f, "An airlock must have exactly one air vent (found {n})")
            }
        }
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

// ---------------------------------------------------------------------------
// Device errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// The block no longer exists on the grid.
    BlockMissing(BlockId),
    /// The block exists but cannot act (damaged, unpowered).
    NotFunctional(BlockId),
    /// The block exists but is not the kind the operation expects.
    WrongKind(BlockId),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlockMissing(id) => write!(f, "block {id} not found"),
            Self::NotFunctional(id) => write!(f, "block {id} not functional"),
            Self::WrongKind(id) => write!(f, "block {id} has the wrong type"),
        }
    }
}

impl From<DeviceError> for Error {
    fn from(e: DeviceError) -> Self {
        Self::Device(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
