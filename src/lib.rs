//! Airlock sequencer library.
//!
//! Drives a pressure-cycling airlock (two sets of doors and one air vent)
//! through a two-stage sequence, one host invocation at a time.  The
//! engine is pure logic behind port traits; the `adapters` module carries
//! a simulated grid, a log sink and a JSON config loader for the console
//! binary and the integration tests.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod group;
pub mod safety;
pub mod scheduler;

pub use app::commands::{AppCommand, Verb};
pub use app::service::{AirlockService, Outcome};
pub use config::AirlockConfig;
pub use error::{DeviceError, Error, Result, ValidationError};
