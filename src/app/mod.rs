//! Application core — sequencing logic, zero direct I/O.
//!
//! This module contains the rules for operating an airlock: command
//! parsing, stage orchestration and teardown.  All interaction with the
//! grid happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without a real structure.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
