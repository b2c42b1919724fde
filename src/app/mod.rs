//! Application core — the controller and its domain types.
//!
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod command;
pub mod context;
pub mod ports;
pub mod service;
