//! Traffic light controller library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod alarm;
pub mod app;
pub mod config;
pub mod debug_log;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod parser;
pub mod pins;

// Peripheral-facing modules; the ESP-IDF implementations are guarded by
// cfg attributes inside, with simulation fallbacks on host.
pub mod adapters;
pub mod drivers;
