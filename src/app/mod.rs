//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the behaviour of the DockLambda companion: state
//! machine orchestration, sensor polling, window placement, animation and
//! settings.  All interaction with the desktop happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without a window server.

pub mod animator;
pub mod commands;
pub mod drag;
pub mod events;
pub mod ports;
pub mod service;
pub mod settings;
pub mod sprites;
