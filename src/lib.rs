//! DockLambda companion library.
//!
//! Exposes the domain core and the host adapters for the binary and for
//! integration testing.  Nothing here needs a window server: every
//! desktop surface sits behind a port trait in [`app::ports`].

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod fsm;
pub mod geometry;
pub mod placement;
pub mod rng;
pub mod scheduler;
pub mod sensors;

pub mod adapters;
