//! Sensor subsystem — the polled inputs that shape the pet's behaviour.
//!
//! | Sensor           | Source                          | Poll   |
//! |------------------|---------------------------------|--------|
//! | [`cpu`]          | cumulative CPU tick counters    | 10 s   |
//! | [`dock`]         | dock preference / screen insets | 3 s    |
//!
//! Both read through port traits, so each is testable with scripted
//! sources, and both degrade instead of failing.

pub mod cpu;
pub mod dock;
