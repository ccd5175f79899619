//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  No window server or dock is required.

mod mock_platform;
mod prefs_tests;
mod service_tests;
