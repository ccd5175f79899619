//! Unified error types for the DockLambda companion.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! runtime's error handling uniform. Nothing here is fatal at runtime: the
//! service degrades on every variant and only the binary edge reports them.

use core::fmt;

use crate::app::ports::{ConfigError, StorageError};

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug)]
pub enum Error {
    /// CPU tick counters could not be read.
    Ticks(TickError),
    /// The preference store failed.
    Storage(StorageError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// An input line could not be parsed into a command.
    Input(InputError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ticks(e) => write!(f, "cpu ticks: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Input(e) => write!(f, "input: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Tick source errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickError {
    /// The platform exposes no cumulative tick counters to this process.
    Unavailable,
    /// The counter source could not be opened or read.
    ReadFailed,
    /// The counter source was read but did not have the expected shape.
    Malformed,
}

impl fmt::Display for TickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "tick counters unavailable on this platform"),
            Self::ReadFailed => write!(f, "tick counter read failed"),
            Self::Malformed => write!(f, "tick counters malformed"),
        }
    }
}

impl From<TickError> for Error {
    fn from(e: TickError) -> Self {
        Self::Ticks(e)
    }
}

// ---------------------------------------------------------------------------
// Input errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The line was blank.
    Empty,
    /// The verb is not a known command.
    UnknownCommand(String),
    /// A command was given the wrong number of arguments.
    MissingArgument(&'static str),
    /// A numeric argument failed to parse.
    BadNumber(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty line"),
            Self::UnknownCommand(verb) => write!(f, "unknown command '{verb}'"),
            Self::MissingArgument(usage) => write!(f, "missing argument, usage: {usage}"),
            Self::BadNumber(raw) => write!(f, "'{raw}' is not a number"),
        }
    }
}

impl From<InputError> for Error {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

// ---------------------------------------------------------------------------
// Port errors
// ---------------------------------------------------------------------------

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
