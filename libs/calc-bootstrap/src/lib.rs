//! Process bootstrap shared by the calculator binaries.
//!
//! Layered configuration, logging initialization and signal handling.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod config;
pub mod logging;
pub mod signals;

pub use config::*;
pub use logging::*;
pub use signals::*;
