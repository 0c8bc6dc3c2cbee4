#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod client;
pub mod server;

pub use server::{DEFAULT_LISTEN_ADDR, ListenConfig, ReadySignal, serve};
