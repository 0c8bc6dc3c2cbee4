//! gRPC API layer for calculator module

mod server;

pub use server::CalculatorServiceImpl;
