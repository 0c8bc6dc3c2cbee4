//! Calculator SDK
//!
//! This crate provides everything needed to consume the calculator service:
//! - API trait (`CalculatorClientV1`) and shared types (`Operation`, `Calculation`)
//! - Error types (`CalculatorError`)
//! - gRPC client (`CalculatorGrpcClient`)
//! - Proto stubs for server implementation
//!
//! ## Usage
//!
//! ```ignore
//! use calculator_sdk::{CalculatorClientV1, CalculatorGrpcClient};
//!
//! let client = CalculatorGrpcClient::connect("http://127.0.0.1:50051").await?;
//! let calc = client.divide(10.0, 2.0).await?;
//! assert_eq!(calc.operation, "division");
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

// === API TRAIT AND TYPES ===
mod api;
pub use api::{
    Calculation, CalculatorClientV1, CalculatorError, DIVISION_ERROR, Operation, UnknownOperation,
};

// === GRPC CLIENT ===
mod client;
pub use client::CalculatorGrpcClient;

// === GRPC PROTO STUBS (for server implementation) ===
/// Generated protobuf types for the `calculator.Calculator` service
#[allow(clippy::pedantic)]
pub mod proto {
    tonic::include_proto!("calculator");
}

// Re-export proto types needed by server
pub use proto::calculator_server::{Calculator, CalculatorServer};
pub use proto::{CalculationRequest, CalculationResponse};

/// Fully qualified gRPC service name (used for tracing and connection config)
pub const SERVICE_NAME: &str = "calculator.Calculator";
