#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Calculator Module
//!
//! A stateless gRPC service that adds, subtracts, multiplies and divides
//! two floating-point operands.
//!
//! ## Architecture
//!
//! - `domain/service.rs` - Core business logic
//! - `api/grpc/server.rs` - gRPC server implementation
//! - `module.rs` - Service wiring and serving
//!
//! External consumers should use the `calculator-sdk` crate which provides
//! the proto contract and the gRPC client.

// === MODULE DEFINITION ===
mod module;
pub use module::CalculatorModule;

// === INTERNAL MODULES ===
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
