//! Domain layer for calculator module
//!
//! Contains business logic for the four arithmetic operations.

pub mod service;

pub use service::{CalculationRequest, CalculationResponse, Service};
