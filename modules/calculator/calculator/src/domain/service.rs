//! Domain service for calculator
//!
//! Contains the core business logic: four stateless operations over two
//! operands. Division by zero is reported in-band through the
//! `division_error` label, never as an error.

use calculator_sdk::{DIVISION_ERROR, Operation};
use tracing::{info, warn};

/// Operands of a single calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculationRequest {
    pub a: f64,
    pub b: f64,
}

impl CalculationRequest {
    #[must_use]
    pub const fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }
}

/// Result of a single calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationResponse {
    pub result: f64,
    pub operation: &'static str,
    pub message: String,
}

impl CalculationResponse {
    #[must_use]
    pub fn is_division_error(&self) -> bool {
        self.operation == DIVISION_ERROR
    }
}

/// Domain service that performs calculator operations.
///
/// Holds no state; a single instance is shared by every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Service;

#[allow(clippy::unused_self)]
impl Service {
    /// Create a new service.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Dispatch `op` to the matching operation.
    #[must_use]
    pub fn calculate(&self, op: Operation, req: CalculationRequest) -> CalculationResponse {
        match op {
            Operation::Add => self.add(req),
            Operation::Subtract => self.subtract(req),
            Operation::Multiply => self.multiply(req),
            Operation::Divide => self.divide(req),
        }
    }

    #[must_use]
    pub fn add(&self, req: CalculationRequest) -> CalculationResponse {
        completed(Operation::Add, req, req.a + req.b)
    }

    #[must_use]
    pub fn subtract(&self, req: CalculationRequest) -> CalculationResponse {
        completed(Operation::Subtract, req, req.a - req.b)
    }

    #[must_use]
    pub fn multiply(&self, req: CalculationRequest) -> CalculationResponse {
        completed(Operation::Multiply, req, req.a * req.b)
    }

    /// Divide `a` by `b`.
    ///
    /// An exact zero divisor (including `-0.0`) yields `result = 0` with the
    /// `division_error` label.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn divide(&self, req: CalculationRequest) -> CalculationResponse {
        let CalculationRequest { a, b } = req;
        if b == 0.0 {
            warn!(
                a,
                b,
                operation = DIVISION_ERROR,
                "Division by zero attempted: {a:.2} / {b:.2}"
            );
            return CalculationResponse {
                result: 0.0,
                operation: DIVISION_ERROR,
                message: "Error: Division by zero!".to_owned(),
            };
        }
        completed(Operation::Divide, req, a / b)
    }
}

fn completed(op: Operation, req: CalculationRequest, result: f64) -> CalculationResponse {
    let CalculationRequest { a, b } = req;
    let message = format!("{a:.2} {} {b:.2} = {result:.2}", op.symbol());
    info!(
        a,
        b,
        result,
        operation = op.label(),
        "{} operation: {message}",
        op.rpc_name()
    );
    CalculationResponse {
        result,
        operation: op.label(),
        message,
    }
}
