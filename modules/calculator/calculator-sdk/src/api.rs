//! Calculator API trait and types
//!
//! Contract trait and types shared by the calculator service and its callers.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

/// Label carried in `operation` when a division by zero was attempted.
pub const DIVISION_ERROR: &str = "division_error";

/// One of the four remote procedures exposed by the calculator service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    /// All operations, in procedure declaration order.
    pub const ALL: [Self; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    /// gRPC procedure name (`Add`, `Subtract`, ...).
    #[must_use]
    pub const fn rpc_name(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Subtract => "Subtract",
            Self::Multiply => "Multiply",
            Self::Divide => "Divide",
        }
    }

    /// Label returned in `CalculationResponse.operation` on success.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Add => "addition",
            Self::Subtract => "subtraction",
            Self::Multiply => "multiplication",
            Self::Divide => "division",
        }
    }

    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rpc_name())
    }
}

/// Returned when a string names none of the four operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown operation '{0}', expected one of: add, subtract, multiply, divide")]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    /// Accepts procedure names and result labels, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|op| {
                needle.eq_ignore_ascii_case(op.rpc_name()) || needle.eq_ignore_ascii_case(op.label())
            })
            .ok_or_else(|| UnknownOperation(needle.to_owned()))
    }
}

/// Outcome of a single calculation as seen by a caller.
///
/// Division by zero is signalled in-band: `operation` is [`DIVISION_ERROR`]
/// and `result` is `0`. Use [`Calculation::into_result`] for a typed view.
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub result: f64,
    pub operation: String,
    pub message: String,
}

impl Calculation {
    #[must_use]
    pub fn is_division_error(&self) -> bool {
        self.operation == DIVISION_ERROR
    }

    /// Convert the in-band sentinel into a typed error.
    ///
    /// # Errors
    /// Returns [`CalculatorError::DivisionByZero`] if the service reported a
    /// division by zero.
    pub fn into_result(self) -> Result<f64, CalculatorError> {
        if self.is_division_error() {
            Err(CalculatorError::DivisionByZero)
        } else {
            Ok(self.result)
        }
    }
}

/// Calculator API trait
///
/// Every method maps to one remote procedure of the calculator service.
#[async_trait]
pub trait CalculatorClientV1: Send + Sync {
    /// Run `op` on the two operands.
    async fn calculate(
        &self,
        op: Operation,
        a: f64,
        b: f64,
    ) -> Result<Calculation, CalculatorError>;

    async fn add(&self, a: f64, b: f64) -> Result<Calculation, CalculatorError> {
        self.calculate(Operation::Add, a, b).await
    }

    async fn subtract(&self, a: f64, b: f64) -> Result<Calculation, CalculatorError> {
        self.calculate(Operation::Subtract, a, b).await
    }

    async fn multiply(&self, a: f64, b: f64) -> Result<Calculation, CalculatorError> {
        self.calculate(Operation::Multiply, a, b).await
    }

    async fn divide(&self, a: f64, b: f64) -> Result<Calculation, CalculatorError> {
        self.calculate(Operation::Divide, a, b).await
    }
}

/// Error type for Calculator operations
#[derive(thiserror::Error, Debug)]
pub enum CalculatorError {
    #[error("gRPC transport error: {0}")]
    Transport(String),

    #[error("calculator service unavailable: {0}")]
    Unavailable(String),

    #[error("division by zero")]
    DivisionByZero,
}
