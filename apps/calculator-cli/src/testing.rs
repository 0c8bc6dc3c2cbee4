//! In-process clients for exercising the CLI flows without a server.

use async_trait::async_trait;
use calculator::domain::{CalculationRequest, Service};
use calculator_sdk::{Calculation, CalculatorClientV1, CalculatorError, Operation};

/// Calls the domain service directly.
#[derive(Default)]
pub struct LocalClient(Service);

#[async_trait]
impl CalculatorClientV1 for LocalClient {
    async fn calculate(
        &self,
        op: Operation,
        a: f64,
        b: f64,
    ) -> Result<Calculation, CalculatorError> {
        let resp = self.0.calculate(op, CalculationRequest::new(a, b));
        Ok(Calculation {
            result: resp.result,
            operation: resp.operation.to_owned(),
            message: resp.message,
        })
    }
}

/// Fails every call as if the server were down.
pub struct FailingClient;

#[async_trait]
impl CalculatorClientV1 for FailingClient {
    async fn calculate(
        &self,
        _op: Operation,
        _a: f64,
        _b: f64,
    ) -> Result<Calculation, CalculatorError> {
        Err(CalculatorError::Unavailable("connection refused".to_owned()))
    }
}
