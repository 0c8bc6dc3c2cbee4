//! gRPC Server implementation for calculator
//!
//! The server implementation handles gRPC requests and delegates
//! to the domain Service for business logic. No input produces a
//! `Status` error; division by zero is a regular response.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use calculator_sdk::{Calculator, CalculationRequest, CalculationResponse, Operation};

use crate::domain::{self, Service};

/// gRPC service implementation that wraps the domain Service.
#[derive(Clone)]
pub struct CalculatorServiceImpl {
    service: Arc<Service>,
}

impl CalculatorServiceImpl {
    /// Create a new `CalculatorService` implementation with the given Service.
    #[must_use]
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }

    fn handle(&self, op: Operation, request: Request<CalculationRequest>) -> CalculationResponse {
        let CalculationRequest { a, b } = request.into_inner();
        let resp = self
            .service
            .calculate(op, domain::CalculationRequest::new(a, b));
        CalculationResponse {
            result: resp.result,
            operation: resp.operation.to_owned(),
            message: resp.message,
        }
    }
}

#[tonic::async_trait]
impl Calculator for CalculatorServiceImpl {
    async fn add(
        &self,
        request: Request<CalculationRequest>,
    ) -> Result<Response<CalculationResponse>, Status> {
        Ok(Response::new(self.handle(Operation::Add, request)))
    }

    async fn subtract(
        &self,
        request: Request<CalculationRequest>,
    ) -> Result<Response<CalculationResponse>, Status> {
        Ok(Response::new(self.handle(Operation::Subtract, request)))
    }

    async fn multiply(
        &self,
        request: Request<CalculationRequest>,
    ) -> Result<Response<CalculationResponse>, Status> {
        Ok(Response::new(self.handle(Operation::Multiply, request)))
    }

    async fn divide(
        &self,
        request: Request<CalculationRequest>,
    ) -> Result<Response<CalculationResponse>, Status> {
        Ok(Response::new(self.handle(Operation::Divide, request)))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn svc() -> CalculatorServiceImpl {
        CalculatorServiceImpl::new(Arc::new(Service::new()))
    }

    fn request(a: f64, b: f64) -> Request<CalculationRequest> {
        Request::new(CalculationRequest { a, b })
    }

    #[tokio::test]
    async fn test_add_maps_domain_result() {
        let resp = svc().add(request(2.0, 3.0)).await.unwrap().into_inner();
        assert_eq!(resp.result, 5.0);
        assert_eq!(resp.operation, "addition");
        assert_eq!(resp.message, "2.00 + 3.00 = 5.00");
    }

    #[tokio::test]
    async fn test_divide_by_zero_is_not_a_status_error() {
        let resp = svc().divide(request(7.0, 0.0)).await.unwrap().into_inner();
        assert_eq!(resp.result, 0.0);
        assert_eq!(resp.operation, "division_error");
    }

    #[tokio::test]
    async fn test_each_rpc_routes_to_its_operation() {
        let s = svc();
        let sub = s.subtract(request(10.0, 4.0)).await.unwrap().into_inner();
        let mul = s.multiply(request(-2.0, 5.0)).await.unwrap().into_inner();
        let div = s.divide(request(10.0, 2.0)).await.unwrap().into_inner();

        assert_eq!((sub.result, sub.operation.as_str()), (6.0, "subtraction"));
        assert_eq!((mul.result, mul.operation.as_str()), (-10.0, "multiplication"));
        assert_eq!((div.result, div.operation.as_str()), (5.0, "division"));
    }
}
