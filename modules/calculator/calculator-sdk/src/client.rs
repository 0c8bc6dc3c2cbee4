//! gRPC client implementation of `CalculatorClientV1`

use anyhow::Result;
use async_trait::async_trait;
use calc_transport_grpc::client::{GrpcClientConfig, connect_with_retry};
use tonic::transport::Channel;

use crate::SERVICE_NAME;
use crate::api::{Calculation, CalculatorClientV1, CalculatorError, Operation};
use crate::proto::calculator_client::CalculatorClient;
use crate::proto::{CalculationRequest, CalculationResponse};

/// gRPC client implementation of `CalculatorClientV1`.
///
/// Cheap to clone; all clones share the underlying channel.
#[derive(Clone)]
pub struct CalculatorGrpcClient {
    inner: CalculatorClient<Channel>,
}

impl CalculatorGrpcClient {
    /// Connect to the calculator service using default configuration with retries.
    ///
    /// # Errors
    /// Returns an error if the URI is invalid or the service stays unreachable
    /// after all connection attempts.
    pub async fn connect(uri: impl Into<String>) -> Result<Self> {
        let cfg = GrpcClientConfig::new(SERVICE_NAME);
        Self::connect_with_config(uri, &cfg).await
    }

    /// Connect using an explicit transport configuration.
    ///
    /// # Errors
    /// Returns an error if the URI is invalid or the service stays unreachable
    /// after all connection attempts.
    pub async fn connect_with_config(
        uri: impl Into<String>,
        cfg: &GrpcClientConfig,
    ) -> Result<Self> {
        let channel = connect_with_retry(uri, cfg).await?;
        Ok(Self {
            inner: CalculatorClient::new(channel),
        })
    }
}

impl From<CalculationResponse> for Calculation {
    fn from(resp: CalculationResponse) -> Self {
        Self {
            result: resp.result,
            operation: resp.operation,
            message: resp.message,
        }
    }
}

fn map_status(status: &tonic::Status) -> CalculatorError {
    match status.code() {
        tonic::Code::Unavailable => CalculatorError::Unavailable(status.message().to_owned()),
        _ => CalculatorError::Transport(status.message().to_owned()),
    }
}

#[async_trait]
impl CalculatorClientV1 for CalculatorGrpcClient {
    async fn calculate(
        &self,
        op: Operation,
        a: f64,
        b: f64,
    ) -> Result<Calculation, CalculatorError> {
        let mut client = self.inner.clone();
        let request = tonic::Request::new(CalculationRequest { a, b });

        let response = match op {
            Operation::Add => client.add(request).await,
            Operation::Subtract => client.subtract(request).await,
            Operation::Multiply => client.multiply(request).await,
            Operation::Divide => client.divide(request).await,
        }
        .map_err(|status| {
            tracing::debug!(
                operation = op.rpc_name(),
                code = %status.code(),
                "calculator call failed"
            );
            map_status(&status)
        })?;

        Ok(response.into_inner().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_status_is_distinguished() {
        let err = map_status(&tonic::Status::unavailable("connection refused"));
        assert!(matches!(err, CalculatorError::Unavailable(msg) if msg == "connection refused"));

        let err = map_status(&tonic::Status::internal("boom"));
        assert!(matches!(err, CalculatorError::Transport(msg) if msg == "boom"));
    }
}
