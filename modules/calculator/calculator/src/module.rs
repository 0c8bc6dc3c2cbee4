//! Calculator Module definition
//!
//! Wires the domain service into the gRPC transport: builds the tonic
//! service once and hands it to the serve loop.

use std::sync::Arc;

use anyhow::Result;
use calc_transport_grpc::{ListenConfig, ReadySignal};
use tokio_util::sync::CancellationToken;
use tonic::service::{Routes, RoutesBuilder};

use calculator_sdk::{CalculatorServer, SERVICE_NAME};

use crate::api::grpc::CalculatorServiceImpl;
use crate::domain::Service;

/// Calculator module.
///
/// Exposes the four calculator procedures via gRPC.
#[derive(Clone, Default)]
pub struct CalculatorModule {
    service: Arc<Service>,
}

impl CalculatorModule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the tonic service around the shared domain service.
    #[must_use]
    pub fn grpc_service(&self) -> CalculatorServer<CalculatorServiceImpl> {
        CalculatorServer::new(CalculatorServiceImpl::new(Arc::clone(&self.service)))
    }

    #[must_use]
    pub fn routes(&self) -> Routes {
        let mut routes = RoutesBuilder::default();
        routes.add_service(self.grpc_service());
        routes.routes()
    }

    /// Serve the calculator on `listen` until `cancel` fires.
    ///
    /// # Errors
    /// Returns an error if the listener cannot be bound or the server fails.
    pub async fn serve(
        &self,
        listen: ListenConfig,
        cancel: CancellationToken,
        ready: ReadySignal,
    ) -> Result<()> {
        tracing::info!(service = SERVICE_NAME, listen = %listen, "starting calculator service");
        calc_transport_grpc::serve(self.routes(), listen, cancel, ready).await
    }
}
