//! Client-side channel setup.
//!
//! A channel gets connect and per-RPC timeouts plus HTTP/2 keepalive.
//! Establishing the channel is retried with a linear, capped backoff; RPCs
//! issued over an established channel are never retried here.

use std::time::Duration;

use anyhow::Context;
use tonic::transport::{Channel, Endpoint};
use tracing::Instrument;

const TCP_KEEPALIVE: Duration = Duration::from_secs(30);
const HTTP2_KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);
const HTTP2_KEEPALIVE_TIMEOUT: Duration = Duration::from_secs(10);

fn as_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Transport settings for an outgoing gRPC channel.
#[derive(Debug, Clone)]
pub struct GrpcClientConfig {
    /// Name recorded on connection spans and log events.
    pub service_name: &'static str,
    pub connect_timeout: Duration,
    /// Deadline applied to every RPC on the channel.
    pub rpc_timeout: Duration,
    /// Extra connection attempts after the first one fails.
    pub max_retries: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for GrpcClientConfig {
    fn default() -> Self {
        Self {
            service_name: "grpc_client",
            connect_timeout: Duration::from_secs(10),
            rpc_timeout: Duration::from_secs(30),
            max_retries: 3,
            base_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl GrpcClientConfig {
    #[must_use]
    pub fn new(service_name: &'static str) -> Self {
        Self {
            service_name,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_connect_timeout(self, connect_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            ..self
        }
    }

    #[must_use]
    pub fn with_rpc_timeout(self, rpc_timeout: Duration) -> Self {
        Self {
            rpc_timeout,
            ..self
        }
    }

    #[must_use]
    pub fn with_max_retries(self, max_retries: u32) -> Self {
        Self {
            max_retries,
            ..self
        }
    }

    #[must_use]
    pub fn with_backoff(self, base_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            base_backoff,
            max_backoff,
            ..self
        }
    }

    /// Delay before the next attempt once attempt number `failed` (1-based) has failed.
    #[must_use]
    pub fn backoff_for_attempt(&self, failed: u32) -> Duration {
        self.base_backoff
            .saturating_mul(failed)
            .min(self.max_backoff)
    }

    fn endpoint(&self, uri: String) -> Result<Endpoint, tonic::transport::Error> {
        Ok(Endpoint::from_shared(uri)?
            .connect_timeout(self.connect_timeout)
            .timeout(self.rpc_timeout)
            .tcp_keepalive(Some(TCP_KEEPALIVE))
            .http2_keep_alive_interval(HTTP2_KEEPALIVE_INTERVAL)
            .keep_alive_timeout(HTTP2_KEEPALIVE_TIMEOUT)
            .keep_alive_while_idle(true))
    }
}

/// Turn a user-supplied address into a URI tonic accepts.
///
/// A bare `host:port` gets an `http://` scheme; anything that already has a
/// scheme is returned trimmed but otherwise unchanged.
#[must_use]
pub fn normalize_uri(addr: &str) -> String {
    let addr = addr.trim();
    if addr.contains("://") {
        addr.to_owned()
    } else {
        format!("http://{addr}")
    }
}

async fn connect_once(uri: &str, cfg: &GrpcClientConfig) -> anyhow::Result<Channel> {
    let span = tracing::debug_span!("grpc_connect", service = cfg.service_name, %uri);
    async {
        let channel = cfg.endpoint(uri.to_owned())?.connect().await?;
        Ok(channel)
    }
    .instrument(span)
    .await
}

/// Open a channel, retrying the setup.
///
/// Generated clients wrap the result with their `new` constructor. Makes
/// `1 + max_retries` attempts in total, sleeping
/// [`GrpcClientConfig::backoff_for_attempt`] between them.
///
/// # Errors
/// Returns the last connection error once every attempt has failed. The
/// context names the service, the URI and the number of attempts.
pub async fn connect_with_retry(
    uri: impl Into<String>,
    cfg: &GrpcClientConfig,
) -> anyhow::Result<Channel> {
    let uri = uri.into();
    let attempts = cfg.max_retries.saturating_add(1);
    let mut attempt = 1;

    loop {
        match connect_once(&uri, cfg).await {
            Ok(channel) => {
                tracing::info!(
                    service = cfg.service_name,
                    %uri,
                    attempt,
                    connect_timeout_ms = as_millis(cfg.connect_timeout),
                    rpc_timeout_ms = as_millis(cfg.rpc_timeout),
                    "gRPC client connected"
                );
                return Ok(channel);
            }
            Err(e) if attempt < attempts => {
                let backoff = cfg.backoff_for_attempt(attempt);
                tracing::warn!(
                    service = cfg.service_name,
                    attempt,
                    error = %e,
                    backoff_ms = as_millis(backoff),
                    "gRPC connection failed, retrying"
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!(
                        "Failed to connect to {} at {uri} after {attempt} attempts",
                        cfg.service_name
                    )
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = GrpcClientConfig::new("calc");
        assert_eq!(cfg.service_name, "calc");
        assert_eq!(cfg.connect_timeout, Duration::from_secs(10));
        assert_eq!(cfg.rpc_timeout, Duration::from_secs(30));
        assert_eq!(cfg.max_retries, 3);
    }

    #[test]
    fn test_builders_only_touch_their_field() {
        let cfg = GrpcClientConfig::new("calc")
            .with_connect_timeout(Duration::from_secs(1))
            .with_max_retries(0);
        assert_eq!(cfg.connect_timeout, Duration::from_secs(1));
        assert_eq!(cfg.max_retries, 0);
        assert_eq!(cfg.rpc_timeout, Duration::from_secs(30));
        assert_eq!(cfg.service_name, "calc");
    }

    #[test]
    fn test_backoff_is_linear_and_capped() {
        let cfg = GrpcClientConfig::default()
            .with_backoff(Duration::from_millis(100), Duration::from_millis(250));
        assert_eq!(cfg.backoff_for_attempt(1), Duration::from_millis(100));
        assert_eq!(cfg.backoff_for_attempt(2), Duration::from_millis(200));
        assert_eq!(cfg.backoff_for_attempt(3), Duration::from_millis(250));
        assert_eq!(cfg.backoff_for_attempt(u32::MAX), Duration::from_millis(250));
    }

    #[test]
    fn test_normalize_uri() {
        assert_eq!(normalize_uri("localhost:50051"), "http://localhost:50051");
        assert_eq!(normalize_uri(" 10.0.0.1:7000 "), "http://10.0.0.1:7000");
        assert_eq!(
            normalize_uri("https://calc.internal:443"),
            "https://calc.internal:443"
        );
    }

    #[test]
    fn test_endpoint_rejects_empty_uri() {
        let cfg = GrpcClientConfig::default();
        assert!(cfg.endpoint("http://localhost:50051".to_owned()).is_ok());
        assert!(cfg.endpoint(String::new()).is_err());
    }
}
