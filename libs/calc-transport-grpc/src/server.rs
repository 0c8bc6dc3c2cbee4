//! gRPC server hosting.
//!
//! Binds a single listener and serves the given tonic routes until the
//! cancellation token fires. Supported listen addresses:
//! - TCP: `"127.0.0.1:50051"` or `"0.0.0.0:0"` for an ephemeral port
//! - Unix Domain Socket (Unix only): `"uds:///path/to/socket.sock"`

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
#[cfg(unix)]
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::service::Routes;
use tonic::transport::Server;

pub const DEFAULT_LISTEN_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 50051));

/// Where the server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenConfig {
    Tcp(SocketAddr),
    #[cfg(unix)]
    Uds(PathBuf),
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self::Tcp(DEFAULT_LISTEN_ADDR)
    }
}

impl fmt::Display for ListenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp(addr) => write!(f, "{addr}"),
            #[cfg(unix)]
            Self::Uds(path) => write!(f, "uds://{}", path.display()),
        }
    }
}

impl FromStr for ListenConfig {
    type Err = anyhow::Error;

    fn from_str(listen_addr: &str) -> Result<Self, Self::Err> {
        let listen_addr = listen_addr.trim();

        if listen_addr.starts_with("pipe://") || listen_addr.starts_with("npipe://") {
            anyhow::bail!("Named pipe listen_addr is not supported: '{listen_addr}'");
        }

        if let Some(uds_path) = listen_addr.strip_prefix("uds://") {
            return Self::uds(uds_path);
        }

        let addr = listen_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid listen_addr '{listen_addr}'"))?;
        Ok(Self::Tcp(addr))
    }
}

impl ListenConfig {
    #[cfg(unix)]
    fn uds(path: &str) -> anyhow::Result<Self> {
        if path.is_empty() {
            anyhow::bail!("UDS listen_addr requires a socket path");
        }
        Ok(Self::Uds(PathBuf::from(path)))
    }

    #[cfg(not(unix))]
    fn uds(_path: &str) -> anyhow::Result<Self> {
        anyhow::bail!("UDS listen_addr is not supported on this platform")
    }
}

/// One-shot notification carrying the bound endpoint once the listener is up.
pub struct ReadySignal(Option<oneshot::Sender<String>>);

impl ReadySignal {
    #[must_use]
    pub fn from_sender(tx: oneshot::Sender<String>) -> Self {
        Self(Some(tx))
    }

    /// A signal nobody listens to.
    #[must_use]
    pub fn noop() -> Self {
        Self(None)
    }

    fn notify(mut self, endpoint: String) {
        if let Some(tx) = self.0.take()
            && tx.send(endpoint).is_err()
        {
            tracing::debug!("ready signal receiver dropped");
        }
    }
}

/// Serve `routes` on `listen` until `cancel` fires.
///
/// # Errors
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn serve(
    routes: Routes,
    listen: ListenConfig,
    cancel: CancellationToken,
    ready: ReadySignal,
) -> anyhow::Result<()> {
    match listen {
        ListenConfig::Tcp(addr) => serve_tcp(addr, routes, cancel, ready).await,
        #[cfg(unix)]
        ListenConfig::Uds(path) => serve_uds(path, routes, cancel, ready).await,
    }
}

async fn serve_tcp(
    addr: SocketAddr,
    routes: Routes,
    cancel: CancellationToken,
    ready: ReadySignal,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind TCP listener at {addr}"))?;
    let bound_addr = listener.local_addr()?;
    tracing::info!(%bound_addr, transport = "tcp", "gRPC server listening");
    ready.notify(format!("http://{bound_addr}"));

    let incoming = TcpListenerStream::new(listener);
    Server::builder()
        .add_routes(routes)
        .serve_with_incoming_shutdown(incoming, async move {
            cancel.cancelled().await;
        })
        .await?;
    tracing::info!(%bound_addr, "gRPC server stopped");
    Ok(())
}

/// Delete whatever sits at `path` so the socket can be bound again.
#[cfg(unix)]
fn clear_socket_path(path: &std::path::Path) -> anyhow::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed stale calculator socket");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("cannot clear socket path '{}'", path.display())),
    }
}

#[cfg(unix)]
async fn serve_uds(
    path: PathBuf,
    routes: Routes,
    cancel: CancellationToken,
    ready: ReadySignal,
) -> anyhow::Result<()> {
    use tokio::net::UnixListener;
    use tokio_stream::wrappers::UnixListenerStream;

    clear_socket_path(&path)?;

    let uds = UnixListener::bind(&path)
        .with_context(|| format!("failed to bind UDS listener at '{}'", path.display()))?;
    tracing::info!(path = %path.display(), transport = "uds", "gRPC server listening");
    ready.notify(format!("unix://{}", path.display()));

    let incoming = UnixListenerStream::new(uds);
    Server::builder()
        .add_routes(routes)
        .serve_with_incoming_shutdown(incoming, async move {
            cancel.cancelled().await;
        })
        .await?;
    tracing::info!(path = %path.display(), "gRPC server stopped");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_listen_config() {
        assert_eq!(
            ListenConfig::default(),
            ListenConfig::Tcp("0.0.0.0:50051".parse().unwrap())
        );
    }

    #[test]
    fn test_parse_tcp() {
        let cfg: ListenConfig = "127.0.0.1:0".parse().unwrap();
        assert_eq!(cfg, ListenConfig::Tcp("127.0.0.1:0".parse().unwrap()));
        assert_eq!(cfg.to_string(), "127.0.0.1:0");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = "not-an-address".parse::<ListenConfig>().unwrap_err();
        assert!(err.to_string().contains("invalid listen_addr"));
    }

    #[test]
    fn test_parse_rejects_named_pipe() {
        assert!(r"pipe://\\.\pipe\calc".parse::<ListenConfig>().is_err());
        assert!(r"npipe://\\.\pipe\calc".parse::<ListenConfig>().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_uds() {
        let cfg: ListenConfig = "uds:///tmp/calc.sock".parse().unwrap();
        assert_eq!(cfg, ListenConfig::Uds(PathBuf::from("/tmp/calc.sock")));
        assert_eq!(cfg.to_string(), "uds:///tmp/calc.sock");
        assert!("uds://".parse::<ListenConfig>().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_clear_socket_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calc.sock");

        clear_socket_path(&path).unwrap();

        std::fs::write(&path, b"left over").unwrap();
        clear_socket_path(&path).unwrap();
        assert!(!path.exists());

        let err = clear_socket_path(dir.path()).unwrap_err();
        assert!(err.to_string().contains("cannot clear socket path"), "{err:#}");
    }
}
