//! Shutdown triggers for the server process.

use std::io;

use tokio::signal;

/// Resolve with the name of the first termination signal delivered to the
/// process (`SIGINT` or, on Unix, `SIGTERM`).
///
/// # Errors
/// Returns an error if a signal handler cannot be installed.
pub async fn wait_for_shutdown() -> io::Result<&'static str> {
    #[cfg(unix)]
    {
        use signal::unix::{SignalKind, signal as unix_signal};

        let mut terminate = unix_signal(SignalKind::terminate())?;
        tokio::select! {
            res = signal::ctrl_c() => res.map(|()| "SIGINT"),
            _ = terminate.recv() => Ok("SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await.map(|()| "SIGINT")
    }
}
