//! Process termination signals.

use std::io;

use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Signal that ended [`wait_for_shutdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
}

/// Resolve on the first Ctrl+C (or SIGTERM on unix).
///
/// # Errors
/// Returns an error if a signal handler cannot be installed.
pub async fn wait_for_shutdown() -> io::Result<ShutdownSignal> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        tokio::select! {
            res = signal::ctrl_c() => res.map(|()| ShutdownSignal::Interrupt),
            _ = terminate.recv() => Ok(ShutdownSignal::Terminate),
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await?;
        Ok(ShutdownSignal::Interrupt)
    }
}

/// Cancel `token` once a termination signal arrives.
///
/// If handlers cannot be installed the token is left alone and the process
/// keeps running until something else cancels it.
pub async fn cancel_on_shutdown(token: CancellationToken) {
    tokio::select! {
        () = token.cancelled() => {}
        res = wait_for_shutdown() => match res {
            Ok(signal) => {
                tracing::info!(?signal, "Shutdown signal received");
                token.cancel();
            }
            Err(e) => tracing::error!(error = %e, "failed to install signal handlers"),
        },
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_returns_when_token_cancelled_elsewhere() {
        let token = CancellationToken::new();
        let waiter = tokio::spawn(cancel_on_shutdown(token.clone()));

        token.cancel();
        tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .unwrap()
            .unwrap();
    }
}
