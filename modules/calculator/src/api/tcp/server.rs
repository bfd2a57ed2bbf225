//! Accept loop for the calculator TCP transport.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, info, info_span, warn};

use super::session::{ServerControl, Session};
use crate::config::CalculatorConfig;
use crate::domain::Service;

/// Pause after a failed `accept` so a persistent error (e.g. fd exhaustion) does not spin.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// A bound listener plus everything a session needs.
pub struct CalcServer {
    listener: TcpListener,
    service: Service,
    max_line_length: usize,
}

impl CalcServer {
    /// Bind the listener configured in `config`.
    ///
    /// # Errors
    /// Returns an error if the address cannot be bound.
    pub async fn bind(config: &CalculatorConfig, service: Service) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(config.listen_addr)
            .await
            .with_context(|| format!("failed to bind listen address {}", config.listen_addr))?;
        let bound_addr = listener.local_addr()?;
        info!(%bound_addr, transport = "tcp", "calculator listening");

        Ok(Self {
            listener,
            service,
            max_line_length: config.max_line_length,
        })
    }

    /// Actual bound address (resolves port `0`).
    ///
    /// # Errors
    /// Returns an error if the socket address cannot be queried.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until a session sends `shutdown` or `cancel` fires.
    ///
    /// Each connection runs on its own task. Once accepting stops the listener is
    /// closed and open sessions are awaited until they end on their own. If
    /// `cancel` has fired, that wait is skipped and open sessions are left to
    /// process exit.
    pub async fn serve(self, cancel: CancellationToken) {
        let Self {
            listener,
            service,
            max_line_length,
        } = self;

        let accepting = cancel.child_token();
        let sessions = TaskTracker::new();

        loop {
            tokio::select! {
                biased;
                () = accepting.cancelled() => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let service = service.clone();
                        let accepting = accepting.clone();
                        sessions.spawn(
                            async move {
                                info!("connection accepted");
                                let mut session = Session::new(stream, service, max_line_length);
                                let control = session.run().await;
                                // stop accepting before the peer can observe the close
                                if control == ServerControl::Stop {
                                    accepting.cancel();
                                }
                                drop(session);
                                info!(?control, "connection closed");
                            }
                            .instrument(info_span!("session", %peer)),
                        );
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    }
                },
            }
        }

        drop(listener);
        sessions.close();
        info!(
            open_sessions = sessions.len(),
            "stopped accepting connections"
        );

        tokio::select! {
            () = sessions.wait() => info!("all sessions closed"),
            () = cancel.cancelled() => {
                warn!(open_sessions = sessions.len(), "abandoning open sessions");
            }
        }
    }
}
