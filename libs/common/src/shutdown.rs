//! Graceful shutdown signal
//!
//! Resolves on Ctrl+C, or SIGTERM on Unix. Pass it to
//! `axum::serve(..).with_graceful_shutdown(..)` to let in-flight requests finish.

use std::fmt;
use tracing::{info, warn};

/// Signal that ended the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Interrupt,
    Terminate,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupt => f.write_str("SIGINT"),
            Self::Terminate => f.write_str("SIGTERM"),
        }
    }
}

/// Wait for a shutdown signal and report which one arrived
pub async fn wait_for_shutdown() -> ShutdownReason {
    #[cfg(unix)]
    let reason = {
        use tokio::signal::unix::{signal, SignalKind};

        let mut term_signal = match signal(SignalKind::terminate()) {
            Ok(sig) => Some(sig),
            Err(e) => {
                warn!("SIGTERM handler unavailable, only Ctrl+C stops the service: {}", e);
                None
            },
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => ShutdownReason::Interrupt,
            _ = async {
                match term_signal.as_mut() {
                    Some(sig) => { sig.recv().await; },
                    None => std::future::pending::<()>().await,
                }
            } => ShutdownReason::Terminate,
        }
    };

    #[cfg(not(unix))]
    let reason = {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Ctrl+C handler failed: {}", e);
        }
        ShutdownReason::Interrupt
    };

    info!("Shutdown requested ({})", reason);
    reason
}
