//! Process signal handling for graceful shutdown

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Token cancelled on Ctrl+C, or SIGTERM on unix.
///
/// Must be called inside a tokio runtime: the listener runs on a spawned task.
///
/// ```ignore
/// let token = server::signal_token();
/// server.run(token).await?;
/// ```
pub fn signal_token() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        match termination_signal().await {
            Ok(signal) => {
                info!(signal, "Initiating graceful shutdown...");
                trigger.cancel();
            }
            Err(e) => warn!("Failed to listen for shutdown signals: {}", e),
        }
    });

    token
}

#[cfg(unix)]
async fn termination_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res.map(|_| "SIGINT"),
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn termination_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|_| "ctrl-c")
}
