use std::future::Future;

use anyhow::Result;

/// Resolve when the process is asked to stop (SIGTERM, SIGINT or Ctrl+C;
/// console close/logoff/shutdown events on Windows).
pub async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::select! {
            _ = sigterm.recv() => tracing::info!("shutdown: SIGTERM received"),
            _ = sigint.recv()  => tracing::info!("shutdown: SIGINT received"),
        }
        Ok(())
    }

    #[cfg(windows)]
    {
        use tokio::signal::windows::{ctrl_break, ctrl_c, ctrl_close, ctrl_logoff, ctrl_shutdown};
        use tokio::time::{timeout, Duration};

        async fn arm_once() -> std::io::Result<()> {
            let mut c = ctrl_c()?;
            let mut br = ctrl_break()?;
            let mut cl = ctrl_close()?;
            let mut lo = ctrl_logoff()?;
            let mut sh = ctrl_shutdown()?;

            tokio::select! {
                _ = c.recv()  => {},
                _ = br.recv() => {},
                _ = cl.recv() => {},
                _ = lo.recv() => {},
                _ = sh.recv() => {},
            }
            Ok(())
        }

        // A console event right after arming is spurious; wait for the next one.
        match timeout(Duration::from_millis(50), arm_once()).await {
            Ok(Ok(())) => {
                tracing::warn!("shutdown: early console signal ignored");
                arm_once().await?;
            }
            Ok(Err(e)) => return Err(e.into()),
            Err(_elapsed) => arm_once().await?,
        }
        Ok(())
    }
}

/// Shutdown future for `axum::serve(..).with_graceful_shutdown(..)`.
///
/// A failure to install signal handlers is logged and treated as "never",
/// so the server keeps running instead of stopping immediately.
pub fn shutdown_signal() -> impl Future<Output = ()> + Send + 'static {
    async {
        if let Err(e) = wait_for_shutdown().await {
            tracing::error!(error = %e, "cannot install shutdown signal handlers");
            std::future::pending::<()>().await;
        }
    }
}
