//! Process supervision: the engine loop alongside an OS signal listener.
//!
//! SIGHUP reloads the policy file and keeps listening. SIGINT, SIGTERM and
//! SIGQUIT (Ctrl+C on non-unix) stop the process. Whichever task finishes
//! first triggers the shared [`Shutdown`], then both are awaited.

use std::future::Future;
use std::io;
use std::sync::Arc;

use tracing::{error, info};

use super::{PolicyEngine, Shutdown};

/// What a received signal asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SignalEvent {
    Reload,
    Stop(&'static str),
}

/// Run `engine` until a termination signal arrives.
///
/// Fails only if the signal handlers cannot be installed.
pub async fn run_until_signal(engine: Arc<PolicyEngine>) -> io::Result<()> {
    let mut signals = Signals::install()?;
    let shutdown = Shutdown::new();

    let listener = {
        let engine = Arc::clone(&engine);
        let shutdown = shutdown.clone();
        async move {
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => return,
                    event = signals.next() => {
                        if handle_signal(&engine, event) {
                            return;
                        }
                    }
                }
            }
        }
    };

    supervise(engine, shutdown, listener).await;
    Ok(())
}

/// Apply a signal. Returns `true` when the listener should stop.
pub(crate) fn handle_signal(engine: &PolicyEngine, event: SignalEvent) -> bool {
    match event {
        SignalEvent::Reload => {
            info!("SIGHUP received, reloading policy");
            // Failure is logged by reload(); the previous document stays active.
            let _ = engine.reload();
            false
        }
        SignalEvent::Stop(name) => {
            info!(signal = name, "shutdown signal received");
            true
        }
    }
}

/// Run the engine loop next to `listener`.
///
/// The first of the two to finish triggers `shutdown`; the other is then
/// awaited so an in-flight tick completes before this returns.
pub(crate) async fn supervise<F>(engine: Arc<PolicyEngine>, shutdown: Shutdown, listener: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    let mut listener_task = tokio::spawn(listener);
    let mut engine_task = tokio::spawn({
        let shutdown = shutdown.clone();
        async move { engine.run(shutdown).await }
    });

    let listener_first = tokio::select! {
        res = &mut listener_task => {
            if let Err(e) = res {
                error!(error = %e, "signal task failed");
            }
            true
        }
        res = &mut engine_task => {
            if let Err(e) = res {
                error!(error = %e, "engine task failed");
            }
            false
        }
    };

    shutdown.trigger();

    let remaining = if listener_first {
        engine_task.await
    } else {
        listener_task.await
    };
    if let Err(e) = remaining {
        error!(error = %e, "task failed during shutdown");
    }
    info!("shutdown complete");
}

// ── OS signals ──────────────────────────────────────────────────────

#[cfg(unix)]
struct Signals {
    hangup: tokio::signal::unix::Signal,
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
    quit: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Signals {
    fn install() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};
        Ok(Self {
            hangup: signal(SignalKind::hangup())?,
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
            quit: signal(SignalKind::quit())?,
        })
    }

    async fn next(&mut self) -> SignalEvent {
        tokio::select! {
            _ = self.hangup.recv() => SignalEvent::Reload,
            _ = self.interrupt.recv() => SignalEvent::Stop("SIGINT"),
            _ = self.terminate.recv() => SignalEvent::Stop("SIGTERM"),
            _ = self.quit.recv() => SignalEvent::Stop("SIGQUIT"),
        }
    }
}

#[cfg(not(unix))]
struct Signals;

#[cfg(not(unix))]
impl Signals {
    fn install() -> io::Result<Self> {
        Ok(Self)
    }

    async fn next(&mut self) -> SignalEvent {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl_c");
        }
        SignalEvent::Stop("ctrl-c")
    }
}
