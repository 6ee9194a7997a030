//! Graceful shutdown coordination.
//!
//! The coordinator listens for OS signals (SIGINT, SIGTERM) and drives
//! the shutdown half of the lifecycle over the instance registry:
//! `on_module_destroy`, then `before_application_shutdown(signal)`, then
//! `on_application_shutdown(signal)`, each phase strictly sequential in
//! registration order. An atomic latch makes a second signal a no-op.
//!
//! No timeout is applied to shutdown hooks; a hook that never resolves
//! hangs shutdown.

use super::traits::ShutdownSignal;
use super::{LifecycleError, Result};
use crate::factory::InstanceRecord;
use crate::logging::Logger;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal;

pub struct ShutdownCoordinator {
    records: Arc<Vec<InstanceRecord>>,
    logger: Logger,
    latch: AtomicBool,
}

impl ShutdownCoordinator {
    pub(crate) fn new(records: Arc<Vec<InstanceRecord>>, logger: Logger) -> Self {
        Self {
            records,
            logger,
            latch: AtomicBool::new(false),
        }
    }

    /// Spawn the background task that waits for SIGINT/SIGTERM, runs the
    /// shutdown sequence and exits the process (0 on success, 1 on any
    /// hook failure).
    pub fn install(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            let signal = wait_for_signal().await;
            let code = match coordinator.trigger(signal).await {
                Ok(()) => 0,
                Err(_) => 1,
            };
            std::process::exit(code);
        })
    }

    /// Run the shutdown hook sequence once.
    ///
    /// Safe to call multiple times: while a shutdown is already in
    /// progress (or finished) further triggers are no-ops. Exposed
    /// separately from signal handling so the state machine can be
    /// driven in tests.
    pub async fn trigger(&self, signal: ShutdownSignal) -> Result<()> {
        if self.latch.swap(true, Ordering::SeqCst) {
            self.logger.info("Shutdown already in progress, ignoring signal");
            return Ok(());
        }

        self.logger
            .info(&format!("Received {}, starting graceful shutdown", signal));

        for record in self.records.iter() {
            if let Some(hook) = &record.hooks.on_destroy {
                hook(Arc::clone(&record.instance)).await.map_err(|e| {
                    self.logger
                        .error(&format!("onModuleDestroy failed for {}: {}", record.type_name, e));
                    LifecycleError::hook_failed(record.type_name, e.to_string())
                })?;
            }
        }

        for record in self.records.iter() {
            if let Some(hook) = &record.hooks.before_shutdown {
                hook(Arc::clone(&record.instance), signal).await.map_err(|e| {
                    self.logger.error(&format!(
                        "beforeApplicationShutdown failed for {}: {}",
                        record.type_name, e
                    ));
                    LifecycleError::hook_failed(record.type_name, e.to_string())
                })?;
            }
        }

        // Listener teardown is the runtime's business, not ours.

        for record in self.records.iter() {
            if let Some(hook) = &record.hooks.on_shutdown {
                hook(Arc::clone(&record.instance), signal).await.map_err(|e| {
                    self.logger.error(&format!(
                        "onApplicationShutdown failed for {}: {}",
                        record.type_name, e
                    ));
                    LifecycleError::hook_failed(record.type_name, e.to_string())
                })?;
            }
        }

        self.logger.info("Graceful shutdown complete");
        Ok(())
    }

    pub fn is_shutting_down(&self) -> bool {
        self.latch.load(Ordering::SeqCst)
    }
}

/// Resolve to the first termination signal the process receives.
pub async fn wait_for_signal() -> ShutdownSignal {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => ShutdownSignal::Interrupt,
        _ = terminate => ShutdownSignal::Terminate,
    }
}
