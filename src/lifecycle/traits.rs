//! Lifecycle hook traits
//!
//! Modules, providers and controllers participate in the application
//! lifecycle by implementing these traits and binding the matching hook
//! in their descriptor builder (`on_module_init()` and friends). The
//! factory invokes each phase sequentially, in instance-registration
//! order.

use super::LifecycleError;
use async_trait::async_trait;
use std::fmt;

/// The OS signal that initiated shutdown, forwarded to the
/// shutdown-phase hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
}

impl ShutdownSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownSignal::Interrupt => "SIGINT",
            ShutdownSignal::Terminate => "SIGTERM",
        }
    }
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Called after the instance's dependencies are resolved.
///
/// Use this hook to:
/// - Initialize database connections
/// - Warm up caches
/// - Establish external service connections
///
/// Runs for every registered instance before any route is reachable.
#[async_trait]
pub trait OnModuleInit: Send + Sync {
    async fn on_module_init(&self) -> Result<(), LifecycleError>;
}

/// Called after every instance's `on_module_init` has completed.
///
/// This is the last hook before the application starts accepting
/// requests; use it for warm-up work that depends on other services
/// being initialized.
#[async_trait]
pub trait OnApplicationBootstrap: Send + Sync {
    async fn on_application_bootstrap(&self) -> Result<(), LifecycleError>;
}

/// First hook of the shutdown sequence.
#[async_trait]
pub trait OnModuleDestroy: Send + Sync {
    async fn on_module_destroy(&self) -> Result<(), LifecycleError>;
}

/// Runs after `on_module_destroy`, before the listener is torn down.
/// Receives the signal that initiated shutdown.
#[async_trait]
pub trait BeforeApplicationShutdown: Send + Sync {
    async fn before_application_shutdown(&self, signal: ShutdownSignal) -> Result<(), LifecycleError>;
}

/// Last hook of the shutdown sequence.
///
/// Use this hook to:
/// - Close database connections
/// - Flush buffers
/// - Release acquired resources
#[async_trait]
pub trait OnApplicationShutdown: Send + Sync {
    async fn on_application_shutdown(&self, signal: ShutdownSignal) -> Result<(), LifecycleError>;
}
