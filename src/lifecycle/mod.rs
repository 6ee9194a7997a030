//! Lifecycle hooks and graceful shutdown.
//!
//! # Lifecycle Phases
//!
//! ```text
//! 1. Module Declaration (descriptors recorded)
//!    ↓
//! 2. Module Registration (providers / controllers / routes)
//!    ↓
//! 3. OnModuleInit (each instance)        ← Lifecycle Hook
//!    ↓
//! 4. OnApplicationBootstrap              ← Lifecycle Hook
//!    ↓
//! [Running...]
//!    ↓
//! 5. Shutdown Signal (SIGINT/SIGTERM)
//!    ↓
//! 6. OnModuleDestroy                     ← Lifecycle Hook
//!    ↓
//! 7. BeforeApplicationShutdown(signal)   ← Lifecycle Hook
//!    ↓
//! 8. OnApplicationShutdown(signal)       ← Lifecycle Hook
//!    ↓
//! 9. Process exit (0 on success, 1 on hook failure)
//! ```
//!
//! Within one phase, hooks run strictly sequentially in instance
//! registration order; a phase completes before the next begins.

mod error;
mod hookset;
mod shutdown;
mod traits;

pub use error::{LifecycleError, Result};
pub use hookset::HookSet;
pub(crate) use hookset::BoxFuture;
pub use shutdown::{wait_for_signal, ShutdownCoordinator};
pub use traits::{
    BeforeApplicationShutdown, OnApplicationBootstrap, OnApplicationShutdown, OnModuleDestroy,
    OnModuleInit, ShutdownSignal,
};
