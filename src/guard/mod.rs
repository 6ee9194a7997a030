//! Route guards.
//!
//! A guard inspects the incoming request's execution context and decides
//! whether the handler may run. Guards on a route execute strictly
//! sequentially in declaration order and short-circuit on the first
//! rejection: `Ok(false)` maps to the status the guard set on the
//! context (401 if it set none) with a generic unauthorized body, and
//! `Err(_)` surfaces through the error interceptor as a 500. Foreseeable
//! failures belong in a `false` return with an explicit status, not in
//! an error.

mod context;

pub use context::ExecutionContext;

use crate::di::{Injectable, Lifetime, Registry, RegistryExt};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait Guard: Send + Sync {
    async fn can_activate(&self, ctx: &mut ExecutionContext) -> Result<bool>;
}

/// A reference to a guard type, resolved through the DI container when
/// the route is mounted. Unknown guards are registered as singletons on
/// first use.
#[derive(Clone)]
pub struct GuardRef {
    pub(crate) name: &'static str,
    pub(crate) resolve: Arc<dyn Fn(&dyn Registry) -> Result<Arc<dyn Guard>> + Send + Sync>,
}

impl GuardRef {
    pub fn of<G: Guard + Injectable>() -> Self {
        Self {
            name: std::any::type_name::<G>(),
            resolve: Arc::new(|registry| {
                if !registry.contains::<G>() {
                    registry.register::<G>(Lifetime::Singleton);
                }
                let guard: Arc<dyn Guard> = registry.resolve::<G>()?;
                Ok(guard)
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}
