//! Type-erased lifecycle hook bindings.
//!
//! The source of truth for "does this instance implement hook X" is the
//! descriptor builder: each `on_*` builder method requires the matching
//! trait bound and records an adapter closure here. The factory and the
//! shutdown coordinator only ever see the erased closures, never the
//! concrete types.

use super::traits::{
    BeforeApplicationShutdown, OnApplicationBootstrap, OnApplicationShutdown, OnModuleDestroy,
    OnModuleInit, ShutdownSignal,
};
use super::LifecycleError;
use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub(crate) type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

type PhaseHookFn =
    Arc<dyn Fn(Arc<dyn Any + Send + Sync>) -> BoxFuture<Result<(), LifecycleError>> + Send + Sync>;
type SignalHookFn = Arc<
    dyn Fn(Arc<dyn Any + Send + Sync>, ShutdownSignal) -> BoxFuture<Result<(), LifecycleError>>
        + Send
        + Sync,
>;

/// The set of lifecycle hooks a registered instance participates in.
#[derive(Clone, Default)]
pub struct HookSet {
    pub(crate) on_init: Option<PhaseHookFn>,
    pub(crate) on_bootstrap: Option<PhaseHookFn>,
    pub(crate) on_destroy: Option<PhaseHookFn>,
    pub(crate) before_shutdown: Option<SignalHookFn>,
    pub(crate) on_shutdown: Option<SignalHookFn>,
}

impl HookSet {
    pub fn none() -> Self {
        Self::default()
    }

    pub(crate) fn bind_init<T: OnModuleInit + 'static>(&mut self) {
        self.on_init = Some(Arc::new(|instance| {
            let instance = downcast::<T>(instance);
            Box::pin(async move { instance.on_module_init().await })
        }));
    }

    pub(crate) fn bind_bootstrap<T: OnApplicationBootstrap + 'static>(&mut self) {
        self.on_bootstrap = Some(Arc::new(|instance| {
            let instance = downcast::<T>(instance);
            Box::pin(async move { instance.on_application_bootstrap().await })
        }));
    }

    pub(crate) fn bind_destroy<T: OnModuleDestroy + 'static>(&mut self) {
        self.on_destroy = Some(Arc::new(|instance| {
            let instance = downcast::<T>(instance);
            Box::pin(async move { instance.on_module_destroy().await })
        }));
    }

    pub(crate) fn bind_before_shutdown<T: BeforeApplicationShutdown + 'static>(&mut self) {
        self.before_shutdown = Some(Arc::new(|instance, signal| {
            let instance = downcast::<T>(instance);
            Box::pin(async move { instance.before_application_shutdown(signal).await })
        }));
    }

    pub(crate) fn bind_shutdown<T: OnApplicationShutdown + 'static>(&mut self) {
        self.on_shutdown = Some(Arc::new(|instance, signal| {
            let instance = downcast::<T>(instance);
            Box::pin(async move { instance.on_application_shutdown(signal).await })
        }));
    }
}

fn downcast<T: Send + Sync + 'static>(instance: Arc<dyn Any + Send + Sync>) -> Arc<T> {
    instance
        .downcast::<T>()
        .expect("lifecycle hook bound to a different type; this is a bug in armature")
}
