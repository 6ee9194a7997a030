//! The factory's record of every resolved instance.

use crate::lifecycle::HookSet;
use std::any::Any;
use std::sync::Arc;

/// What a registered instance is, from the module graph's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Module,
    Controller,
    Provider,
}

/// One resolved module / controller / provider instance.
///
/// Records accumulate in registration order during bootstrap and drive
/// every lifecycle phase; they are only removed by an explicit
/// [`AppFactory::reset`](crate::factory::AppFactory::reset).
#[derive(Clone)]
pub struct InstanceRecord {
    pub(crate) instance: Arc<dyn Any + Send + Sync>,
    pub(crate) role: Role,
    pub(crate) type_name: &'static str,
    pub(crate) module: &'static str,
    pub(crate) hooks: HookSet,
}

impl InstanceRecord {
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Name of the module that declared this instance.
    pub fn module(&self) -> &'static str {
        self.module
    }

    /// Downcast the live instance.
    pub fn instance<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.instance).downcast::<T>().ok()
    }
}
