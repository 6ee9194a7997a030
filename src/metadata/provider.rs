use crate::di::{FactoryFn, Injectable, Lifetime};
use crate::lifecycle::{
    BeforeApplicationShutdown, HookSet, OnApplicationBootstrap, OnApplicationShutdown,
    OnModuleDestroy, OnModuleInit,
};
use std::any::{Any, TypeId};
use std::marker::PhantomData;
use std::sync::Arc;

/// A provider declaration: how to construct the type, its lifetime, and
/// which lifecycle hooks its instance participates in.
#[derive(Clone)]
pub struct ProviderDef {
    pub(crate) id: TypeId,
    pub(crate) name: &'static str,
    pub(crate) lifetime: Lifetime,
    pub(crate) factory: FactoryFn,
    pub(crate) hooks: HookSet,
}

impl ProviderDef {
    /// Start declaring a provider.
    ///
    /// # Example
    /// ```ignore
    /// ModuleDescriptor::of::<UserModule>()
    ///     .provider(ProviderDef::of::<UserService>().on_module_init())
    /// ```
    pub fn of<T: Injectable>() -> ProviderBuilder<T> {
        ProviderBuilder {
            lifetime: Lifetime::Singleton,
            hooks: HookSet::none(),
            _marker: PhantomData,
        }
    }
}

pub struct ProviderBuilder<T> {
    lifetime: Lifetime,
    hooks: HookSet,
    _marker: PhantomData<T>,
}

impl<T: Injectable> ProviderBuilder<T> {
    /// Construct a fresh instance on every resolve instead of caching a
    /// singleton.
    pub fn transient(mut self) -> Self {
        self.lifetime = Lifetime::Transient;
        self
    }

    pub fn on_module_init(mut self) -> Self
    where
        T: OnModuleInit,
    {
        self.hooks.bind_init::<T>();
        self
    }

    pub fn on_application_bootstrap(mut self) -> Self
    where
        T: OnApplicationBootstrap,
    {
        self.hooks.bind_bootstrap::<T>();
        self
    }

    pub fn on_module_destroy(mut self) -> Self
    where
        T: OnModuleDestroy,
    {
        self.hooks.bind_destroy::<T>();
        self
    }

    pub fn before_application_shutdown(mut self) -> Self
    where
        T: BeforeApplicationShutdown,
    {
        self.hooks.bind_before_shutdown::<T>();
        self
    }

    pub fn on_application_shutdown(mut self) -> Self
    where
        T: OnApplicationShutdown,
    {
        self.hooks.bind_shutdown::<T>();
        self
    }

    pub fn build(self) -> ProviderDef {
        ProviderDef {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            lifetime: self.lifetime,
            factory: Arc::new(|registry| {
                T::inject(registry).map(|t| Arc::new(t) as Arc<dyn Any + Send + Sync>)
            }),
            hooks: self.hooks,
        }
    }
}

impl<T: Injectable> From<ProviderBuilder<T>> for ProviderDef {
    fn from(builder: ProviderBuilder<T>) -> Self {
        builder.build()
    }
}
