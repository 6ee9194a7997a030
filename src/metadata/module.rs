use crate::lifecycle::{
    BeforeApplicationShutdown, HookSet, OnApplicationBootstrap, OnApplicationShutdown,
    OnModuleDestroy, OnModuleInit,
};
use crate::metadata::{ControllerDef, ProviderDef};
use crate::plugins::{CorsConfig, CronConfig, JwtConfig, PluginConfig};
use std::any::{Any, TypeId};
use std::marker::PhantomData;
use std::sync::Arc;

/// A reference to a module type, usable before (or without) its
/// descriptor being declared. Registration fails fast when the factory
/// meets a token with no recorded descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleToken {
    pub(crate) id: TypeId,
    pub(crate) name: &'static str,
}

impl ModuleToken {
    pub fn of<M: 'static>() -> Self {
        Self {
            id: TypeId::of::<M>(),
            name: std::any::type_name::<M>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// A module's recorded metadata: imports, providers, controllers,
/// exports, plugin configuration and the module instance's own hook
/// bindings. Created once by the declaration builder, immutable
/// afterwards; consumed read-only during bootstrap.
pub struct ModuleDescriptor {
    pub(crate) token: ModuleToken,
    pub(crate) imports: Vec<ModuleToken>,
    pub(crate) providers: Vec<ProviderDef>,
    pub(crate) controllers: Vec<ControllerDef>,
    pub(crate) exports: Vec<&'static str>,
    pub(crate) plugins: PluginConfig,
    pub(crate) construct: fn() -> Arc<dyn Any + Send + Sync>,
    pub(crate) hooks: HookSet,
}

impl ModuleDescriptor {
    /// Start declaring a module. The module type only needs `Default`;
    /// its instance is constructed with no arguments at registration
    /// time so it can participate in lifecycle hooks.
    pub fn of<M: Default + Send + Sync + 'static>() -> ModuleBuilder<M> {
        ModuleBuilder {
            imports: Vec::new(),
            providers: Vec::new(),
            controllers: Vec::new(),
            exports: Vec::new(),
            plugins: PluginConfig::default(),
            hooks: HookSet::none(),
            _marker: PhantomData,
        }
    }

    pub fn token(&self) -> ModuleToken {
        self.token
    }
}

fn construct_module<M: Default + Send + Sync + 'static>() -> Arc<dyn Any + Send + Sync> {
    Arc::new(M::default())
}

pub struct ModuleBuilder<M> {
    imports: Vec<ModuleToken>,
    providers: Vec<ProviderDef>,
    controllers: Vec<ControllerDef>,
    exports: Vec<&'static str>,
    plugins: PluginConfig,
    hooks: HookSet,
    _marker: PhantomData<M>,
}

impl<M: Default + Send + Sync + 'static> ModuleBuilder<M> {
    /// Import another module. Imports register depth-first, in the
    /// order they are listed, before this module's own providers.
    pub fn import<I: 'static>(mut self) -> Self {
        self.imports.push(ModuleToken::of::<I>());
        self
    }

    pub fn provider(mut self, provider: impl Into<ProviderDef>) -> Self {
        self.providers.push(provider.into());
        self
    }

    pub fn controller(mut self, controller: impl Into<ControllerDef>) -> Self {
        self.controllers.push(controller.into());
        self
    }

    /// Record a provider as exported. With a single shared container
    /// exports do not gate visibility; the list is informational.
    pub fn export<T: 'static>(mut self) -> Self {
        self.exports.push(std::any::type_name::<T>());
        self
    }

    pub fn jwt(mut self, config: JwtConfig) -> Self {
        self.plugins.jwt = Some(config);
        self
    }

    pub fn cors(mut self, config: CorsConfig) -> Self {
        self.plugins.cors = Some(config);
        self
    }

    pub fn cron(mut self, config: CronConfig) -> Self {
        self.plugins.cron = Some(config);
        self
    }

    pub fn on_module_init(mut self) -> Self
    where
        M: OnModuleInit,
    {
        self.hooks.bind_init::<M>();
        self
    }

    pub fn on_application_bootstrap(mut self) -> Self
    where
        M: OnApplicationBootstrap,
    {
        self.hooks.bind_bootstrap::<M>();
        self
    }

    pub fn on_module_destroy(mut self) -> Self
    where
        M: OnModuleDestroy,
    {
        self.hooks.bind_destroy::<M>();
        self
    }

    pub fn before_application_shutdown(mut self) -> Self
    where
        M: BeforeApplicationShutdown,
    {
        self.hooks.bind_before_shutdown::<M>();
        self
    }

    pub fn on_application_shutdown(mut self) -> Self
    where
        M: OnApplicationShutdown,
    {
        self.hooks.bind_shutdown::<M>();
        self
    }

    pub fn build(self) -> ModuleDescriptor {
        ModuleDescriptor {
            token: ModuleToken::of::<M>(),
            imports: self.imports,
            providers: self.providers,
            controllers: self.controllers,
            exports: self.exports,
            plugins: self.plugins,
            construct: construct_module::<M>,
            hooks: self.hooks,
        }
    }
}

impl<M: Default + Send + Sync + 'static> From<ModuleBuilder<M>> for ModuleDescriptor {
    fn from(builder: ModuleBuilder<M>) -> Self {
        builder.build()
    }
}
