//! The registration and bootstrap orchestrator.
//!
//! [`AppFactory`] owns the metadata store, the dependency container and
//! the instance registry, and walks a declared module graph into a
//! mounted `axum::Router`:
//!
//! 1. depth-first registration of imports (idempotent, so diamond
//!    imports register once),
//! 2. providers: factory registration, eager resolution, record,
//! 3. plugins in JWT → CORS → cron order,
//! 4. controllers: resolve, record, mount routes on an isolated
//!    subtree, apply the retained JWT layer, merge,
//! 5. the module instance itself.
//!
//! After registration, `on_module_init` and `on_application_bootstrap`
//! run over the instance registry sequentially in registration order,
//! the CORS layer and not-found fallback are applied, and the shutdown
//! coordinator is installed.

mod options;
mod registry;

pub use options::{BootstrapOptions, DEFAULT_IGNORED_PATHS};
pub use registry::{InstanceRecord, Role};

use crate::di::{Container, Lifetime, Registry};
use crate::error::{Error, Result};
use crate::http::{RouteRuntime, join_paths, mount_route};
use crate::interceptor::{DefaultErrorHandler, ErrorHandler};
use crate::lifecycle::{LifecycleError, ShutdownCoordinator};
use crate::logging::Logger;
use crate::metadata::{ControllerDef, MetadataStore, ModuleDescriptor, ModuleToken};
use crate::plugins::{CorsConfig, JwtLayer, build_cors_layer, spawn_cron_jobs};
use axum::Router;
use axum::body::Body;
use axum::extract::Request;
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::task::JoinHandle;

pub struct AppFactory {
    metadata: MetadataStore,
    registry: Arc<dyn Registry>,
    registered: HashSet<TypeId>,
    instances: Vec<InstanceRecord>,
    jwt: Option<JwtLayer>,
    cors: Option<CorsConfig>,
    cron_handles: Vec<JoinHandle<()>>,
    logger: Logger,
    error_handler: Arc<dyn ErrorHandler>,
    coordinator: Option<Arc<ShutdownCoordinator>>,
}

impl AppFactory {
    pub fn new() -> Self {
        Self::with_registry(Arc::new(Container::new()))
    }

    /// Build a factory over a caller-supplied container.
    pub fn with_registry(registry: Arc<dyn Registry>) -> Self {
        let logger = Logger::default();
        Self {
            metadata: MetadataStore::new(),
            registry,
            registered: HashSet::new(),
            instances: Vec::new(),
            jwt: None,
            cors: None,
            cron_handles: Vec::new(),
            error_handler: Arc::new(DefaultErrorHandler::new(logger.clone())),
            logger,
            coordinator: None,
        }
    }

    /// Record a module descriptor. Modules must be declared before the
    /// bootstrap that reaches them.
    pub fn declare(&self, descriptor: impl Into<ModuleDescriptor>) {
        self.metadata.annotate(descriptor.into());
    }

    /// Register the module graph rooted at `M`, run the startup
    /// lifecycle phases, and finish the router (CORS layer, not-found
    /// fallback, shutdown coordinator). Any error aborts the whole
    /// bootstrap.
    pub async fn bootstrap<M: 'static>(
        &mut self,
        router: Router,
        options: BootstrapOptions,
    ) -> Result<Router> {
        self.logger = Logger::new(options.verbose, options.logger.clone());
        self.error_handler = match &options.error_handler {
            Some(handler) => Arc::clone(handler),
            None => Arc::new(DefaultErrorHandler::new(self.logger.clone())),
        };

        self.logger.info("Starting application bootstrap");
        let mut router = self.register_module(ModuleToken::of::<M>(), router)?;

        self.run_init_hooks().await?;
        self.run_bootstrap_hooks().await?;

        if let Some(cors) = &self.cors {
            router = router.layer(build_cors_layer(cors)?);
        }

        if options.enable_error_handling {
            let ignored = Arc::new(options.ignored_set());
            let handler = Arc::clone(&self.error_handler);
            router = router.fallback(move |req: Request<Body>| {
                let handler = Arc::clone(&handler);
                let ignored = Arc::clone(&ignored);
                async move {
                    let path = req.uri().path().to_string();
                    handler.not_found(&path, ignored.contains(&path))
                }
            });
        }

        let coordinator = Arc::new(ShutdownCoordinator::new(
            Arc::new(self.instances.clone()),
            self.logger.clone(),
        ));
        let _ = coordinator.install();
        self.coordinator = Some(coordinator);

        self.logger.info(&format!(
            "Bootstrap complete: {} modules, {} instances",
            self.registered.len(),
            self.instances.len()
        ));
        Ok(router)
    }

    /// Register one module and, depth-first, everything it imports.
    /// Idempotent: a module already in the registered set is skipped, so
    /// diamond imports register once and import cycles terminate.
    pub fn register_module(&mut self, token: ModuleToken, mut router: Router) -> Result<Router> {
        if self.registered.contains(&token.id) {
            return Ok(router);
        }
        let descriptor = self.metadata.module(&token).ok_or_else(|| {
            Error::config(format!(
                "{} is not a module. Declare it with AppFactory::declare before bootstrapping",
                token.name
            ))
        })?;
        // Mark before recursing into imports so cyclic graphs terminate.
        self.registered.insert(token.id);
        self.logger.info(&format!("Registering module {}", token.name));

        for import in &descriptor.imports {
            router = self.register_module(*import, router)?;
        }

        for provider in &descriptor.providers {
            self.registry.register_factory(
                provider.id,
                provider.name,
                provider.lifetime,
                Arc::clone(&provider.factory),
            );
            let instance = self.registry.resolve_any(provider.id, provider.name)?;
            self.instances.push(InstanceRecord {
                instance,
                role: Role::Provider,
                type_name: provider.name,
                module: token.name,
                hooks: provider.hooks.clone(),
            });
        }

        if let Some(jwt) = &descriptor.plugins.jwt {
            self.logger.info(&format!("JWT plugin enabled for {}", token.name));
            self.jwt = Some(JwtLayer::new(jwt));
        }
        if let Some(cors) = &descriptor.plugins.cors {
            self.logger.info(&format!("CORS plugin enabled for {}", token.name));
            self.cors = Some(cors.clone());
        }
        if let Some(cron) = &descriptor.plugins.cron {
            self.cron_handles.extend(spawn_cron_jobs(cron, &self.logger));
        }

        for controller in &descriptor.controllers {
            router = self.register_controller(controller, token.name, router)?;
        }

        self.instances.push(InstanceRecord {
            instance: (descriptor.construct)(),
            role: Role::Module,
            type_name: token.name,
            module: token.name,
            hooks: descriptor.hooks.clone(),
        });
        Ok(router)
    }

    /// Resolve a controller and mount its routes on an isolated subtree,
    /// then merge the subtree into the router. The retained JWT layer is
    /// re-applied per subtree because a merged router does not inherit
    /// layers from its parent.
    fn register_controller(
        &mut self,
        def: &ControllerDef,
        module: &'static str,
        router: Router,
    ) -> Result<Router> {
        if !self.registry.is_registered(def.id) {
            self.registry.register_factory(
                def.id,
                def.name,
                Lifetime::Singleton,
                Arc::clone(&def.factory),
            );
        }
        let instance = self.registry.resolve_any(def.id, def.name)?;
        self.instances.push(InstanceRecord {
            instance: Arc::clone(&instance),
            role: Role::Controller,
            type_name: def.name,
            module,
            hooks: def.hooks.clone(),
        });

        let mut subtree = Router::new();
        for route in &def.routes {
            // Guards on the route win; otherwise fall back to the
            // controller's per-handler guard map.
            let guard_refs = if route.guards.is_empty() {
                def.handler_guards
                    .get(route.handler_name)
                    .cloned()
                    .unwrap_or_default()
            } else {
                route.guards.clone()
            };
            let mut guards = Vec::with_capacity(guard_refs.len());
            for guard_ref in &guard_refs {
                guards.push((guard_ref.resolve)(self.registry.as_ref())?);
            }

            let path = join_paths(&def.base_path, &route.path);
            self.logger
                .info(&format!("Mounted {} {}", route.method.as_str(), path));
            let runtime = Arc::new(RouteRuntime {
                controller: Arc::clone(&instance),
                controller_name: def.name,
                handler_name: route.handler_name,
                handler: Arc::clone(&route.handler),
                schemas: route.schemas.clone(),
                guards,
                error_handler: Arc::clone(&self.error_handler),
            });
            subtree = mount_route(runtime, subtree, &path, route.method);
        }

        if let Some(jwt) = &self.jwt {
            subtree = subtree.layer(jwt.clone());
        }
        Ok(router.merge(subtree))
    }

    async fn run_init_hooks(&self) -> Result<()> {
        for record in &self.instances {
            if let Some(hook) = &record.hooks.on_init {
                hook(Arc::clone(&record.instance)).await.map_err(|e| {
                    self.logger.error(&format!(
                        "onModuleInit failed for {}: {}",
                        record.type_name, e
                    ));
                    LifecycleError::hook_failed(record.type_name, e.to_string())
                })?;
            }
        }
        Ok(())
    }

    async fn run_bootstrap_hooks(&self) -> Result<()> {
        for record in &self.instances {
            if let Some(hook) = &record.hooks.on_bootstrap {
                hook(Arc::clone(&record.instance)).await.map_err(|e| {
                    self.logger.error(&format!(
                        "onApplicationBootstrap failed for {}: {}",
                        record.type_name, e
                    ));
                    LifecycleError::hook_failed(record.type_name, e.to_string())
                })?;
            }
        }
        Ok(())
    }

    /// Forget everything a previous bootstrap produced: registered
    /// modules, instance records, retained plugin state, cron tasks and
    /// the container's contents. Declared metadata survives, so a
    /// subsequent bootstrap re-registers the graph from scratch.
    pub fn reset(&mut self) {
        for handle in self.cron_handles.drain(..) {
            handle.abort();
        }
        self.registered.clear();
        self.instances.clear();
        self.jwt = None;
        self.cors = None;
        self.coordinator = None;
        self.registry.clear();
        self.logger.info("Factory reset");
    }

    /// Records for every registered instance, in registration order.
    pub fn instances(&self) -> &[InstanceRecord] {
        &self.instances
    }

    pub fn module_registered<M: 'static>(&self) -> bool {
        self.registered.contains(&TypeId::of::<M>())
    }

    pub fn registered_module_count(&self) -> usize {
        self.registered.len()
    }

    /// Present after a successful bootstrap.
    pub fn shutdown_coordinator(&self) -> Option<Arc<ShutdownCoordinator>> {
        self.coordinator.clone()
    }

    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    pub fn registry(&self) -> &Arc<dyn Registry> {
        &self.registry
    }

    /// Instance records grouped by owning module, mostly useful for
    /// debugging a registration order.
    pub fn instances_by_module(&self) -> HashMap<&'static str, Vec<&InstanceRecord>> {
        let mut grouped: HashMap<&'static str, Vec<&InstanceRecord>> = HashMap::new();
        for record in &self.instances {
            grouped.entry(record.module).or_default().push(record);
        }
        grouped
    }
}

impl Default for AppFactory {
    fn default() -> Self {
        Self::new()
    }
}
