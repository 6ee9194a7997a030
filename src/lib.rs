//! # Armature
//!
//! A declarative module, dependency-injection and routing façade over axum.
//!
//! Armature brings NestJS-style application structure to Rust: modules
//! declare their providers, controllers and imports; a bootstrap
//! orchestrator walks the module graph, resolves everything through a
//! DI container, mounts the declared routes onto an `axum::Router`, and
//! drives the application lifecycle from startup hooks through graceful
//! SIGINT/SIGTERM shutdown.
//!
//! ## Features
//!
//! - **Dependency Injection**: thread-safe container with constructor
//!   injection, singleton and transient lifetimes
//! - **Declarative Modules**: typed fluent builders for modules,
//!   providers, controllers and routes
//! - **Guards**: sequential, short-circuiting request authorization
//!   with a per-request execution context
//! - **Validation**: opt-in per-route schemas for body, params, query,
//!   headers and responses
//! - **Lifecycle Hooks**: `OnModuleInit`, `OnApplicationBootstrap`,
//!   `OnModuleDestroy`, `BeforeApplicationShutdown`,
//!   `OnApplicationShutdown`
//! - **Plugins**: per-module JWT context extraction, CORS, cron jobs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use armature::prelude::*;
//! use axum::{Json, Router};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! struct UserService;
//!
//! impl Injectable for UserService {
//!     fn inject(_registry: &dyn Registry) -> armature::Result<Self> {
//!         Ok(Self)
//!     }
//! }
//!
//! impl UserService {
//!     fn find_one(&self, id: &str) -> serde_json::Value {
//!         json!({ "id": id })
//!     }
//! }
//!
//! struct UserController {
//!     users: Arc<UserService>,
//! }
//!
//! impl Injectable for UserController {
//!     fn inject(registry: &dyn Registry) -> armature::Result<Self> {
//!         Ok(Self {
//!             users: registry.resolve::<UserService>()?,
//!         })
//!     }
//! }
//!
//! impl UserController {
//!     async fn get_user(self: Arc<Self>, ctx: RequestContext) -> armature::Result<Json<serde_json::Value>> {
//!         let id = ctx.param("id").unwrap_or_default();
//!         Ok(Json(self.users.find_one(id)))
//!     }
//! }
//!
//! #[derive(Default)]
//! struct UserModule;
//!
//! #[tokio::main]
//! async fn main() -> armature::Result<()> {
//!     let mut factory = AppFactory::new();
//!     factory.declare(
//!         ModuleDescriptor::of::<UserModule>()
//!             .provider(ProviderDef::of::<UserService>())
//!             .controller(
//!                 ControllerDef::of::<UserController>("/users").route(
//!                     RouteDef::get("/{id}", "get_user", |c: Arc<UserController>, ctx| {
//!                         c.get_user(ctx)
//!                     }),
//!                 ),
//!             ),
//!     );
//!
//!     let app = factory
//!         .bootstrap::<UserModule>(Router::new(), BootstrapOptions::default())
//!         .await?;
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//!     Ok(())
//! }
//! ```

pub mod di;
pub mod error;
pub mod factory;
pub mod guard;
pub mod http;
pub mod interceptor;
pub mod lifecycle;
pub mod logging;
pub mod metadata;
pub mod plugins;
pub mod validation;

// Re-export core types
pub use di::{Container, Injectable, Lifetime, Registry, RegistryExt};
pub use error::{Error, Result};
pub use factory::{AppFactory, BootstrapOptions};
pub use http::RequestContext;
pub use metadata::{ControllerDef, ModuleDescriptor, ProviderDef, RouteDef};

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use armature::prelude::*;
/// ```
pub mod prelude {
    pub use crate::di::{Container, Injectable, Lifetime, Registry, RegistryExt};
    pub use crate::error::{Error, Result};
    pub use crate::factory::{AppFactory, BootstrapOptions, InstanceRecord, Role};
    pub use crate::guard::{ExecutionContext, Guard, GuardRef};
    pub use crate::http::RequestContext;
    pub use crate::interceptor::{DefaultErrorHandler, ErrorHandler};
    pub use crate::lifecycle::{
        BeforeApplicationShutdown, LifecycleError, OnApplicationBootstrap, OnApplicationShutdown,
        OnModuleDestroy, OnModuleInit, ShutdownCoordinator, ShutdownSignal,
    };
    pub use crate::logging::{LogLevel, LogSink, Logger};
    pub use crate::metadata::{
        ControllerDef, HttpMethod, ModuleDescriptor, ModuleToken, ProviderDef, RouteDef, RouteDocs,
    };
    pub use crate::plugins::{CorsConfig, CronConfig, CronJob, JwtConfig, JwtContext};
    pub use crate::validation::{FieldIssue, Schema, SchemaSet, schema_fn};
}
