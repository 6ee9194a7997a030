use crate::di::{FactoryFn, Injectable};
use crate::error::Result;
use crate::guard::{Guard, GuardRef};
use crate::http::RequestContext;
use crate::lifecycle::{
    BeforeApplicationShutdown, BoxFuture, HookSet, OnApplicationBootstrap, OnApplicationShutdown,
    OnModuleDestroy, OnModuleInit,
};
use crate::validation::{Schema, SchemaSet};
use axum::response::{IntoResponse, Response};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// The HTTP methods a route descriptor can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

/// Documentation hints attached to a route. Carried on the descriptor
/// for external documentation tooling; the router itself ignores them.
#[derive(Debug, Clone, Default)]
pub struct RouteDocs {
    pub summary: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

pub(crate) type ErasedHandler = Arc<
    dyn Fn(Arc<dyn Any + Send + Sync>, RequestContext) -> BoxFuture<Result<Response>>
        + Send
        + Sync,
>;

/// A fully-built route descriptor: method, path fragment, handler, and
/// the optional validation/documentation/guard attachments.
#[derive(Clone)]
pub struct RouteDef {
    pub(crate) method: HttpMethod,
    pub(crate) path: String,
    pub(crate) handler_name: &'static str,
    pub(crate) handler: ErasedHandler,
    pub(crate) schemas: SchemaSet,
    pub(crate) docs: Option<RouteDocs>,
    pub(crate) guards: Vec<GuardRef>,
}

impl RouteDef {
    pub fn get<C, F, Fut, R>(path: &str, handler_name: &'static str, f: F) -> RouteBuilder<C>
    where
        C: Send + Sync + 'static,
        F: Fn(Arc<C>, RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R>> + Send + 'static,
        R: IntoResponse,
    {
        RouteBuilder::new(HttpMethod::Get, path, handler_name, f)
    }

    pub fn post<C, F, Fut, R>(path: &str, handler_name: &'static str, f: F) -> RouteBuilder<C>
    where
        C: Send + Sync + 'static,
        F: Fn(Arc<C>, RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R>> + Send + 'static,
        R: IntoResponse,
    {
        RouteBuilder::new(HttpMethod::Post, path, handler_name, f)
    }

    pub fn put<C, F, Fut, R>(path: &str, handler_name: &'static str, f: F) -> RouteBuilder<C>
    where
        C: Send + Sync + 'static,
        F: Fn(Arc<C>, RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R>> + Send + 'static,
        R: IntoResponse,
    {
        RouteBuilder::new(HttpMethod::Put, path, handler_name, f)
    }

    pub fn delete<C, F, Fut, R>(path: &str, handler_name: &'static str, f: F) -> RouteBuilder<C>
    where
        C: Send + Sync + 'static,
        F: Fn(Arc<C>, RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R>> + Send + 'static,
        R: IntoResponse,
    {
        RouteBuilder::new(HttpMethod::Delete, path, handler_name, f)
    }

    pub fn patch<C, F, Fut, R>(path: &str, handler_name: &'static str, f: F) -> RouteBuilder<C>
    where
        C: Send + Sync + 'static,
        F: Fn(Arc<C>, RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R>> + Send + 'static,
        R: IntoResponse,
    {
        RouteBuilder::new(HttpMethod::Patch, path, handler_name, f)
    }
}

/// Typed route builder; the controller type parameter keeps handler and
/// guard bindings honest at compile time.
pub struct RouteBuilder<C> {
    method: HttpMethod,
    path: String,
    handler_name: &'static str,
    handler: ErasedHandler,
    schemas: SchemaSet,
    docs: Option<RouteDocs>,
    guards: Vec<GuardRef>,
    _marker: PhantomData<C>,
}

impl<C: Send + Sync + 'static> RouteBuilder<C> {
    fn new<F, Fut, R>(method: HttpMethod, path: &str, handler_name: &'static str, f: F) -> Self
    where
        F: Fn(Arc<C>, RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R>> + Send + 'static,
        R: IntoResponse,
    {
        let f = Arc::new(f);
        let handler: ErasedHandler = Arc::new(move |instance, ctx| {
            let f = Arc::clone(&f);
            let instance = instance
                .downcast::<C>()
                .expect("route handler bound to a different controller type; this is a bug in armature");
            Box::pin(async move { f(instance, ctx).await.map(IntoResponse::into_response) })
        });
        Self {
            method,
            path: path.to_string(),
            handler_name,
            handler,
            schemas: SchemaSet::default(),
            docs: None,
            guards: Vec::new(),
            _marker: PhantomData,
        }
    }

    pub fn body(mut self, schema: impl Schema + 'static) -> Self {
        self.schemas.body = Some(Arc::new(schema));
        self
    }

    pub fn params(mut self, schema: impl Schema + 'static) -> Self {
        self.schemas.params = Some(Arc::new(schema));
        self
    }

    pub fn query(mut self, schema: impl Schema + 'static) -> Self {
        self.schemas.query = Some(Arc::new(schema));
        self
    }

    pub fn headers(mut self, schema: impl Schema + 'static) -> Self {
        self.schemas.headers = Some(Arc::new(schema));
        self
    }

    pub fn response(mut self, schema: impl Schema + 'static) -> Self {
        self.schemas.response = Some(Arc::new(schema));
        self
    }

    pub fn docs(mut self, docs: RouteDocs) -> Self {
        self.docs = Some(docs);
        self
    }

    /// Attach a guard; guards run in the order they were attached.
    pub fn guard<G: Guard + Injectable>(mut self) -> Self {
        self.guards.push(GuardRef::of::<G>());
        self
    }

    pub(crate) fn build(self) -> RouteDef {
        RouteDef {
            method: self.method,
            path: self.path,
            handler_name: self.handler_name,
            handler: self.handler,
            schemas: self.schemas,
            docs: self.docs,
            guards: self.guards,
        }
    }
}

/// A controller declaration: base path, constructor, routes, and guard
/// lists recorded against handler names.
#[derive(Clone)]
pub struct ControllerDef {
    pub(crate) id: TypeId,
    pub(crate) name: &'static str,
    pub(crate) base_path: String,
    pub(crate) factory: FactoryFn,
    pub(crate) hooks: HookSet,
    pub(crate) routes: Vec<RouteDef>,
    pub(crate) handler_guards: HashMap<&'static str, Vec<GuardRef>>,
}

impl ControllerDef {
    pub fn of<C: Injectable>(base_path: &str) -> ControllerBuilder<C> {
        ControllerBuilder {
            base_path: base_path.to_string(),
            routes: Vec::new(),
            handler_guards: HashMap::new(),
            hooks: HookSet::none(),
            _marker: PhantomData,
        }
    }
}

pub struct ControllerBuilder<C> {
    base_path: String,
    routes: Vec<RouteDef>,
    handler_guards: HashMap<&'static str, Vec<GuardRef>>,
    hooks: HookSet,
    _marker: PhantomData<C>,
}

impl<C: Injectable> ControllerBuilder<C> {
    pub fn route(mut self, route: RouteBuilder<C>) -> Self {
        self.routes.push(route.build());
        self
    }

    /// Record guards against a handler name instead of on the route.
    ///
    /// Routes without guards of their own fall back to this map, so
    /// guard lists and route definitions can be declared in either
    /// order.
    pub fn guards_for(mut self, handler_name: &'static str, guards: Vec<GuardRef>) -> Self {
        self.handler_guards.entry(handler_name).or_default().extend(guards);
        self
    }

    pub fn on_module_init(mut self) -> Self
    where
        C: OnModuleInit,
    {
        self.hooks.bind_init::<C>();
        self
    }

    pub fn on_application_bootstrap(mut self) -> Self
    where
        C: OnApplicationBootstrap,
    {
        self.hooks.bind_bootstrap::<C>();
        self
    }

    pub fn on_module_destroy(mut self) -> Self
    where
        C: OnModuleDestroy,
    {
        self.hooks.bind_destroy::<C>();
        self
    }

    pub fn before_application_shutdown(mut self) -> Self
    where
        C: BeforeApplicationShutdown,
    {
        self.hooks.bind_before_shutdown::<C>();
        self
    }

    pub fn on_application_shutdown(mut self) -> Self
    where
        C: OnApplicationShutdown,
    {
        self.hooks.bind_shutdown::<C>();
        self
    }

    pub fn build(self) -> ControllerDef {
        ControllerDef {
            id: TypeId::of::<C>(),
            name: std::any::type_name::<C>(),
            base_path: self.base_path,
            factory: Arc::new(|registry| {
                C::inject(registry).map(|c| Arc::new(c) as Arc<dyn Any + Send + Sync>)
            }),
            hooks: self.hooks,
            routes: self.routes,
            handler_guards: self.handler_guards,
        }
    }
}

impl<C: Injectable> From<ControllerBuilder<C>> for ControllerDef {
    fn from(builder: ControllerBuilder<C>) -> Self {
        builder.build()
    }
}
