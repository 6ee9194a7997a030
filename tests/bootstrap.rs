//! End-to-end tests over a bootstrapped router.

use armature::prelude::*;
use armature::axum::body::Body;
use armature::axum::http::{Request, StatusCode};
use armature::axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

static TRACING: Once = Once::new();

/// Route framework logs through a test-writer subscriber so they show
/// up under `--nocapture`.
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// Event recorder resolved through the container so services and guards
/// can report what happened to the test body.
#[derive(Default)]
struct Probe {
    events: Mutex<Vec<String>>,
}

impl Probe {
    fn log(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

async fn body_json(response: armature::axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> armature::axum::response::Response {
    use tower::ServiceExt;
    app.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// ---------------------------------------------------------------------------
// Scenario: module A imports module B; A's provider and controller use
// B's exported service.
// ---------------------------------------------------------------------------

struct ServiceB;

impl Injectable for ServiceB {
    fn inject(_registry: &dyn Registry) -> armature::Result<Self> {
        Ok(Self)
    }
}

impl ServiceB {
    fn suffix(&self) -> &'static str {
        "from b"
    }
}

struct ServiceA {
    b: Arc<ServiceB>,
}

impl Injectable for ServiceA {
    fn inject(registry: &dyn Registry) -> armature::Result<Self> {
        Ok(Self {
            b: registry.resolve::<ServiceB>()?,
        })
    }
}

impl ServiceA {
    fn message(&self) -> String {
        format!("hello {}", self.b.suffix())
    }
}

struct AlphaController {
    a: Arc<ServiceA>,
}

impl Injectable for AlphaController {
    fn inject(registry: &dyn Registry) -> armature::Result<Self> {
        Ok(Self {
            a: registry.resolve::<ServiceA>()?,
        })
    }
}

#[derive(Default)]
struct ModuleB;

#[derive(Default)]
struct ModuleA;

#[tokio::test]
async fn imported_module_provider_is_visible_downstream() {
    init_tracing();
    let mut factory = AppFactory::new();
    factory.declare(
        ModuleDescriptor::of::<ModuleB>()
            .provider(ProviderDef::of::<ServiceB>())
            .export::<ServiceB>(),
    );
    factory.declare(
        ModuleDescriptor::of::<ModuleA>()
            .import::<ModuleB>()
            .provider(ProviderDef::of::<ServiceA>())
            .controller(ControllerDef::of::<AlphaController>("/alpha").route(
                RouteDef::get("/greet", "greet", |c: Arc<AlphaController>, _ctx| async move {
                    Ok(Json(json!({ "message": c.a.message() })))
                }),
            )),
    );

    let app = factory
        .bootstrap::<ModuleA>(Router::new(), BootstrapOptions::default())
        .await
        .unwrap();

    assert!(factory.module_registered::<ModuleA>());
    assert!(factory.module_registered::<ModuleB>());

    // Imports register depth-first, so B's provider precedes A's.
    let providers: Vec<&str> = factory
        .instances()
        .iter()
        .filter(|record| record.role() == Role::Provider)
        .map(|record| record.type_name())
        .collect();
    assert!(providers[0].ends_with("ServiceB"));
    assert!(providers[1].ends_with("ServiceA"));

    let response = send(&app, get("/alpha/greet")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "hello from b");
}

// ---------------------------------------------------------------------------
// P1: diamond imports register the shared module once.
// ---------------------------------------------------------------------------

struct SharedService;

impl Injectable for SharedService {
    fn inject(registry: &dyn Registry) -> armature::Result<Self> {
        registry.resolve::<Probe>()?.log("shared:new");
        Ok(Self)
    }
}

#[derive(Default)]
struct DiamondBottom;

#[derive(Default)]
struct DiamondLeft;

#[derive(Default)]
struct DiamondRight;

#[derive(Default)]
struct DiamondTop;

#[tokio::test]
async fn diamond_imports_register_once() {
    init_tracing();
    let mut factory = AppFactory::new();
    factory.registry().provide_value(Probe::default());
    factory.declare(
        ModuleDescriptor::of::<DiamondBottom>().provider(ProviderDef::of::<SharedService>()),
    );
    factory.declare(ModuleDescriptor::of::<DiamondLeft>().import::<DiamondBottom>());
    factory.declare(ModuleDescriptor::of::<DiamondRight>().import::<DiamondBottom>());
    factory.declare(
        ModuleDescriptor::of::<DiamondTop>()
            .import::<DiamondLeft>()
            .import::<DiamondRight>(),
    );

    factory
        .bootstrap::<DiamondTop>(Router::new(), BootstrapOptions::default())
        .await
        .unwrap();

    assert_eq!(factory.registered_module_count(), 4);
    let probe = factory.registry().resolve::<Probe>().unwrap();
    assert_eq!(probe.events(), vec!["shared:new"]);

    let shared_records = factory
        .instances()
        .iter()
        .filter(|record| record.type_name().ends_with("SharedService"))
        .count();
    assert_eq!(shared_records, 1);
}

// ---------------------------------------------------------------------------
// P2: all on_module_init hooks complete before any on_application_bootstrap,
// each phase in registration order.
// ---------------------------------------------------------------------------

struct FirstService {
    probe: Arc<Probe>,
}

impl Injectable for FirstService {
    fn inject(registry: &dyn Registry) -> armature::Result<Self> {
        Ok(Self {
            probe: registry.resolve::<Probe>()?,
        })
    }
}

#[armature::async_trait]
impl OnModuleInit for FirstService {
    async fn on_module_init(&self) -> std::result::Result<(), LifecycleError> {
        self.probe.log("first:init");
        Ok(())
    }
}

#[armature::async_trait]
impl OnApplicationBootstrap for FirstService {
    async fn on_application_bootstrap(&self) -> std::result::Result<(), LifecycleError> {
        self.probe.log("first:bootstrap");
        Ok(())
    }
}

struct SecondService {
    probe: Arc<Probe>,
}

impl Injectable for SecondService {
    fn inject(registry: &dyn Registry) -> armature::Result<Self> {
        Ok(Self {
            probe: registry.resolve::<Probe>()?,
        })
    }
}

#[armature::async_trait]
impl OnModuleInit for SecondService {
    async fn on_module_init(&self) -> std::result::Result<(), LifecycleError> {
        self.probe.log("second:init");
        Ok(())
    }
}

#[armature::async_trait]
impl OnApplicationBootstrap for SecondService {
    async fn on_application_bootstrap(&self) -> std::result::Result<(), LifecycleError> {
        self.probe.log("second:bootstrap");
        Ok(())
    }
}

#[derive(Default)]
struct HookModule;

#[tokio::test]
async fn init_phase_completes_before_bootstrap_phase() {
    init_tracing();
    let mut factory = AppFactory::new();
    factory.registry().provide_value(Probe::default());
    factory.declare(
        ModuleDescriptor::of::<HookModule>()
            .provider(
                ProviderDef::of::<FirstService>()
                    .on_module_init()
                    .on_application_bootstrap(),
            )
            .provider(
                ProviderDef::of::<SecondService>()
                    .on_module_init()
                    .on_application_bootstrap(),
            ),
    );

    factory
        .bootstrap::<HookModule>(Router::new(), BootstrapOptions::default())
        .await
        .unwrap();

    let probe = factory.registry().resolve::<Probe>().unwrap();
    assert_eq!(
        probe.events(),
        vec![
            "first:init",
            "second:init",
            "first:bootstrap",
            "second:bootstrap"
        ]
    );
}

// ---------------------------------------------------------------------------
// P3 / P4: guard data propagation and short-circuiting rejection.
// ---------------------------------------------------------------------------

struct AttachGuard;

impl Injectable for AttachGuard {
    fn inject(_registry: &dyn Registry) -> armature::Result<Self> {
        Ok(Self)
    }
}

#[armature::async_trait]
impl Guard for AttachGuard {
    async fn can_activate(&self, ctx: &mut ExecutionContext) -> armature::Result<bool> {
        ctx.set_data("user", json!("alice"));
        Ok(true)
    }
}

struct DenyGuard {
    probe: Arc<Probe>,
}

impl Injectable for DenyGuard {
    fn inject(registry: &dyn Registry) -> armature::Result<Self> {
        Ok(Self {
            probe: registry.resolve::<Probe>()?,
        })
    }
}

#[armature::async_trait]
impl Guard for DenyGuard {
    async fn can_activate(&self, ctx: &mut ExecutionContext) -> armature::Result<bool> {
        self.probe.log("deny:evaluated");
        ctx.set_status(StatusCode::FORBIDDEN);
        Ok(false)
    }
}

struct NeverGuard {
    probe: Arc<Probe>,
}

impl Injectable for NeverGuard {
    fn inject(registry: &dyn Registry) -> armature::Result<Self> {
        Ok(Self {
            probe: registry.resolve::<Probe>()?,
        })
    }
}

#[armature::async_trait]
impl Guard for NeverGuard {
    async fn can_activate(&self, _ctx: &mut ExecutionContext) -> armature::Result<bool> {
        self.probe.log("never:evaluated");
        Ok(true)
    }
}

struct GuardedController;

impl Injectable for GuardedController {
    fn inject(_registry: &dyn Registry) -> armature::Result<Self> {
        Ok(Self)
    }
}

#[derive(Default)]
struct GuardModule;

#[tokio::test]
async fn passing_guard_data_reaches_the_handler() {
    init_tracing();
    let mut factory = AppFactory::new();
    factory.registry().provide_value(Probe::default());
    factory.declare(
        ModuleDescriptor::of::<GuardModule>().controller(
            ControllerDef::of::<GuardedController>("/secure")
                .route(
                    RouteDef::get("/me", "me", |_c: Arc<GuardedController>, ctx| async move {
                        Ok(Json(json!({ "user": ctx.data("user") })))
                    })
                    .guard::<AttachGuard>(),
                ),
        ),
    );

    let app = factory
        .bootstrap::<GuardModule>(Router::new(), BootstrapOptions::default())
        .await
        .unwrap();

    let response = send(&app, get("/secure/me")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["user"], "alice");
}

#[tokio::test]
async fn rejecting_guard_short_circuits() {
    init_tracing();
    let mut factory = AppFactory::new();
    factory.registry().provide_value(Probe::default());
    factory.declare(
        ModuleDescriptor::of::<GuardModule>().controller(
            ControllerDef::of::<GuardedController>("/secure")
                .route(
                    RouteDef::get("/admin", "admin", |_c: Arc<GuardedController>, _ctx| async move {
                        Ok(Json(json!({ "reached": true })))
                    })
                    .guard::<DenyGuard>()
                    .guard::<NeverGuard>(),
                ),
        ),
    );

    let app = factory
        .bootstrap::<GuardModule>(Router::new(), BootstrapOptions::default())
        .await
        .unwrap();

    let response = send(&app, get("/secure/admin")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await, json!({ "error": "Unauthorized" }));

    let probe = factory.registry().resolve::<Probe>().unwrap();
    assert_eq!(probe.events(), vec!["deny:evaluated"]);
}

#[tokio::test]
async fn handler_level_guard_map_is_the_fallback() {
    init_tracing();
    let mut factory = AppFactory::new();
    factory.registry().provide_value(Probe::default());
    factory.declare(
        ModuleDescriptor::of::<GuardModule>().controller(
            ControllerDef::of::<GuardedController>("/secure")
                .route(RouteDef::get(
                    "/mapped",
                    "mapped",
                    |_c: Arc<GuardedController>, ctx| async move {
                        Ok(Json(json!({ "user": ctx.data("user") })))
                    },
                ))
                .guards_for("mapped", vec![GuardRef::of::<AttachGuard>()]),
        ),
    );

    let app = factory
        .bootstrap::<GuardModule>(Router::new(), BootstrapOptions::default())
        .await
        .unwrap();

    let response = send(&app, get("/secure/mapped")).await;
    assert_eq!(body_json(response).await["user"], "alice");
}

struct FailingGuard;

impl Injectable for FailingGuard {
    fn inject(_registry: &dyn Registry) -> armature::Result<Self> {
        Ok(Self)
    }
}

#[armature::async_trait]
impl Guard for FailingGuard {
    async fn can_activate(&self, _ctx: &mut ExecutionContext) -> armature::Result<bool> {
        Err(Error::internal("auth backend down"))
    }
}

#[tokio::test]
async fn guard_errors_surface_as_500_through_the_interceptor() {
    init_tracing();
    let mut factory = AppFactory::new();
    factory.declare(
        ModuleDescriptor::of::<GuardModule>().controller(
            ControllerDef::of::<GuardedController>("/secure").route(
                RouteDef::get("/flaky", "flaky", |_c: Arc<GuardedController>, _ctx| async move {
                    Ok(Json(json!({ "reached": true })))
                })
                .guard::<FailingGuard>(),
            ),
        ),
    );

    let app = factory
        .bootstrap::<GuardModule>(Router::new(), BootstrapOptions::default())
        .await
        .unwrap();

    let response = send(&app, get("/secure/flaky")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "auth backend down" })
    );
}

// ---------------------------------------------------------------------------
// P5: bootstrapping an undeclared module is a configuration error naming
// the type.
// ---------------------------------------------------------------------------

struct NotAModule;

#[tokio::test]
async fn undeclared_module_is_a_config_error() {
    init_tracing();
    let mut factory = AppFactory::new();
    let err = factory
        .bootstrap::<NotAModule>(Router::new(), BootstrapOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Config { .. }));
    assert!(err.to_string().contains("NotAModule"));
}

// ---------------------------------------------------------------------------
// P6: not-found handling and the ignored-path set.
// ---------------------------------------------------------------------------

#[derive(Default)]
struct EmptyModule;

#[tokio::test]
async fn ignored_paths_get_a_silent_404() {
    let warnings: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&warnings);

    init_tracing();
    let mut factory = AppFactory::new();
    factory.declare(ModuleDescriptor::of::<EmptyModule>());
    let app = factory
        .bootstrap::<EmptyModule>(
            Router::new(),
            BootstrapOptions {
                logger: Some(Arc::new(move |level, msg: &str| {
                    if level == LogLevel::Warn {
                        captured.lock().unwrap().push(msg.to_string());
                    }
                })),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let response = send(&app, get("/favicon.ico")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());
    assert!(warnings.lock().unwrap().is_empty());

    let response = send(&app, get("/nope")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Route not found", "path": "/nope" })
    );
    let warnings = warnings.lock().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("/nope"));
}

#[tokio::test]
async fn supplied_ignored_paths_extend_the_builtin_set() {
    init_tracing();
    let mut factory = AppFactory::new();
    factory.declare(ModuleDescriptor::of::<EmptyModule>());
    let app = factory
        .bootstrap::<EmptyModule>(
            Router::new(),
            BootstrapOptions {
                ignored_paths: vec!["/health".to_string()],
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let response = send(&app, get("/health")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());
}

// ---------------------------------------------------------------------------
// P7: validation failure shape.
// ---------------------------------------------------------------------------

struct ItemsController;

impl Injectable for ItemsController {
    fn inject(_registry: &dyn Registry) -> armature::Result<Self> {
        Ok(Self)
    }
}

#[derive(Default)]
struct ItemsModule;

#[tokio::test]
async fn failed_body_validation_returns_the_structured_400() {
    init_tracing();
    let mut factory = AppFactory::new();
    factory.declare(
        ModuleDescriptor::of::<ItemsModule>().controller(
            ControllerDef::of::<ItemsController>("/items").route(
                RouteDef::post("", "create", |_c: Arc<ItemsController>, ctx| async move {
                    Ok(Json(ctx.body_as::<Value>()?))
                })
                .body(schema_fn(|value| {
                    if value.get("name").is_some() {
                        Ok(())
                    } else {
                        Err(vec![FieldIssue::new(["name"], "Required")])
                    }
                })),
            ),
        ),
    );

    let app = factory
        .bootstrap::<ItemsModule>(Router::new(), BootstrapOptions::default())
        .await
        .unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/items")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Validation error");
    assert_eq!(body["message"], "name: Required");
    assert_eq!(body["details"][0]["path"], json!(["name"]));
    assert_eq!(body["details"][0]["message"], "Required");

    // A valid body passes straight through to the handler.
    let request = Request::builder()
        .method("POST")
        .uri("/items")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"name":"widget"}"#))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "widget");
}

// ---------------------------------------------------------------------------
// Response schemas: violations become 500s, conforming bodies pass
// through intact.
// ---------------------------------------------------------------------------

struct ReportController;

impl Injectable for ReportController {
    fn inject(_registry: &dyn Registry) -> armature::Result<Self> {
        Ok(Self)
    }
}

#[derive(Default)]
struct ReportModule;

fn total_schema() -> impl Schema + 'static {
    schema_fn(|value| {
        if value.get("total").is_some() {
            Ok(())
        } else {
            Err(vec![FieldIssue::new(["total"], "Required")])
        }
    })
}

#[tokio::test]
async fn response_schema_violations_map_to_500() {
    init_tracing();
    let mut factory = AppFactory::new();
    factory.declare(
        ModuleDescriptor::of::<ReportModule>().controller(
            ControllerDef::of::<ReportController>("/reports")
                .route(
                    RouteDef::get("/good", "good", |_c: Arc<ReportController>, _ctx| async move {
                        Ok(Json(json!({ "total": 5 })))
                    })
                    .response(total_schema()),
                )
                .route(
                    RouteDef::get("/bad", "bad", |_c: Arc<ReportController>, _ctx| async move {
                        Ok(Json(json!({ "count": 5 })))
                    })
                    .response(total_schema()),
                ),
        ),
    );

    let app = factory
        .bootstrap::<ReportModule>(Router::new(), BootstrapOptions::default())
        .await
        .unwrap();

    let response = send(&app, get("/reports/good")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "total": 5 }));

    let response = send(&app, get("/reports/bad")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Response validation failed: total: Required" })
    );
}

// ---------------------------------------------------------------------------
// P8: shutdown sequence, ordering and idempotence.
// ---------------------------------------------------------------------------

struct TeardownOne {
    probe: Arc<Probe>,
}

impl Injectable for TeardownOne {
    fn inject(registry: &dyn Registry) -> armature::Result<Self> {
        Ok(Self {
            probe: registry.resolve::<Probe>()?,
        })
    }
}

#[armature::async_trait]
impl OnModuleDestroy for TeardownOne {
    async fn on_module_destroy(&self) -> std::result::Result<(), LifecycleError> {
        self.probe.log("one:destroy");
        Ok(())
    }
}

#[armature::async_trait]
impl BeforeApplicationShutdown for TeardownOne {
    async fn before_application_shutdown(
        &self,
        signal: ShutdownSignal,
    ) -> std::result::Result<(), LifecycleError> {
        self.probe.log(format!("one:before:{}", signal));
        Ok(())
    }
}

#[armature::async_trait]
impl OnApplicationShutdown for TeardownOne {
    async fn on_application_shutdown(
        &self,
        signal: ShutdownSignal,
    ) -> std::result::Result<(), LifecycleError> {
        self.probe.log(format!("one:shutdown:{}", signal));
        Ok(())
    }
}

struct TeardownTwo {
    probe: Arc<Probe>,
}

impl Injectable for TeardownTwo {
    fn inject(registry: &dyn Registry) -> armature::Result<Self> {
        Ok(Self {
            probe: registry.resolve::<Probe>()?,
        })
    }
}

#[armature::async_trait]
impl OnModuleDestroy for TeardownTwo {
    async fn on_module_destroy(&self) -> std::result::Result<(), LifecycleError> {
        self.probe.log("two:destroy");
        Ok(())
    }
}

#[derive(Default)]
struct TeardownModule;

#[tokio::test]
async fn shutdown_runs_each_phase_in_registration_order_once() {
    init_tracing();
    let mut factory = AppFactory::new();
    factory.registry().provide_value(Probe::default());
    factory.declare(
        ModuleDescriptor::of::<TeardownModule>()
            .provider(
                ProviderDef::of::<TeardownOne>()
                    .on_module_destroy()
                    .before_application_shutdown()
                    .on_application_shutdown(),
            )
            .provider(ProviderDef::of::<TeardownTwo>().on_module_destroy()),
    );

    factory
        .bootstrap::<TeardownModule>(Router::new(), BootstrapOptions::default())
        .await
        .unwrap();

    let coordinator = factory.shutdown_coordinator().unwrap();
    coordinator.trigger(ShutdownSignal::Terminate).await.unwrap();

    let probe = factory.registry().resolve::<Probe>().unwrap();
    assert_eq!(
        probe.events(),
        vec![
            "one:destroy",
            "two:destroy",
            "one:before:SIGTERM",
            "one:shutdown:SIGTERM"
        ]
    );
    assert!(coordinator.is_shutting_down());

    // A second trigger is a no-op.
    coordinator.trigger(ShutdownSignal::Interrupt).await.unwrap();
    assert_eq!(probe.events().len(), 4);
}

// ---------------------------------------------------------------------------
// P9: reset forgets registration state; declared metadata survives.
// ---------------------------------------------------------------------------

static REBUILDS: AtomicUsize = AtomicUsize::new(0);

struct RebuildService;

impl Injectable for RebuildService {
    fn inject(_registry: &dyn Registry) -> armature::Result<Self> {
        REBUILDS.fetch_add(1, Ordering::SeqCst);
        Ok(Self)
    }
}

#[derive(Default)]
struct RebuildModule;

#[tokio::test]
async fn reset_allows_a_clean_second_bootstrap() {
    init_tracing();
    let mut factory = AppFactory::new();
    factory.declare(
        ModuleDescriptor::of::<RebuildModule>().provider(ProviderDef::of::<RebuildService>()),
    );

    factory
        .bootstrap::<RebuildModule>(Router::new(), BootstrapOptions::default())
        .await
        .unwrap();
    assert_eq!(REBUILDS.load(Ordering::SeqCst), 1);

    factory.reset();
    assert_eq!(factory.registered_module_count(), 0);
    assert!(factory.instances().is_empty());
    assert!(factory.shutdown_coordinator().is_none());

    factory
        .bootstrap::<RebuildModule>(Router::new(), BootstrapOptions::default())
        .await
        .unwrap();
    assert_eq!(REBUILDS.load(Ordering::SeqCst), 2);
    assert_eq!(factory.registered_module_count(), 1);
}

// ---------------------------------------------------------------------------
// Plugins: JWT context extraction and CORS headers.
// ---------------------------------------------------------------------------

struct WhoAmIController;

impl Injectable for WhoAmIController {
    fn inject(_registry: &dyn Registry) -> armature::Result<Self> {
        Ok(Self)
    }
}

#[derive(Default)]
struct JwtModule;

#[tokio::test]
async fn jwt_plugin_decorates_requests_with_a_context() {
    init_tracing();
    let mut factory = AppFactory::new();
    factory.declare(
        ModuleDescriptor::of::<JwtModule>()
            .jwt(JwtConfig::new("top-secret"))
            .controller(ControllerDef::of::<WhoAmIController>("/auth").route(
                RouteDef::get("/whoami", "whoami", |_c: Arc<WhoAmIController>, ctx| async move {
                    let jwt = ctx.jwt.as_ref();
                    Ok(Json(json!({
                        "token": jwt.and_then(|j| j.token()),
                        "secret": jwt.map(|j| j.secret().to_string()),
                    })))
                }),
            )),
    );

    let app = factory
        .bootstrap::<JwtModule>(Router::new(), BootstrapOptions::default())
        .await
        .unwrap();

    let request = Request::builder()
        .uri("/auth/whoami")
        .header("authorization", "Bearer abc123")
        .body(Body::empty())
        .unwrap();
    let body = body_json(send(&app, request).await).await;
    assert_eq!(body["token"], "abc123");
    assert_eq!(body["secret"], "top-secret");

    // Without the header the context is still present, token empty.
    let body = body_json(send(&app, get("/auth/whoami")).await).await;
    assert_eq!(body["token"], Value::Null);
    assert_eq!(body["secret"], "top-secret");
}

#[derive(Default)]
struct CorsModule;

#[tokio::test]
async fn cors_plugin_adds_response_headers() {
    init_tracing();
    let mut factory = AppFactory::new();
    factory.declare(
        ModuleDescriptor::of::<CorsModule>()
            .cors(CorsConfig::default())
            .controller(ControllerDef::of::<WhoAmIController>("/api").route(RouteDef::get(
                "/ping",
                "ping",
                |_c: Arc<WhoAmIController>, _ctx| async move { Ok(Json(json!({ "pong": true }))) },
            ))),
    );

    let app = factory
        .bootstrap::<CorsModule>(Router::new(), BootstrapOptions::default())
        .await
        .unwrap();

    let request = Request::builder()
        .uri("/api/ping")
        .header("origin", "https://example.com")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}

// ---------------------------------------------------------------------------
// Handler errors surface as 500 through the error interceptor.
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FailingModule;

#[tokio::test]
async fn handler_errors_map_to_500() {
    init_tracing();
    let mut factory = AppFactory::new();
    factory.declare(
        ModuleDescriptor::of::<FailingModule>().controller(
            ControllerDef::of::<WhoAmIController>("/broken").route(RouteDef::get(
                "/boom",
                "boom",
                |_c: Arc<WhoAmIController>, _ctx| async move {
                    Err::<Json<Value>, _>(Error::internal("database unreachable"))
                },
            )),
        ),
    );

    let app = factory
        .bootstrap::<FailingModule>(Router::new(), BootstrapOptions::default())
        .await
        .unwrap();

    let response = send(&app, get("/broken/boom")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "database unreachable" })
    );
}
