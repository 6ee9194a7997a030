//! Optional per-module plugins.
//!
//! A module may declare JWT, CORS and cron configuration; the factory
//! invokes the corresponding registration in the fixed order
//! JWT → CORS → cron while the module registers.

mod cors;
mod cron;
mod jwt;

pub use cors::CorsConfig;
pub use cron::{CronConfig, CronJob};
pub use jwt::{JwtConfig, JwtContext, JwtLayer};

pub(crate) use cors::build_layer as build_cors_layer;
pub(crate) use cron::spawn_jobs as spawn_cron_jobs;

/// The plugin configuration block of a module descriptor.
#[derive(Clone, Default)]
pub struct PluginConfig {
    pub jwt: Option<JwtConfig>,
    pub cors: Option<CorsConfig>,
    pub cron: Option<CronConfig>,
}
