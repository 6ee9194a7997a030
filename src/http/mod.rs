mod context;
mod route;

pub use context::RequestContext;
pub(crate) use route::{RouteRuntime, join_paths, mount_route};
