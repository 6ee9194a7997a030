//! Declarative module metadata.
//!
//! Where an annotation-based framework would collect this information
//! from decorators at load time, here it is produced by typed fluent
//! builders and recorded in a [`MetadataStore`] via
//! [`AppFactory::declare`](crate::factory::AppFactory::declare) before
//! bootstrap. The declarative intent is the same: descriptors are
//! created once, immutable afterwards, and consumed read-only by the
//! factory.

mod controller;
mod module;
mod provider;
mod store;

pub use controller::{ControllerBuilder, ControllerDef, HttpMethod, RouteBuilder, RouteDef, RouteDocs};
pub(crate) use controller::ErasedHandler;
pub use module::{ModuleBuilder, ModuleDescriptor, ModuleToken};
pub use provider::{ProviderBuilder, ProviderDef};
pub use store::MetadataStore;
