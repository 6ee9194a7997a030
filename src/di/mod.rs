mod container;
mod injectable;

pub use container::{Container, FactoryFn, Lifetime, Registry, RegistryExt};
pub use injectable::Injectable;
