use crate::di::Injectable;
use crate::error::{Error, Result};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::Arc;

/// A type-erased constructor stored in the container.
pub type FactoryFn = Arc<dyn Fn(&dyn Registry) -> Result<Arc<dyn Any + Send + Sync>> + Send + Sync>;

/// How long a resolved instance lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifetime {
    /// One shared instance, constructed on first resolve.
    #[default]
    Singleton,
    /// A fresh instance on every resolve.
    Transient,
}

/// The capability contract the orchestrator consumes.
///
/// Any compliant container can back the factory; [`Container`] is the
/// default implementation. The API is deliberately type-erased so the
/// trait stays object-safe; [`RegistryExt`] adds the typed surface.
pub trait Registry: Send + Sync {
    /// Whether a constructor or instance is known for `id`.
    fn is_registered(&self, id: TypeId) -> bool;

    /// Register a constructor for `id`. Replaces any previous registration.
    fn register_factory(&self, id: TypeId, name: &'static str, lifetime: Lifetime, factory: FactoryFn);

    /// Insert an already-constructed instance for `id`.
    fn insert_any(&self, id: TypeId, instance: Arc<dyn Any + Send + Sync>);

    /// Resolve an instance for `id`, constructing it if necessary.
    /// `type_name` is only used for error messages.
    fn resolve_any(&self, id: TypeId, type_name: &str) -> Result<Arc<dyn Any + Send + Sync>>;

    /// Drop every registration and cached instance.
    fn clear(&self);
}

/// Typed convenience methods over any [`Registry`].
pub trait RegistryExt: Registry {
    fn contains<T: 'static>(&self) -> bool {
        self.is_registered(TypeId::of::<T>())
    }

    /// Register `T` as constructible via its [`Injectable`] implementation.
    fn register<T: Injectable>(&self, lifetime: Lifetime) {
        self.register_factory(
            TypeId::of::<T>(),
            std::any::type_name::<T>(),
            lifetime,
            Arc::new(|registry| T::inject(registry).map(|t| Arc::new(t) as Arc<dyn Any + Send + Sync>)),
        );
    }

    /// Insert a pre-built value, e.g. configuration loaded before bootstrap.
    fn provide_value<T: Send + Sync + 'static>(&self, value: T) {
        self.insert_any(TypeId::of::<T>(), Arc::new(value));
    }

    fn resolve<T: Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        let type_name = std::any::type_name::<T>();
        self.resolve_any(TypeId::of::<T>(), type_name)?
            .downcast::<T>()
            .map_err(|_| Error::DowncastFailed {
                type_name: type_name.to_string(),
            })
    }
}

impl<R: Registry + ?Sized> RegistryExt for R {}

#[derive(Clone)]
struct FactoryEntry {
    name: &'static str,
    lifetime: Lifetime,
    factory: FactoryFn,
}

/// Thread-safe dependency injection container.
///
/// Constructors are registered per `TypeId`; singletons are cached on
/// first resolve, transients are constructed anew every time. Constructor
/// injection happens through [`Injectable`], which receives the registry
/// itself so dependencies resolve recursively. Cyclic constructor chains
/// are not detected.
pub struct Container {
    factories: DashMap<TypeId, FactoryEntry>,
    instances: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Container {
    pub fn new() -> Self {
        Self {
            factories: DashMap::new(),
            instances: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty() && self.instances.is_empty()
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry for Container {
    fn is_registered(&self, id: TypeId) -> bool {
        self.factories.contains_key(&id) || self.instances.contains_key(&id)
    }

    fn register_factory(&self, id: TypeId, name: &'static str, lifetime: Lifetime, factory: FactoryFn) {
        self.factories.insert(
            id,
            FactoryEntry {
                name,
                lifetime,
                factory,
            },
        );
    }

    fn insert_any(&self, id: TypeId, instance: Arc<dyn Any + Send + Sync>) {
        self.instances.insert(id, instance);
    }

    fn resolve_any(&self, id: TypeId, type_name: &str) -> Result<Arc<dyn Any + Send + Sync>> {
        if let Some(cached) = self.instances.get(&id) {
            return Ok(Arc::clone(cached.value()));
        }

        // Clone the factory out before invoking it: the constructor may
        // resolve further dependencies through this same map.
        let entry = {
            let entry = self
                .factories
                .get(&id)
                .ok_or_else(|| Error::DependencyNotFound {
                    type_name: type_name.to_string(),
                })?;
            entry.value().clone()
        };

        let instance = (entry.factory)(self)?;
        if entry.lifetime == Lifetime::Singleton {
            self.instances.insert(id, Arc::clone(&instance));
        }
        tracing::debug!("Resolved {} ({:?})", entry.name, entry.lifetime);
        Ok(instance)
    }

    fn clear(&self) {
        self.factories.clear();
        self.instances.clear();
    }
}
