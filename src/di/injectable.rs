use crate::di::Registry;
use crate::error::Result;

/// Trait for types constructed by the DI container.
///
/// The registry is passed in so dependencies can be resolved recursively.
///
/// # Example
/// ```
/// use armature::{Injectable, Registry, RegistryExt, Result};
/// use std::sync::Arc;
///
/// pub struct UserRepository;
///
/// impl Injectable for UserRepository {
///     fn inject(_registry: &dyn Registry) -> Result<Self> {
///         Ok(Self)
///     }
/// }
///
/// pub struct UserService {
///     repository: Arc<UserRepository>,
/// }
///
/// impl Injectable for UserService {
///     fn inject(registry: &dyn Registry) -> Result<Self> {
///         Ok(Self {
///             repository: registry.resolve::<UserRepository>()?,
///         })
///     }
/// }
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Create an instance by resolving dependencies from the registry.
    ///
    /// # Errors
    /// Returns an error if any required dependency is not registered.
    fn inject(registry: &dyn Registry) -> Result<Self>;
}
