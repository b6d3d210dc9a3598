//! Provider modules — grouped bootstrap registrations.
//!
//! A [`Provider`] bundles the bindings for one area of the application so
//! the bootstrap reads as a list of modules instead of one long block:
//!
//! ```rust,ignore
//! let container = Container::builder()
//!     .add_provider(&ServiceProvider { settings })
//!     .add_provider(&ModelProvider)
//!     .build();
//! ```

use crate::key::ServiceKey;
use crate::recipe::{RecipeFn, Resolver, recipe};

/// A module of related binding declarations.
///
/// Implementations receive the registration surface once, while the
/// container is being bootstrapped.
pub trait Provider: Send + Sync {
    /// Declare this module's bindings.
    fn register(&self, registry: &mut dyn ProviderRegistry);

    /// Human-readable name, used in bootstrap logging.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Registration surface handed to providers.
///
/// A deliberately narrow slice of [`ContainerBuilder`](crate::ContainerBuilder):
/// providers can declare bindings but cannot build or resolve, and the
/// decoupling lets them be exercised against a recording stand-in in tests.
pub trait ProviderRegistry {
    /// Store `recipe` under `key`; the last declaration for a key wins.
    fn bind_recipe(&mut self, key: ServiceKey, recipe: RecipeFn);
}

impl<'r> dyn ProviderRegistry + 'r {
    /// Declare a binding for `T` in the default scope.
    pub fn provide<T, F>(&mut self, construct: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> crate::error::Result<T> + Send + Sync + 'static,
    {
        self.bind_recipe(ServiceKey::of::<T>(), recipe(construct));
    }

    /// Declare a binding for `T` under an explicit scope key.
    pub fn provide_in<T, F>(&mut self, scope: &'static str, construct: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> crate::error::Result<T> + Send + Sync + 'static,
    {
        self.bind_recipe(ServiceKey::scoped::<T>(scope), recipe(construct));
    }

    /// Bind an already-built value in the default scope.
    pub fn provide_value<T: Clone + Send + Sync + 'static>(&mut self, value: T) {
        self.provide(move |_| Ok(value.clone()));
    }
}
