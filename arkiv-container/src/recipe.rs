//! Recipes and parameter resolution.
//!
//! A recipe is the zero-argument construction function stored for a binding.
//! Constructor signatures cannot be inspected at runtime, so recipes are
//! declared as closures at bootstrap: the closure body names each
//! constructor parameter through the [`Resolver`] it receives, or through
//! [`Dep`] descriptors prepared once when the binding is declared.
//!
//! ```
//! use arkiv_container::prelude::*;
//! use std::sync::Arc;
//!
//! struct Journal;
//! struct Vault { journal: Arc<Journal> }
//!
//! let container = Container::builder()
//!     .provide::<Arc<Journal>, _>(|_| Ok(Arc::new(Journal)))
//!     .provide::<Arc<Vault>, _>({
//!         // parameter plan, derived once at declaration time
//!         let journal = Dep::<Arc<Journal>>::shared();
//!         move |r| Ok(Arc::new(Vault { journal: journal.resolve(r)? }))
//!     })
//!     .build();
//!
//! let vault: Arc<Vault> = container.resolve().expect("resolve Vault");
//! # let _ = vault;
//! ```

use std::any::{Any, type_name};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{ContainerError, Result};
use crate::key::ServiceKey;
use crate::locator::Locator;
use crate::provision::Provision;

/// A type-erased instance as recipes produce it and the cache stores it.
pub type ErasedInstance = Arc<dyn Any + Send + Sync>;

/// A type-erased recipe bound to a [`ServiceKey`].
///
/// `Arc` rather than `Box` because recipes are shared between threads and
/// cloned into the cache's creation path.
pub type RecipeFn = Arc<dyn Fn(&dyn Resolver) -> Result<ErasedInstance> + Send + Sync>;

/// Resolution surface handed to a recipe while it runs.
///
/// Kept separate from the container so recipes can be exercised against a
/// stand-in in tests.
pub trait Resolver: Send + Sync {
    /// Resolve a key with the given provisioning mode.
    fn resolve_key(&self, key: &ServiceKey, provision: Provision) -> Result<ErasedInstance>;

    /// A [`Locator`] handle over the owning container.
    ///
    /// Lets a recipe hand resolution rights to the object it constructs
    /// without also handing over registration rights.
    fn locator(&self) -> Locator;
}

impl<'r> dyn Resolver + 'r {
    /// Shared instance of `T` from the default scope.
    pub fn resolve<T: Clone + Send + Sync + 'static>(&self) -> Result<T> {
        let key = ServiceKey::of::<T>();
        let instance = self.resolve_key(&key, Provision::Shared)?;
        claim(&key, instance)
    }

    /// Shared instance of `T` from an explicit scope.
    pub fn resolve_in<T: Clone + Send + Sync + 'static>(&self, scope: &'static str) -> Result<T> {
        let key = ServiceKey::scoped::<T>(scope);
        let instance = self.resolve_key(&key, Provision::Shared)?;
        claim(&key, instance)
    }

    /// Fresh instance of `T` from the default scope.
    pub fn resolve_fresh<T: Clone + Send + Sync + 'static>(&self) -> Result<T> {
        let key = ServiceKey::of::<T>();
        let instance = self.resolve_key(&key, Provision::Fresh)?;
        claim(&key, instance)
    }

    /// Fresh instance of `T` from an explicit scope.
    pub fn resolve_fresh_in<T: Clone + Send + Sync + 'static>(
        &self,
        scope: &'static str,
    ) -> Result<T> {
        let key = ServiceKey::scoped::<T>(scope);
        let instance = self.resolve_key(&key, Provision::Fresh)?;
        claim(&key, instance)
    }
}

/// Wraps a typed construction closure into a type-erased [`RecipeFn`].
///
/// This is the whole of factory synthesis: the closure *is* the selected
/// constructor, written out once per registration.
pub fn recipe<T, F>(construct: F) -> RecipeFn
where
    T: Send + Sync + 'static,
    F: Fn(&dyn Resolver) -> Result<T> + Send + Sync + 'static,
{
    Arc::new(move |resolver| Ok(Arc::new(construct(resolver)?) as ErasedInstance))
}

/// Downcasts an erased instance back to `T` and clones the value out.
///
/// The clone is what makes `Arc<..>` the natural capability shape: cloning
/// the handle preserves the identity of the underlying instance.
pub(crate) fn claim<T: Clone + Send + Sync + 'static>(
    key: &ServiceKey,
    instance: ErasedInstance,
) -> Result<T> {
    match instance.downcast::<T>() {
        Ok(typed) => Ok((*typed).clone()),
        Err(_) => Err(ContainerError::ConstructionFailed {
            key: key.clone(),
            source: format!("binding does not produce {}", type_name::<T>()).into(),
        }),
    }
}

/// One constructor parameter, described once when the binding is declared.
///
/// Captures everything resolution needs: the capability to request, whether
/// it is provisioned shared or fresh, and the scope key to request it under.
/// Recipes hold `Dep` values by move, so the descriptor work happens at
/// registration, not on every construction.
pub struct Dep<T> {
    key: ServiceKey,
    provision: Provision,
    _capability: PhantomData<fn() -> T>,
}

impl<T: Clone + Send + Sync + 'static> Dep<T> {
    /// The shared instance from the default scope.
    pub fn shared() -> Self {
        Self {
            key: ServiceKey::of::<T>(),
            provision: Provision::Shared,
            _capability: PhantomData,
        }
    }

    /// A fresh instance from the default scope, built anew each time the
    /// owning recipe runs.
    pub fn fresh() -> Self {
        Self {
            key: ServiceKey::of::<T>(),
            provision: Provision::Fresh,
            _capability: PhantomData,
        }
    }

    /// The shared instance from an explicit scope.
    pub fn shared_in(scope: &'static str) -> Self {
        Self {
            key: ServiceKey::scoped::<T>(scope),
            provision: Provision::Shared,
            _capability: PhantomData,
        }
    }

    /// A fresh instance from an explicit scope.
    pub fn fresh_in(scope: &'static str) -> Self {
        Self {
            key: ServiceKey::scoped::<T>(scope),
            provision: Provision::Fresh,
            _capability: PhantomData,
        }
    }

    /// Resolves this parameter against the running recipe's resolver.
    pub fn resolve(&self, resolver: &dyn Resolver) -> Result<T> {
        let instance = resolver.resolve_key(&self.key, self.provision)?;
        claim(&self.key, instance)
    }

    /// The key this parameter requests.
    pub fn key(&self) -> &ServiceKey {
        &self.key
    }

    /// How this parameter is provisioned.
    pub fn provision(&self) -> Provision {
        self.provision
    }
}
