//! Container construction and resolution.
//!
//! # Architecture
//! ```text
//! ContainerBuilder ──build()──> Container ──locator()──> Locator
//! ```
//!
//! The builder is the registration surface: the bootstrap declares every
//! binding on it, then freezes the set with [`build()`](ContainerBuilder::build).
//! The resulting [`Container`] only resolves — shared instances through the
//! cache, fresh ones straight from the recipe.
//!
//! # Examples
//! ```rust
//! use arkiv_container::prelude::*;
//! use std::sync::Arc;
//!
//! trait Notifier: Send + Sync {
//!     fn notify(&self, msg: &str);
//! }
//!
//! struct NullNotifier;
//! impl Notifier for NullNotifier {
//!     fn notify(&self, _: &str) {}
//! }
//!
//! struct AuditLog {
//!     notifier: Arc<dyn Notifier>,
//! }
//!
//! let container = Container::builder()
//!     .provide::<Arc<dyn Notifier>, _>(|_| Ok(Arc::new(NullNotifier) as Arc<dyn Notifier>))
//!     .provide::<Arc<AuditLog>, _>(|r| {
//!         let notifier: Arc<dyn Notifier> = r.resolve()?;
//!         Ok(Arc::new(AuditLog { notifier }))
//!     })
//!     .build();
//!
//! let log: Arc<AuditLog> = container.resolve().expect("resolve AuditLog");
//! log.notifier.notify("wired");
//! ```

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument, trace};

use arkiv_support::rendering::suggest_similar;

use crate::cache::InstanceCache;
use crate::error::{CircularResolutionError, ContainerError, NotRegisteredError, Result};
use crate::key::ServiceKey;
use crate::locator::Locator;
use crate::provider::Provider;
use crate::provision::Provision;
use crate::recipe::{ErasedInstance, RecipeFn, Resolver, claim, recipe};
use crate::registry::{Binding, Registry};

// ============================================================
// ContainerBuilder
// ============================================================

/// Registration surface for a [`Container`].
///
/// All methods chain by value; the registry freezes when
/// [`build()`](ContainerBuilder::build) runs. Declaring a key twice is not
/// an error — the later declaration wins, which is how tests swap a real
/// service for a stand-in.
pub struct ContainerBuilder {
    registry: Registry,
}

impl ContainerBuilder {
    fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    /// Declare a binding for `T` in the default scope.
    ///
    /// The closure runs once per constructed instance; shared provisioning
    /// caches its first result, fresh provisioning runs it every time.
    pub fn provide<T, F>(self, construct: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<T> + Send + Sync + 'static,
    {
        self.bind(ServiceKey::of::<T>(), recipe(construct))
    }

    /// Declare a binding for `T` under an explicit scope key.
    pub fn provide_in<T, F>(self, scope: &'static str, construct: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<T> + Send + Sync + 'static,
    {
        self.bind(ServiceKey::scoped::<T>(scope), recipe(construct))
    }

    /// Bind an already-built value.
    ///
    /// Cloned out on every resolution, so use `Arc<..>` for anything heavier
    /// than a config value.
    pub fn provide_value<T: Clone + Send + Sync + 'static>(self, value: T) -> Self {
        self.provide(move |_| Ok(value.clone()))
    }

    /// Bind an already-built value under an explicit scope key.
    pub fn provide_value_in<T: Clone + Send + Sync + 'static>(
        self,
        scope: &'static str,
        value: T,
    ) -> Self {
        self.provide_in(scope, move |_| Ok(value.clone()))
    }

    /// Declare a binding with a pre-erased recipe.
    ///
    /// The escape hatch for callers that build [`RecipeFn`]s themselves,
    /// e.g. provider modules or wrappers around foreign factories.
    pub fn provide_recipe(self, key: ServiceKey, recipe: RecipeFn) -> Self {
        self.bind(key, recipe)
    }

    /// Apply a [`Provider`] module's registrations.
    pub fn add_provider(mut self, provider: &dyn Provider) -> Self {
        debug!(provider = provider.name(), "applying provider");
        provider.register(&mut self);
        self
    }

    /// Freeze the registry into an immutable, thread-safe container.
    #[instrument(skip(self), name = "container_build")]
    pub fn build(self) -> Container {
        info!(bindings = self.registry.len(), "container built");
        Container {
            inner: Arc::new(ContainerInner {
                registry: self.registry,
                cache: InstanceCache::new(),
            }),
        }
    }

    fn bind(mut self, key: ServiceKey, recipe: RecipeFn) -> Self {
        self.registry.bind(Binding { key, recipe });
        self
    }
}

impl crate::provider::ProviderRegistry for ContainerBuilder {
    fn bind_recipe(&mut self, key: ServiceKey, recipe: RecipeFn) {
        self.registry.bind(Binding { key, recipe });
    }
}

// ============================================================
// Container
// ============================================================

struct ContainerInner {
    registry: Registry,
    cache: InstanceCache,
}

/// Immutable, thread-safe service container.
///
/// A cheap-to-clone handle over the registry and instance cache. The
/// bootstrap keeps the root handle; consumers receive a [`Locator`] and
/// never touch registration. Dropping the last handle tears both maps down.
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

impl Container {
    /// Start declaring bindings.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    /// Shared instance of `T` from the default scope.
    ///
    /// The first request constructs the instance; every later request, on
    /// any thread, observes that same instance.
    pub fn resolve<T: Clone + Send + Sync + 'static>(&self) -> Result<T> {
        self.resolve_with(ServiceKey::of::<T>(), Provision::Shared)
    }

    /// Shared instance of `T` from an explicit scope.
    pub fn resolve_in<T: Clone + Send + Sync + 'static>(&self, scope: &'static str) -> Result<T> {
        self.resolve_with(ServiceKey::scoped::<T>(scope), Provision::Shared)
    }

    /// Fresh instance of `T` from the default scope, bypassing the cache.
    pub fn resolve_fresh<T: Clone + Send + Sync + 'static>(&self) -> Result<T> {
        self.resolve_with(ServiceKey::of::<T>(), Provision::Fresh)
    }

    /// Fresh instance of `T` from an explicit scope.
    pub fn resolve_fresh_in<T: Clone + Send + Sync + 'static>(
        &self,
        scope: &'static str,
    ) -> Result<T> {
        self.resolve_with(ServiceKey::scoped::<T>(scope), Provision::Fresh)
    }

    /// A read-only resolution façade over this container.
    pub fn locator(&self) -> Locator {
        Locator::new(self.clone())
    }

    fn resolve_with<T: Clone + Send + Sync + 'static>(
        &self,
        key: ServiceKey,
        provision: Provision,
    ) -> Result<T> {
        let instance = self.resolve_erased(&key, provision)?;
        claim(&key, instance)
    }

    fn resolve_erased(&self, key: &ServiceKey, provision: Provision) -> Result<ErasedInstance> {
        trace!(key = %key, %provision, "resolving");

        let binding = self
            .inner
            .registry
            .lookup(key)
            .ok_or_else(|| self.not_registered(key))?;

        let _frame = ResolutionFrame::enter(self, key)?;
        let make = || (binding.recipe)(self);

        match provision {
            Provision::Fresh => self.inner.cache.create_fresh(make),
            Provision::Shared => self.inner.cache.get_or_create(key, make),
        }
    }

    fn not_registered(&self, key: &ServiceKey) -> ContainerError {
        let registered: Vec<String> = self.inner.registry.keys().map(|k| k.to_string()).collect();
        let candidates: Vec<&str> = registered.iter().map(String::as_str).collect();

        ContainerError::NotRegistered(NotRegisteredError {
            requested: key.clone(),
            required_by: ResolutionFrame::innermost(self),
            suggestions: suggest_similar(key.type_name(), &candidates, 3),
        })
    }
}

impl Resolver for Container {
    fn resolve_key(&self, key: &ServiceKey, provision: Provision) -> Result<ErasedInstance> {
        self.resolve_erased(key, provision)
    }

    fn locator(&self) -> Locator {
        Locator::new(self.clone())
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("registered", &self.inner.registry.len())
            .field("cached", &self.inner.cache.len())
            .finish()
    }
}

// ============================================================
// ResolutionFrame (cycle guard)
// ============================================================

thread_local! {
    // (container identity, key) pairs for every resolution currently on
    // this thread's stack. Resolution is synchronous, so frames are
    // strictly nested and pop in LIFO order.
    static ACTIVE: RefCell<Vec<(usize, ServiceKey)>> = const { RefCell::new(Vec::new()) };
}

/// Marks one (container, key) resolution as in progress on this thread.
///
/// Re-entering the same pair within a single call chain means the recipes
/// form a cycle; failing here keeps the defect a readable error instead of
/// stack exhaustion.
struct ResolutionFrame;

impl ResolutionFrame {
    fn enter(container: &Container, key: &ServiceKey) -> Result<Self> {
        let id = Arc::as_ptr(&container.inner) as usize;
        ACTIVE.with(|active| {
            let mut active = active.borrow_mut();
            if let Some(start) = active
                .iter()
                .position(|(owner, held)| *owner == id && held == key)
            {
                let mut chain: Vec<ServiceKey> = active[start..]
                    .iter()
                    .filter(|(owner, _)| *owner == id)
                    .map(|(_, held)| held.clone())
                    .collect();
                chain.push(key.clone());
                return Err(ContainerError::CircularResolution(
                    CircularResolutionError { chain },
                ));
            }
            active.push((id, key.clone()));
            Ok(Self)
        })
    }

    /// The key whose recipe is currently running on this thread, if any.
    fn innermost(container: &Container) -> Option<ServiceKey> {
        let id = Arc::as_ptr(&container.inner) as usize;
        ACTIVE.with(|active| {
            active
                .borrow()
                .iter()
                .rev()
                .find(|(owner, _)| *owner == id)
                .map(|(_, held)| held.clone())
        })
    }
}

impl Drop for ResolutionFrame {
    fn drop(&mut self) {
        ACTIVE.with(|active| {
            active.borrow_mut().pop();
        });
    }
}

// ============================================================
// Prelude
// ============================================================

pub mod prelude {
    pub use super::{Container, ContainerBuilder};
    pub use crate::error::{ContainerError, Result};
    pub use crate::key::ServiceKey;
    pub use crate::locator::Locator;
    pub use crate::provider::{Provider, ProviderRegistry};
    pub use crate::provision::Provision;
    pub use crate::recipe::{Dep, RecipeFn, Resolver, recipe};
}

// ============================================================
// Tests
// ============================================================
